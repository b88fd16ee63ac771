use thiserror::Error;

use crate::api::{default_reciter, ChapterMetadata, ReciterProfile};

pub const DEFAULT_VOLUME: f64 = 0.7;

/// Playback faults. All of these end up as session/view state, never as a
/// crash; `NoActiveChapter` in particular is a safe no-op signal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayerError {
    #[error("chapter list is unavailable")]
    CatalogUnavailable,
    #[error("no audio available for surah {chapter} (reciter {reciter})")]
    ResourceUnavailable { chapter: u32, reciter: u32 },
    #[error("content gateway failed: {0}")]
    Gateway(String),
    #[error("no surah is loaded")]
    NoActiveChapter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    Idle,
    Loading,
    Playing,
    Paused,
}

/// Identity of one in-flight resolution. A result is applied only while
/// its token is still the session's newest one; this compare-on-complete
/// rule is the sole cancellation mechanism for superseded requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// The single "now playing" slot. Created once at startup, mutated only by
/// the session controller, alive for the whole application.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSession {
    pub active_chapter: Option<ChapterMetadata>,
    pub active_reciter: ReciterProfile,
    /// Resolved audio URL for the current (chapter, reciter) pair; empty
    /// while unresolved.
    pub resource_locator: String,
    pub transport: TransportState,
    pub position_seconds: f64,
    /// 0.0 means "not yet known".
    pub duration_seconds: f64,
    pub volume: f64,
    pub muted: bool,
    pub auto_advance: bool,
    /// Optional playlist overriding natural chapter-number order for
    /// next/previous.
    pub navigation_context: Option<Vec<ChapterMetadata>>,
    pub last_error: Option<PlayerError>,
    token: u64,
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self {
            active_chapter: None,
            active_reciter: default_reciter(),
            resource_locator: String::new(),
            transport: TransportState::Idle,
            position_seconds: 0.0,
            duration_seconds: 0.0,
            volume: DEFAULT_VOLUME,
            muted: false,
            auto_advance: true,
            navigation_context: None,
            last_error: None,
            token: 0,
        }
    }
}

impl PlaybackSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Output volume actually sent to the engine: mute forces 0 without
    /// touching the stored value.
    pub fn effective_volume(&self) -> f64 {
        if self.muted {
            0.0
        } else {
            self.volume
        }
    }

    /// Stores a clamped volume. Zero implies mute; anything audible
    /// un-mutes.
    pub fn store_volume(&mut self, volume: f64) {
        let volume = if volume.is_finite() { volume } else { 0.0 };
        self.volume = volume.clamp(0.0, 1.0);
        self.muted = self.volume == 0.0;
    }

    /// Clamps a seek target into `[0, duration]`.
    pub fn clamp_position(&self, seconds: f64) -> f64 {
        if !seconds.is_finite() {
            return 0.0;
        }
        seconds.clamp(0.0, self.duration_seconds)
    }

    pub fn issue_token(&mut self) -> RequestToken {
        self.token += 1;
        RequestToken(self.token)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.token
    }

    pub fn has_active_chapter(&self) -> bool {
        self.active_chapter.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_initial_session_contract() {
        let session = PlaybackSession::new();
        assert!(session.active_chapter.is_none());
        assert_eq!(session.active_reciter.id, 1);
        assert_eq!(session.transport, TransportState::Idle);
        assert_eq!(session.volume, DEFAULT_VOLUME);
        assert!(!session.muted);
        assert!(session.auto_advance);
        assert!(session.navigation_context.is_none());
    }

    #[test]
    fn zero_volume_mutes_and_audible_volume_unmutes() {
        let mut session = PlaybackSession::new();
        session.store_volume(0.0);
        assert!(session.muted);
        assert_eq!(session.effective_volume(), 0.0);

        session.store_volume(0.5);
        assert!(!session.muted);
        assert_eq!(session.volume, 0.5);
        assert_eq!(session.effective_volume(), 0.5);
    }

    #[test]
    fn mute_preserves_stored_volume() {
        let mut session = PlaybackSession::new();
        session.store_volume(0.8);
        session.muted = true;
        assert_eq!(session.effective_volume(), 0.0);
        assert_eq!(session.volume, 0.8);
    }

    #[test]
    fn volume_is_clamped() {
        let mut session = PlaybackSession::new();
        session.store_volume(3.0);
        assert_eq!(session.volume, 1.0);
        session.store_volume(-1.0);
        assert_eq!(session.volume, 0.0);
        session.store_volume(f64::NAN);
        assert_eq!(session.volume, 0.0);
    }

    #[test]
    fn seek_targets_clamp_to_known_duration() {
        let mut session = PlaybackSession::new();
        session.duration_seconds = 120.0;
        assert_eq!(session.clamp_position(300.0), 120.0);
        assert_eq!(session.clamp_position(-5.0), 0.0);
        assert_eq!(session.clamp_position(42.5), 42.5);
    }

    #[test]
    fn newer_token_invalidates_older_one() {
        let mut session = PlaybackSession::new();
        let first = session.issue_token();
        assert!(session.is_current(first));
        let second = session.issue_token();
        assert!(!session.is_current(first));
        assert!(session.is_current(second));
    }
}
