use std::rc::Rc;

use tracing::{debug, warn};

use crate::api::{ChapterMetadata, GatewayError, ReciterProfile};
use crate::player::catalog::TrackCatalog;
use crate::player::engine::{AudioEngine, EngineEvent};
use crate::player::session::{PlaybackSession, PlayerError, RequestToken, TransportState};

/// One resolution the caller still has to run against the content gateway.
/// The token ties the eventual result back to the state that issued it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolveRequest {
    pub token: RequestToken,
    pub chapter: u32,
    pub reciter: u32,
}

#[derive(Debug, Clone)]
struct PendingSwitch {
    token: RequestToken,
    previous: ReciterProfile,
    resume: bool,
    position: f64,
    prior_transport: TransportState,
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Forward,
    Backward,
}

/// Sole owner of the playback session and the only writer of the audio
/// engine. Resolving operations are split in two synchronous phases:
/// `begin_*` mutates the session and hands back a [`ResolveRequest`];
/// `complete_resolution` applies the gateway outcome, dropping it silently
/// when a newer request has superseded it in the meantime. The async fetch
/// between the phases lives with the caller, so this type stays fully
/// deterministic and testable.
pub struct SessionController {
    session: PlaybackSession,
    engine: Rc<dyn AudioEngine>,
    /// Enter `Playing` (rather than `Paused`) once the engine reports the
    /// current resource ready.
    resume_when_ready: bool,
    /// Offset to restore after a reciter swap, applied when the new
    /// resource's duration becomes known.
    pending_seek: Option<f64>,
    pending_switch: Option<PendingSwitch>,
    /// `Loading` because of a mid-stream stall, not a fresh resource. An
    /// `ended` signal is still valid in this state.
    buffering: bool,
}

impl SessionController {
    pub fn new(engine: Rc<dyn AudioEngine>) -> Self {
        Self {
            session: PlaybackSession::new(),
            engine,
            resume_when_ready: false,
            pending_seek: None,
            pending_switch: None,
            buffering: false,
        }
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn engine(&self) -> Rc<dyn AudioEngine> {
        Rc::clone(&self.engine)
    }

    /// Loads `chapter` into the now-playing slot and starts resolving its
    /// audio. A given playlist becomes the navigation context; `None`
    /// leaves the current context untouched.
    pub fn begin_play(
        &mut self,
        chapter: ChapterMetadata,
        playlist: Option<Vec<ChapterMetadata>>,
    ) -> ResolveRequest {
        if let Some(playlist) = playlist {
            self.session.navigation_context = Some(playlist);
        }
        self.session.active_chapter = Some(chapter.clone());
        self.session.resource_locator.clear();
        self.session.transport = TransportState::Loading;
        self.session.position_seconds = 0.0;
        self.session.duration_seconds = 0.0;
        self.session.last_error = None;
        self.pending_switch = None;
        self.pending_seek = None;
        self.resume_when_ready = true;
        self.buffering = false;

        let token = self.session.issue_token();
        ResolveRequest {
            token,
            chapter: chapter.number,
            reciter: self.session.active_reciter.id,
        }
    }

    /// Swaps the active reciter. With a chapter loaded this re-resolves the
    /// audio and, once the new resource is ready, restores the playback
    /// offset and resumes if playback was running. Selecting the reciter
    /// that is already active is a no-op.
    pub fn begin_reciter_change(&mut self, reciter: ReciterProfile) -> Option<ResolveRequest> {
        if reciter.id == self.session.active_reciter.id {
            return None;
        }
        self.session.last_error = None;

        let Some(chapter) = self.session.active_chapter.clone() else {
            self.session.active_reciter = reciter;
            return None;
        };

        let previous = std::mem::replace(&mut self.session.active_reciter, reciter);
        let prior_transport = self.session.transport;
        let resume = match prior_transport {
            TransportState::Playing => true,
            TransportState::Loading => self.resume_when_ready,
            _ => false,
        };
        let position = self.engine.position();
        self.session.transport = TransportState::Loading;
        self.buffering = false;

        let token = self.session.issue_token();
        self.pending_switch = Some(PendingSwitch {
            token,
            previous,
            resume,
            position,
            prior_transport,
        });
        self.pending_seek = None;

        Some(ResolveRequest {
            token,
            chapter: chapter.number,
            reciter: self.session.active_reciter.id,
        })
    }

    /// Applies a gateway outcome. Results from superseded requests are
    /// dropped without touching the session. Failures never propagate as
    /// faults; they are recorded in `session.last_error` and the transport
    /// settles on the closest safe state (idle, or the previous resource
    /// still playing after a failed reciter swap, with the reciter
    /// reverted to match it).
    pub fn complete_resolution(
        &mut self,
        token: RequestToken,
        outcome: Result<Option<String>, GatewayError>,
    ) {
        if !self.session.is_current(token) {
            debug!("dropping stale resolution result");
            return;
        }
        let switch = match &self.pending_switch {
            Some(pending) if pending.token == token => self.pending_switch.take(),
            _ => None,
        };

        match outcome {
            Ok(Some(url)) => {
                self.session.resource_locator = url.clone();
                self.engine.load(&url);
                self.engine.set_volume(self.session.effective_volume());
                if let Some(pending) = switch {
                    self.pending_seek = Some(pending.position);
                    self.resume_when_ready = pending.resume;
                } else {
                    self.pending_seek = None;
                    self.resume_when_ready = true;
                }
                // Stays in Loading until the engine reports the metadata.
            }
            Ok(None) | Err(_) => {
                let chapter = self
                    .session
                    .active_chapter
                    .as_ref()
                    .map(|chapter| chapter.number)
                    .unwrap_or(0);
                let error = match outcome {
                    Err(gateway) => {
                        warn!(chapter, %gateway, "audio resolution failed");
                        PlayerError::Gateway(gateway.to_string())
                    }
                    _ => PlayerError::ResourceUnavailable {
                        chapter,
                        reciter: self.session.active_reciter.id,
                    },
                };

                if let Some(pending) = switch {
                    // The old resource was never torn down; put the session
                    // back in front of it.
                    self.session.active_reciter = pending.previous;
                    self.session.transport = if self.session.resource_locator.is_empty() {
                        TransportState::Idle
                    } else {
                        pending.prior_transport
                    };
                } else {
                    self.session.resource_locator.clear();
                    self.session.transport = TransportState::Idle;
                }
                self.session.last_error = Some(error);
            }
        }
    }

    /// Folds an engine signal into the session. May hand back a follow-up
    /// resolution (auto-advance); the caller runs it outside this call,
    /// which keeps the `ended` path from re-entering the controller.
    pub fn handle_event(
        &mut self,
        event: EngineEvent,
        catalog: &TrackCatalog,
    ) -> Option<ResolveRequest> {
        match event {
            EngineEvent::TimeUpdate { position } => {
                self.session.position_seconds = if self.session.duration_seconds > 0.0 {
                    position.clamp(0.0, self.session.duration_seconds)
                } else {
                    position.max(0.0)
                };
                None
            }
            EngineEvent::LoadedMetadata { duration } => {
                self.session.duration_seconds = duration.max(0.0);
                if let Some(target) = self.pending_seek.take() {
                    let restored = if duration > 0.0 && target < duration {
                        target
                    } else {
                        0.0
                    };
                    self.engine.seek(restored);
                    self.session.position_seconds = restored;
                }
                self.leave_loading_if_ready();
                None
            }
            EngineEvent::CanPlay => {
                self.leave_loading_if_ready();
                None
            }
            EngineEvent::Waiting => {
                // Buffering: display state only, nothing else moves.
                if self.session.transport == TransportState::Playing {
                    self.session.transport = TransportState::Loading;
                    self.resume_when_ready = true;
                    self.buffering = true;
                }
                None
            }
            EngineEvent::Ended => {
                // A track can end while playing or while stalled near the
                // end of the stream. A fresh load is neither, which also
                // swallows any duplicate ended signal once the advance is
                // in flight.
                let stalled = self.buffering
                    && self.session.transport == TransportState::Loading;
                if self.session.transport != TransportState::Playing && !stalled {
                    return None;
                }
                self.buffering = false;
                self.session.position_seconds = self.session.duration_seconds;
                if self.session.auto_advance {
                    self.begin_next(catalog).ok()
                } else {
                    self.session.transport = TransportState::Paused;
                    None
                }
            }
        }
    }

    fn leave_loading_if_ready(&mut self) {
        if self.session.transport != TransportState::Loading
            || self.session.resource_locator.is_empty()
        {
            return;
        }
        self.buffering = false;
        if self.resume_when_ready {
            self.engine.play();
            self.session.transport = TransportState::Playing;
        } else {
            self.session.transport = TransportState::Paused;
        }
    }

    pub fn play(&mut self) {
        if self.session.has_active_chapter() && self.session.transport == TransportState::Paused {
            self.engine.play();
            self.session.transport = TransportState::Playing;
        }
    }

    pub fn pause(&mut self) {
        if self.session.transport == TransportState::Playing {
            self.engine.pause();
            self.session.transport = TransportState::Paused;
        }
    }

    pub fn toggle_play(&mut self) {
        match self.session.transport {
            TransportState::Playing => self.pause(),
            TransportState::Paused => self.play(),
            _ => {}
        }
    }

    /// Clamped, optimistic seek: the session position moves immediately
    /// instead of waiting for the next engine time report. No-op without
    /// an active chapter or while the duration is unknown.
    pub fn seek_to(&mut self, seconds: f64) {
        if !self.session.has_active_chapter() || self.session.duration_seconds <= 0.0 {
            return;
        }
        let target = self.session.clamp_position(seconds);
        self.engine.seek(target);
        self.session.position_seconds = target;
    }

    pub fn set_volume(&mut self, volume: f64) {
        self.session.store_volume(volume);
        self.engine.set_volume(self.session.effective_volume());
    }

    pub fn toggle_mute(&mut self) {
        self.session.muted = !self.session.muted;
        self.engine.set_volume(self.session.effective_volume());
    }

    pub fn toggle_auto_advance(&mut self) {
        self.session.auto_advance = !self.session.auto_advance;
    }

    #[allow(dead_code)]
    pub fn set_navigation_context(&mut self, playlist: Option<Vec<ChapterMetadata>>) {
        self.session.navigation_context = playlist;
    }

    pub fn begin_next(&mut self, catalog: &TrackCatalog) -> Result<ResolveRequest, PlayerError> {
        self.begin_neighbor(catalog, Direction::Forward)
    }

    pub fn begin_previous(
        &mut self,
        catalog: &TrackCatalog,
    ) -> Result<ResolveRequest, PlayerError> {
        self.begin_neighbor(catalog, Direction::Backward)
    }

    fn begin_neighbor(
        &mut self,
        catalog: &TrackCatalog,
        direction: Direction,
    ) -> Result<ResolveRequest, PlayerError> {
        let current = self
            .session
            .active_chapter
            .clone()
            .ok_or(PlayerError::NoActiveChapter)?;
        let target = self.neighbor_of(&current, catalog, direction);
        Ok(self.begin_play(target, None))
    }

    /// Playlist order when the active chapter is in the navigation
    /// context, natural catalog order otherwise.
    fn neighbor_of(
        &self,
        current: &ChapterMetadata,
        catalog: &TrackCatalog,
        direction: Direction,
    ) -> ChapterMetadata {
        if let Some(context) = &self.session.navigation_context {
            if let Some(index) = context
                .iter()
                .position(|chapter| chapter.number == current.number)
            {
                let len = context.len();
                let neighbor = match direction {
                    Direction::Forward => (index + 1) % len,
                    Direction::Backward => (index + len - 1) % len,
                };
                return context[neighbor].clone();
            }
        }
        match direction {
            Direction::Forward => catalog.next(current.number),
            Direction::Backward => catalog.previous(current.number),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    use crate::player::catalog::CHAPTER_COUNT;

    #[derive(Debug, Clone, PartialEq)]
    enum Command {
        Load(String),
        Play,
        Pause,
        Seek(f64),
        Volume(f64),
    }

    #[derive(Default)]
    struct MockEngine {
        commands: RefCell<Vec<Command>>,
        position: Cell<f64>,
        duration: Cell<f64>,
    }

    impl MockEngine {
        fn commands(&self) -> Vec<Command> {
            self.commands.borrow().clone()
        }

        fn last_seek(&self) -> Option<f64> {
            self.commands
                .borrow()
                .iter()
                .rev()
                .find_map(|command| match command {
                    Command::Seek(seconds) => Some(*seconds),
                    _ => None,
                })
        }
    }

    impl AudioEngine for MockEngine {
        fn load(&self, url: &str) {
            self.commands.borrow_mut().push(Command::Load(url.to_string()));
        }
        fn play(&self) {
            self.commands.borrow_mut().push(Command::Play);
        }
        fn pause(&self) {
            self.commands.borrow_mut().push(Command::Pause);
        }
        fn seek(&self, seconds: f64) {
            self.commands.borrow_mut().push(Command::Seek(seconds));
        }
        fn set_volume(&self, volume: f64) {
            self.commands.borrow_mut().push(Command::Volume(volume));
        }
        fn position(&self) -> f64 {
            self.position.get()
        }
        fn duration(&self) -> f64 {
            self.duration.get()
        }
        fn take_events(&self) -> Vec<EngineEvent> {
            Vec::new()
        }
    }

    fn chapter(number: u32) -> ChapterMetadata {
        ChapterMetadata {
            number,
            name: format!("Chapter {number}"),
            name_arabic: String::new(),
            translation: String::new(),
            total_ayah: number,
            revelation_place: "Mecca".to_string(),
        }
    }

    fn catalog() -> TrackCatalog {
        let mut catalog = TrackCatalog::new();
        catalog.populate((1..=CHAPTER_COUNT).map(chapter).collect());
        catalog
    }

    fn controller() -> (SessionController, Rc<MockEngine>) {
        let engine = Rc::new(MockEngine::default());
        let controller = SessionController::new(Rc::clone(&engine) as Rc<dyn AudioEngine>);
        (controller, engine)
    }

    fn reciter(id: u32) -> ReciterProfile {
        ReciterProfile::new(id, format!("Reciter {id}"))
    }

    /// Drives a begin_play request to a playing state.
    fn play_resolved(
        controller: &mut SessionController,
        number: u32,
        url: &str,
        duration: f64,
    ) {
        let request = controller.begin_play(chapter(number), None);
        controller.complete_resolution(request.token, Ok(Some(url.to_string())));
        controller.handle_event(EngineEvent::LoadedMetadata { duration }, &catalog());
        assert_eq!(controller.session().transport, TransportState::Playing);
    }

    #[test]
    fn play_loads_and_starts_once_metadata_arrives() {
        let (mut controller, engine) = controller();
        let request = controller.begin_play(chapter(36), None);
        assert_eq!(controller.session().transport, TransportState::Loading);
        assert_eq!(request.chapter, 36);
        assert_eq!(request.reciter, 1);

        controller.complete_resolution(request.token, Ok(Some("https://a/36.mp3".to_string())));
        assert_eq!(controller.session().resource_locator, "https://a/36.mp3");
        // Still loading until the engine is ready.
        assert_eq!(controller.session().transport, TransportState::Loading);

        controller.handle_event(EngineEvent::LoadedMetadata { duration: 180.0 }, &catalog());
        assert_eq!(controller.session().transport, TransportState::Playing);
        assert_eq!(controller.session().duration_seconds, 180.0);
        assert!(engine.commands().contains(&Command::Load("https://a/36.mp3".to_string())));
        assert!(engine.commands().contains(&Command::Play));
    }

    #[test]
    fn stale_resolution_is_dropped() {
        let (mut controller, _engine) = controller();
        let first = controller.begin_play(chapter(5), None);
        let second = controller.begin_play(chapter(9), None);

        // The first request settles late; it must not clobber the second.
        controller.complete_resolution(first.token, Ok(Some("https://a/5.mp3".to_string())));
        assert_eq!(controller.session().resource_locator, "");
        assert_eq!(
            controller.session().active_chapter.as_ref().map(|c| c.number),
            Some(9)
        );

        controller.complete_resolution(second.token, Ok(Some("https://a/9.mp3".to_string())));
        assert_eq!(controller.session().resource_locator, "https://a/9.mp3");
        assert_eq!(controller.session().transport, TransportState::Loading);
    }

    #[test]
    fn missing_audio_returns_to_idle_with_diagnostic() {
        let (mut controller, engine) = controller();
        let request = controller.begin_play(chapter(12), None);
        controller.complete_resolution(request.token, Ok(None));

        let session = controller.session();
        assert_eq!(session.transport, TransportState::Idle);
        assert_eq!(session.resource_locator, "");
        // The chapter stays in the slot; only the resource is gone.
        assert_eq!(session.active_chapter.as_ref().map(|c| c.number), Some(12));
        assert_eq!(
            session.last_error,
            Some(PlayerError::ResourceUnavailable {
                chapter: 12,
                reciter: 1
            })
        );
        assert!(!engine.commands().iter().any(|c| matches!(c, Command::Load(_))));
    }

    #[test]
    fn fallback_resource_plays_without_reassigning_the_reciter() {
        let (mut controller, _engine) = controller();
        assert!(controller.begin_reciter_change(reciter(2)).is_none());

        // The gateway resolved another reciter's entry; the session keeps
        // the requested reciter.
        let request = controller.begin_play(chapter(12), None);
        assert_eq!(request.reciter, 2);
        controller.complete_resolution(request.token, Ok(Some("https://a/12-r1.mp3".to_string())));
        controller.handle_event(EngineEvent::LoadedMetadata { duration: 30.0 }, &catalog());

        assert_eq!(controller.session().active_reciter.id, 2);
        assert_eq!(controller.session().transport, TransportState::Playing);
    }

    #[test]
    fn gateway_failure_is_absorbed_into_state() {
        let (mut controller, _engine) = controller();
        let request = controller.begin_play(chapter(2), None);
        controller.complete_resolution(request.token, Err(GatewayError::Timeout));

        assert_eq!(controller.session().transport, TransportState::Idle);
        assert!(matches!(
            controller.session().last_error,
            Some(PlayerError::Gateway(_))
        ));
    }

    #[test]
    fn reciter_change_restores_position_and_resumes() {
        let (mut controller, engine) = controller();
        play_resolved(&mut controller, 36, "https://a/36-r1.mp3", 100.0);
        engine.position.set(40.0);

        let request = controller.begin_reciter_change(reciter(2)).unwrap();
        assert_eq!(controller.session().transport, TransportState::Loading);
        assert_eq!(controller.session().active_reciter.id, 2);
        assert_eq!(request.reciter, 2);

        controller.complete_resolution(request.token, Ok(Some("https://a/36-r2.mp3".to_string())));
        controller.handle_event(EngineEvent::LoadedMetadata { duration: 90.0 }, &catalog());

        assert_eq!(engine.last_seek(), Some(40.0));
        assert_eq!(controller.session().position_seconds, 40.0);
        assert_eq!(controller.session().transport, TransportState::Playing);
    }

    #[test]
    fn reciter_change_clamps_offset_beyond_new_duration() {
        let (mut controller, engine) = controller();
        play_resolved(&mut controller, 36, "https://a/36-r1.mp3", 100.0);
        engine.position.set(80.0);

        let request = controller.begin_reciter_change(reciter(3)).unwrap();
        controller.complete_resolution(request.token, Ok(Some("https://a/36-r3.mp3".to_string())));
        controller.handle_event(EngineEvent::LoadedMetadata { duration: 50.0 }, &catalog());

        assert_eq!(engine.last_seek(), Some(0.0));
        assert_eq!(controller.session().position_seconds, 0.0);
    }

    #[test]
    fn reciter_change_does_not_resume_when_paused() {
        let (mut controller, _engine) = controller();
        play_resolved(&mut controller, 7, "https://a/7-r1.mp3", 60.0);
        controller.pause();

        let request = controller.begin_reciter_change(reciter(2)).unwrap();
        controller.complete_resolution(request.token, Ok(Some("https://a/7-r2.mp3".to_string())));
        controller.handle_event(EngineEvent::LoadedMetadata { duration: 60.0 }, &catalog());

        assert_eq!(controller.session().transport, TransportState::Paused);
    }

    #[test]
    fn failed_reciter_change_reverts_and_keeps_old_resource() {
        let (mut controller, _engine) = controller();
        play_resolved(&mut controller, 36, "https://a/36-r1.mp3", 100.0);

        let request = controller.begin_reciter_change(reciter(2)).unwrap();
        controller.complete_resolution(request.token, Ok(None));

        let session = controller.session();
        assert_eq!(session.active_reciter.id, 1);
        assert_eq!(session.resource_locator, "https://a/36-r1.mp3");
        assert_eq!(session.transport, TransportState::Playing);
        assert!(session.last_error.is_some());
    }

    #[test]
    fn reciter_round_trip_restores_original_resource() {
        let (mut controller, _engine) = controller();
        play_resolved(&mut controller, 36, "https://a/36-r1.mp3", 100.0);

        let away = controller.begin_reciter_change(reciter(2)).unwrap();
        controller.complete_resolution(away.token, Ok(Some("https://a/36-r2.mp3".to_string())));
        controller.handle_event(EngineEvent::LoadedMetadata { duration: 95.0 }, &catalog());

        let back = controller.begin_reciter_change(reciter(1)).unwrap();
        controller.complete_resolution(back.token, Ok(Some("https://a/36-r1.mp3".to_string())));
        controller.handle_event(EngineEvent::LoadedMetadata { duration: 100.0 }, &catalog());

        assert_eq!(controller.session().active_reciter.id, 1);
        assert_eq!(controller.session().resource_locator, "https://a/36-r1.mp3");
    }

    #[test]
    fn selecting_active_reciter_is_a_no_op() {
        let (mut controller, _engine) = controller();
        play_resolved(&mut controller, 1, "https://a/1.mp3", 30.0);
        assert!(controller.begin_reciter_change(reciter(1)).is_none());
        assert_eq!(controller.session().transport, TransportState::Playing);
    }

    #[test]
    fn reciter_change_without_chapter_just_updates_the_session() {
        let (mut controller, engine) = controller();
        assert!(controller.begin_reciter_change(reciter(4)).is_none());
        assert_eq!(controller.session().active_reciter.id, 4);
        assert!(engine.commands().is_empty());
    }

    #[test]
    fn playlist_navigation_follows_context_and_wraps() {
        let (mut controller, _engine) = controller();
        let playlist = vec![chapter(3), chapter(36), chapter(67)];
        let request = controller.begin_play(chapter(36), Some(playlist));
        controller.complete_resolution(request.token, Ok(Some("u".to_string())));

        let next = controller.begin_next(&catalog()).unwrap();
        assert_eq!(next.chapter, 67);
        let wrapped = controller.begin_next(&catalog()).unwrap();
        assert_eq!(wrapped.chapter, 3);
        let back = controller.begin_previous(&catalog()).unwrap();
        assert_eq!(back.chapter, 67);
    }

    #[test]
    fn navigation_falls_back_to_catalog_when_chapter_not_in_context() {
        let (mut controller, _engine) = controller();
        let playlist = vec![chapter(3), chapter(67)];
        controller.begin_play(chapter(36), Some(playlist));

        let next = controller.begin_next(&catalog()).unwrap();
        assert_eq!(next.chapter, 37);
    }

    #[test]
    fn natural_order_wraps_forward_at_114() {
        let (mut controller, _engine) = controller();
        play_resolved(&mut controller, 114, "https://a/114.mp3", 50.0);
        let next = controller.begin_next(&catalog()).unwrap();
        assert_eq!(next.chapter, 1);
    }

    #[test]
    fn natural_order_wraps_backward_at_1() {
        let (mut controller, _engine) = controller();
        play_resolved(&mut controller, 1, "https://a/1.mp3", 50.0);
        let previous = controller.begin_previous(&catalog()).unwrap();
        assert_eq!(previous.chapter, 114);
    }

    #[test]
    fn navigation_without_active_chapter_reports_no_op() {
        let (mut controller, _engine) = controller();
        assert_eq!(
            controller.begin_next(&catalog()).unwrap_err(),
            PlayerError::NoActiveChapter
        );
        assert_eq!(
            controller.begin_previous(&catalog()).unwrap_err(),
            PlayerError::NoActiveChapter
        );
    }

    #[test]
    fn ended_with_auto_advance_resolves_the_next_chapter_once() {
        let (mut controller, _engine) = controller();
        play_resolved(&mut controller, 114, "https://a/114.mp3", 50.0);

        let follow_up = controller.handle_event(EngineEvent::Ended, &catalog());
        assert_eq!(follow_up.map(|r| r.chapter), Some(1));
        assert_eq!(controller.session().transport, TransportState::Loading);

        // A duplicate ended signal while the advance is in flight is inert.
        assert!(controller.handle_event(EngineEvent::Ended, &catalog()).is_none());
    }

    #[test]
    fn ended_without_auto_advance_parks_paused_at_the_end() {
        let (mut controller, _engine) = controller();
        play_resolved(&mut controller, 10, "https://a/10.mp3", 75.0);
        controller.toggle_auto_advance();

        let follow_up = controller.handle_event(EngineEvent::Ended, &catalog());
        assert!(follow_up.is_none());

        let session = controller.session();
        assert_eq!(session.transport, TransportState::Paused);
        assert_eq!(session.position_seconds, 75.0);
        assert_eq!(session.active_chapter.as_ref().map(|c| c.number), Some(10));
    }

    #[test]
    fn ended_during_end_of_stream_stall_still_advances() {
        let (mut controller, _engine) = controller();
        play_resolved(&mut controller, 114, "https://a/114.mp3", 50.0);

        // A stall right before the end: waiting, then ended with no
        // canplay in between.
        controller.handle_event(EngineEvent::Waiting, &catalog());
        assert_eq!(controller.session().transport, TransportState::Loading);

        let follow_up = controller.handle_event(EngineEvent::Ended, &catalog());
        assert_eq!(follow_up.map(|r| r.chapter), Some(1));
        assert_eq!(controller.session().transport, TransportState::Loading);

        // The advance is a fresh load now; a duplicate ended is inert.
        assert!(controller.handle_event(EngineEvent::Ended, &catalog()).is_none());
    }

    #[test]
    fn ended_during_stall_without_auto_advance_parks_paused() {
        let (mut controller, _engine) = controller();
        play_resolved(&mut controller, 10, "https://a/10.mp3", 75.0);
        controller.toggle_auto_advance();

        controller.handle_event(EngineEvent::Waiting, &catalog());
        let follow_up = controller.handle_event(EngineEvent::Ended, &catalog());
        assert!(follow_up.is_none());

        let session = controller.session();
        assert_eq!(session.transport, TransportState::Paused);
        assert_eq!(session.position_seconds, 75.0);
    }

    #[test]
    fn buffering_toggles_display_state_without_losing_context() {
        let (mut controller, _engine) = controller();
        let playlist = vec![chapter(3), chapter(36), chapter(67)];
        let request = controller.begin_play(chapter(36), Some(playlist.clone()));
        controller.complete_resolution(request.token, Ok(Some("u".to_string())));
        controller.handle_event(EngineEvent::LoadedMetadata { duration: 100.0 }, &catalog());
        controller.handle_event(EngineEvent::TimeUpdate { position: 30.0 }, &catalog());

        controller.handle_event(EngineEvent::Waiting, &catalog());
        assert_eq!(controller.session().transport, TransportState::Loading);
        assert_eq!(controller.session().position_seconds, 30.0);
        assert_eq!(
            controller.session().navigation_context.as_deref(),
            Some(playlist.as_slice())
        );

        controller.handle_event(EngineEvent::CanPlay, &catalog());
        assert_eq!(controller.session().transport, TransportState::Playing);
    }

    #[test]
    fn seek_clamps_and_is_optimistic() {
        let (mut controller, engine) = controller();
        play_resolved(&mut controller, 18, "https://a/18.mp3", 100.0);

        controller.seek_to(150.0);
        assert_eq!(controller.session().position_seconds, 100.0);
        assert_eq!(engine.last_seek(), Some(100.0));

        controller.seek_to(-4.0);
        assert_eq!(controller.session().position_seconds, 0.0);
        assert_eq!(engine.last_seek(), Some(0.0));
    }

    #[test]
    fn seek_is_a_no_op_before_duration_is_known() {
        let (mut controller, engine) = controller();
        let request = controller.begin_play(chapter(18), None);
        controller.complete_resolution(request.token, Ok(Some("u".to_string())));

        controller.seek_to(30.0);
        assert_eq!(engine.last_seek(), None);
        assert_eq!(controller.session().position_seconds, 0.0);
    }

    #[test]
    fn transport_commands_without_chapter_are_no_ops() {
        let (mut controller, engine) = controller();
        controller.toggle_play();
        controller.play();
        controller.pause();
        controller.seek_to(10.0);
        assert!(engine.commands().is_empty());
        assert_eq!(controller.session().transport, TransportState::Idle);
    }

    #[test]
    fn toggle_play_flips_between_playing_and_paused() {
        let (mut controller, engine) = controller();
        play_resolved(&mut controller, 55, "https://a/55.mp3", 40.0);

        controller.toggle_play();
        assert_eq!(controller.session().transport, TransportState::Paused);
        controller.toggle_play();
        assert_eq!(controller.session().transport, TransportState::Playing);
        assert!(engine.commands().contains(&Command::Pause));
    }

    #[test]
    fn volume_commands_reach_the_engine_with_mute_applied() {
        let (mut controller, engine) = controller();
        controller.set_volume(0.5);
        controller.toggle_mute();
        controller.toggle_mute();
        assert_eq!(
            engine
                .commands()
                .iter()
                .filter_map(|c| match c {
                    Command::Volume(v) => Some(*v),
                    _ => None,
                })
                .collect::<Vec<_>>(),
            vec![0.5, 0.0, 0.5]
        );
        assert_eq!(controller.session().volume, 0.5);
    }
}
