use dioxus::prelude::*;
use tracing::debug;

use crate::api::{ChapterMetadata, QuranApiClient, ReciterProfile};
use crate::player::{PlaybackSession, ResolveRequest, SessionController, TrackCatalog};

/// Clone-able handle to the playback core, provided through context so any
/// component can dispatch user intents. Every resolving intent runs as
/// begin-phase (inside a short signal write), a spawned gateway fetch, and
/// the token-guarded complete-phase; the signal is never held across an
/// await.
#[derive(Clone)]
pub struct PlayerHandle {
    controller: Signal<SessionController>,
    catalog: Signal<TrackCatalog>,
    client: QuranApiClient,
}

impl PlayerHandle {
    pub fn new(
        controller: Signal<SessionController>,
        catalog: Signal<TrackCatalog>,
        client: QuranApiClient,
    ) -> Self {
        Self {
            controller,
            catalog,
            client,
        }
    }

    /// Snapshot of the session; reading it from a component subscribes
    /// that component to session changes.
    pub fn session(&self) -> PlaybackSession {
        self.controller.read().session().clone()
    }

    pub fn play_chapter(&self, chapter: ChapterMetadata) {
        let request = {
            let mut controller = self.controller.clone();
            let request = controller.write().begin_play(chapter, None);
            request
        };
        self.spawn_resolve(request);
    }

    /// Plays `chapter` and installs `playlist` as the navigation context.
    pub fn play_from_playlist(&self, chapter: ChapterMetadata, playlist: Vec<ChapterMetadata>) {
        let request = {
            let mut controller = self.controller.clone();
            let request = controller.write().begin_play(chapter, Some(playlist));
            request
        };
        self.spawn_resolve(request);
    }

    pub fn play_next(&self) {
        let result = {
            let catalog = self.catalog.clone();
            let mut controller = self.controller.clone();
            let result = controller.write().begin_next(&catalog.peek());
            result
        };
        match result {
            Ok(request) => self.spawn_resolve(request),
            Err(err) => debug!(%err, "next ignored"),
        }
    }

    pub fn play_previous(&self) {
        let result = {
            let catalog = self.catalog.clone();
            let mut controller = self.controller.clone();
            let result = controller.write().begin_previous(&catalog.peek());
            result
        };
        match result {
            Ok(request) => self.spawn_resolve(request),
            Err(err) => debug!(%err, "previous ignored"),
        }
    }

    pub fn change_reciter(&self, reciter: ReciterProfile) {
        let request = {
            let mut controller = self.controller.clone();
            let request = controller.write().begin_reciter_change(reciter);
            request
        };
        if let Some(request) = request {
            self.spawn_resolve(request);
        }
    }

    pub fn toggle_play(&self) {
        self.controller.clone().write().toggle_play();
    }

    pub fn seek_to(&self, seconds: f64) {
        self.controller.clone().write().seek_to(seconds);
    }

    pub fn set_volume(&self, volume: f64) {
        self.controller.clone().write().set_volume(volume);
    }

    pub fn toggle_mute(&self) {
        self.controller.clone().write().toggle_mute();
    }

    pub fn toggle_auto_advance(&self) {
        self.controller.clone().write().toggle_auto_advance();
    }

    /// Drains the engine's queued events into the controller and kicks off
    /// any follow-up resolution (auto-advance). Events are applied inside
    /// one short write; follow-ups are spawned after it closes, so the
    /// ended handler cannot re-enter the controller.
    pub fn pump(&self) {
        let engine = {
            let controller = self.controller.clone();
            let engine = controller.peek().engine();
            engine
        };
        let events = engine.take_events();
        if events.is_empty() {
            return;
        }

        let mut follow_ups: Vec<ResolveRequest> = Vec::new();
        {
            let catalog = self.catalog.clone();
            let catalog = catalog.peek();
            let mut controller = self.controller.clone();
            let mut controller = controller.write();
            for event in events {
                if let Some(request) = controller.handle_event(event, &catalog) {
                    follow_ups.push(request);
                }
            }
        }
        for request in follow_ups {
            self.spawn_resolve(request);
        }
    }

    fn spawn_resolve(&self, request: ResolveRequest) {
        let client = self.client.clone();
        let mut controller = self.controller.clone();
        spawn(async move {
            let outcome = client
                .fetch_audio_resource(request.chapter, request.reciter)
                .await;
            controller.write().complete_resolution(request.token, outcome);
        });
    }
}
