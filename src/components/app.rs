use std::rc::Rc;

use dioxus::prelude::*;
use tracing::warn;

use crate::api::{default_reciters, QuranApiClient};
use crate::components::views::{
    ChaptersView, HomeView, PlaylistDetailView, PlaylistsView, RecitersView,
};
use crate::components::{AppView, AudioController, PlayerBar, PlayerHandle, Sidebar, TopBar};
use crate::player::{AudioEngine, PlayerError, SessionController, TrackCatalog};

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn class(self) -> &'static str {
        match self {
            Theme::Light => "theme-light",
            Theme::Dark => "theme-dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Signal wrapper so the catalog-load failure has its own context entry.
#[derive(Clone, Copy)]
pub struct CatalogErrorSignal(pub Signal<Option<PlayerError>>);

#[cfg(target_arch = "wasm32")]
fn create_engine() -> Rc<dyn AudioEngine> {
    use crate::player::{NullEngine, WebAudioEngine};
    match WebAudioEngine::new() {
        Some(engine) => Rc::new(engine),
        None => {
            warn!("no document available, audio disabled");
            Rc::new(NullEngine)
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn create_engine() -> Rc<dyn AudioEngine> {
    Rc::new(crate::player::NullEngine)
}

#[component]
pub fn AppShell() -> Element {
    let controller = use_signal(|| SessionController::new(create_engine()));
    let catalog = use_signal(TrackCatalog::new);
    let mut reciters = use_signal(default_reciters);
    let catalog_error = use_signal(|| None::<PlayerError>);
    let view = use_signal(|| AppView::Home);
    let theme = use_signal(|| Theme::Dark);

    let client = QuranApiClient::default();
    let player = PlayerHandle::new(controller, catalog, client.clone());

    // Provide state via context
    use_context_provider(|| player.clone());
    use_context_provider(|| catalog);
    use_context_provider(|| reciters);
    use_context_provider(|| view);
    use_context_provider(|| theme);
    use_context_provider(|| CatalogErrorSignal(catalog_error));

    // One-shot startup loads: the chapter catalog and the reciter list.
    // Reciter failures keep the built-in list; catalog failures surface as
    // an empty state in the chapter views.
    use_effect(move || {
        let chapters_client = client.clone();
        let mut catalog = catalog.clone();
        let mut catalog_error = catalog_error.clone();
        spawn(async move {
            match chapters_client.fetch_chapter_list().await {
                Ok(chapters) => catalog.write().populate(chapters),
                Err(err) => {
                    warn!(%err, "chapter list unavailable");
                    catalog_error.set(Some(PlayerError::CatalogUnavailable));
                }
            }
        });

        let reciters_client = client.clone();
        spawn(async move {
            match reciters_client.fetch_reciter_list().await {
                Ok(list) => reciters.set(list),
                Err(err) => warn!(%err, "reciter list unavailable, keeping built-in set"),
            }
        });
    });

    let theme_class = theme().class();
    rsx! {
        div { class: "app {theme_class}",
            AudioController {}
            Sidebar {}
            div { class: "app-main",
                TopBar {}
                main { class: "app-content",
                    match view() {
                        AppView::Home => rsx! {
                            HomeView {}
                        },
                        AppView::Chapters => rsx! {
                            ChaptersView {}
                        },
                        AppView::Playlists => rsx! {
                            PlaylistsView {}
                        },
                        AppView::PlaylistDetail(index) => rsx! {
                            PlaylistDetailView { index }
                        },
                        AppView::Reciters => rsx! {
                            RecitersView {}
                        },
                    }
                }
            }
            PlayerBar {}
        }
    }
}
