use dioxus::prelude::*;

use crate::components::views::{PlaylistCard, CURATED_PLAYLISTS};
use crate::components::{AppView, PlayerHandle};
use crate::player::TrackCatalog;

#[component]
pub fn HomeView() -> Element {
    let mut view = use_context::<Signal<AppView>>();
    let player = use_context::<PlayerHandle>();
    let catalog = use_context::<Signal<TrackCatalog>>();

    let start_player = player.clone();
    let featured = CURATED_PLAYLISTS.len().min(3);

    rsx! {
        section { class: "home",
            div { class: "home-hero",
                h2 { "Welcome to Tartil" }
                p { class: "home-tagline",
                    "Listen to the Quran surah by surah, with the reciter of your choice."
                }
                div { class: "home-actions",
                    button {
                        class: "home-start",
                        onclick: move |_| {
                            let first = catalog.peek().chapter_or_placeholder(1);
                            start_player.play_chapter(first);
                        },
                        "Start from Al-Fatihah"
                    }
                    button {
                        class: "home-browse",
                        onclick: move |_| view.set(AppView::Chapters),
                        "Browse all surahs"
                    }
                }
            }

            h3 { class: "home-section-title", "Curated playlists" }
            div { class: "playlist-grid",
                for index in 0..featured {
                    PlaylistCard { index }
                }
            }
        }
    }
}
