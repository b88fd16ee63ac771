use dioxus::prelude::*;

use crate::components::AppView;

/// Compiled-in curated playlists: a title, some copy for the card, and the
/// surah numbers the playlist walks through in order.
pub struct CuratedPlaylist {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub description: &'static str,
    /// CSS class selecting the card's gradient artwork.
    pub accent: &'static str,
    pub chapters: &'static [u32],
}

pub const CURATED_PLAYLISTS: &[CuratedPlaylist] = &[
    CuratedPlaylist {
        title: "Night Reflections",
        subtitle: "Recitations before sleep",
        description: "Surahs traditionally recited in the evening, from Al-Mulk to Al-Waqi'ah.",
        accent: "card-night",
        chapters: &[67, 32, 36, 56],
    },
    CuratedPlaylist {
        title: "Friday Light",
        subtitle: "For the day of Jumu'ah",
        description: "Al-Kahf and the surahs of the Friday prayer.",
        accent: "card-friday",
        chapters: &[18, 62, 87, 88],
    },
    CuratedPlaylist {
        title: "Short & Often",
        subtitle: "The end of Juz 'Amma",
        description: "Brief surahs ideal for memorization and daily prayer.",
        accent: "card-short",
        chapters: &[93, 94, 97, 99, 103, 108, 110, 112],
    },
    CuratedPlaylist {
        title: "The Refuge",
        subtitle: "Al-Mu'awwidhat",
        description: "Al-Ikhlas and the two surahs of seeking protection.",
        accent: "card-refuge",
        chapters: &[112, 113, 114],
    },
];

#[component]
pub fn PlaylistsView() -> Element {
    rsx! {
        section { class: "playlists",
            div { class: "playlist-grid",
                for index in 0..CURATED_PLAYLISTS.len() {
                    PlaylistCard { index }
                }
            }
        }
    }
}

#[component]
pub fn PlaylistCard(index: usize) -> Element {
    let mut view = use_context::<Signal<AppView>>();
    let playlist = &CURATED_PLAYLISTS[index];
    let count = playlist.chapters.len();

    rsx! {
        div {
            class: "playlist-card",
            onclick: move |_| view.set(AppView::PlaylistDetail(index)),
            h2 { class: "playlist-card-title", "{playlist.title}" }
            p { class: "playlist-card-subtitle", "{playlist.subtitle}" }
            div { class: "playlist-card-art {playlist.accent}",
                span { class: "playlist-card-count", "{count} surahs" }
                p { class: "playlist-card-description", "{playlist.description}" }
            }
        }
    }
}
