use dioxus::prelude::*;

use crate::api::ChapterMetadata;
use crate::components::views::CURATED_PLAYLISTS;
use crate::components::{AppView, Icon, PlayerHandle};
use crate::player::{TrackCatalog, TransportState};

#[component]
pub fn PlaylistDetailView(index: usize) -> Element {
    let mut view = use_context::<Signal<AppView>>();
    let player = use_context::<PlayerHandle>();
    let catalog = use_context::<Signal<TrackCatalog>>();

    let Some(playlist) = CURATED_PLAYLISTS.get(index) else {
        return rsx! {
            p { class: "view-note", "This playlist does not exist." }
        };
    };

    // Resolve playlist numbers through the catalog; placeholders keep the
    // view usable before the chapter list has loaded.
    let chapters: Vec<ChapterMetadata> = {
        let catalog = catalog.read();
        playlist
            .chapters
            .iter()
            .map(|number| catalog.chapter_or_placeholder(*number))
            .collect()
    };

    let session = player.session();
    let now_playing = session
        .active_chapter
        .as_ref()
        .filter(|_| session.transport == TransportState::Playing)
        .map(|chapter| chapter.number);

    let play_all_player = player.clone();
    let play_all_chapters = chapters.clone();

    rsx! {
        section { class: "playlist-detail",
            div { class: "playlist-hero {playlist.accent}",
                button {
                    class: "playlist-back",
                    title: "Back to playlists",
                    onclick: move |_| view.set(AppView::Playlists),
                    Icon { name: "back", class: "playlist-back-icon" }
                }
                div { class: "playlist-hero-text",
                    p { class: "playlist-hero-kicker", "Playlist" }
                    h1 { "{playlist.title}" }
                    p { class: "playlist-hero-subtitle", "{playlist.subtitle}" }
                    p { class: "playlist-hero-description", "{playlist.description}" }
                    button {
                        class: "playlist-play-all",
                        onclick: move |_| {
                            if let Some(first) = play_all_chapters.first().cloned() {
                                play_all_player
                                    .play_from_playlist(first, play_all_chapters.clone());
                            }
                        },
                        Icon { name: "play", class: "playlist-play-icon" }
                        span { "Play All" }
                    }
                }
            }

            h2 { class: "playlist-tracks-heading", "Surahs in this playlist" }
            ul { class: "playlist-tracks",
                for (position , chapter) in chapters.iter().cloned().enumerate() {
                    PlaylistTrackRow {
                        position,
                        playing: now_playing == Some(chapter.number),
                        playlist: chapters.clone(),
                        chapter,
                    }
                }
            }
        }
    }
}

#[component]
fn PlaylistTrackRow(
    position: usize,
    chapter: ChapterMetadata,
    playlist: Vec<ChapterMetadata>,
    playing: bool,
) -> Element {
    let player = use_context::<PlayerHandle>();
    let track_number = position + 1;
    let row_chapter = chapter.clone();

    rsx! {
        li {
            class: if playing { "playlist-track playing" } else { "playlist-track" },
            onclick: move |_| player.play_from_playlist(row_chapter.clone(), playlist.clone()),
            span { class: "playlist-track-index", "{track_number}" }
            div { class: "playlist-track-text",
                span { class: "playlist-track-name", "{chapter.name}" }
                if !chapter.name_arabic.is_empty() {
                    span { class: "playlist-track-arabic", "{chapter.name_arabic}" }
                }
            }
            if chapter.total_ayah > 0 {
                span { class: "playlist-track-meta", "{chapter.total_ayah} verses" }
            }
        }
    }
}
