use dioxus::prelude::*;

use crate::api::ChapterMetadata;
use crate::components::app::CatalogErrorSignal;
use crate::components::{Icon, PlayerHandle};
use crate::player::{TrackCatalog, TransportState};

#[component]
pub fn ChaptersView() -> Element {
    let catalog = use_context::<Signal<TrackCatalog>>();
    let catalog_error = use_context::<CatalogErrorSignal>().0;
    let player = use_context::<PlayerHandle>();

    let chapters: Vec<ChapterMetadata> = catalog.read().chapters().to_vec();

    if chapters.is_empty() {
        let note = if catalog_error().is_some() {
            "Couldn't load the surah list. Check your connection and reload."
        } else {
            "Loading the surah list…"
        };
        return rsx! {
            section { class: "chapters",
                p { class: "view-note", "{note}" }
            }
        };
    }

    let session = player.session();
    let now_playing = session
        .active_chapter
        .as_ref()
        .filter(|_| session.transport == TransportState::Playing)
        .map(|chapter| chapter.number);

    rsx! {
        section { class: "chapters",
            ul { class: "chapter-list",
                for chapter in chapters {
                    ChapterRow { playing: now_playing == Some(chapter.number), chapter }
                }
            }
        }
    }
}

#[component]
fn ChapterRow(chapter: ChapterMetadata, playing: bool) -> Element {
    let player = use_context::<PlayerHandle>();
    let revelation = chapter.revelation_label();
    let row_chapter = chapter.clone();

    rsx! {
        li {
            class: if playing { "chapter-row playing" } else { "chapter-row" },
            onclick: move |_| player.play_chapter(row_chapter.clone()),
            div { class: "chapter-badge", "{chapter.number}" }
            div { class: "chapter-text",
                div { class: "chapter-title-line",
                    h4 { class: "chapter-name", "{chapter.name}" }
                    span { class: "chapter-play",
                        Icon { name: "play", class: "chapter-play-icon" }
                    }
                }
                p { class: "chapter-sub", "{chapter.name_arabic} · {chapter.translation}" }
                p { class: "chapter-meta", "{chapter.total_ayah} verses · {revelation}" }
            }
        }
    }
}
