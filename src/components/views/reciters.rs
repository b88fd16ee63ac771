use dioxus::prelude::*;

use crate::api::ReciterProfile;
use crate::components::{Icon, PlayerHandle};

#[component]
pub fn RecitersView() -> Element {
    let reciters = use_context::<Signal<Vec<ReciterProfile>>>();
    let player = use_context::<PlayerHandle>();
    let active_id = player.session().active_reciter.id;

    rsx! {
        section { class: "reciters",
            p { class: "view-note",
                "Choose the voice for playback. Switching mid-surah continues from the same position."
            }
            div { class: "reciter-grid",
                for reciter in reciters() {
                    ReciterCard { active: reciter.id == active_id, reciter }
                }
            }
        }
    }
}

#[component]
fn ReciterCard(reciter: ReciterProfile, active: bool) -> Element {
    let player = use_context::<PlayerHandle>();
    let card_reciter = reciter.clone();

    rsx! {
        button {
            class: if active { "reciter-card active" } else { "reciter-card" },
            onclick: move |_| player.change_reciter(card_reciter.clone()),
            Icon { name: "mic", class: "reciter-icon" }
            span { class: "reciter-name", "{reciter.name}" }
            if active {
                span { class: "reciter-active-tag", "Selected" }
            }
        }
    }
}
