use dioxus::prelude::*;

use crate::components::{AppView, Icon};

#[component]
pub fn Sidebar() -> Element {
    let mut view = use_context::<Signal<AppView>>();
    let current = view();

    let items = [
        (AppView::Home, "home", "Home"),
        (AppView::Chapters, "book", "Surahs"),
        (AppView::Playlists, "playlist", "Playlists"),
        (AppView::Reciters, "mic", "Reciters"),
    ];

    rsx! {
        nav { class: "sidebar",
            div { class: "sidebar-brand",
                span { class: "sidebar-logo", "ت" }
                span { class: "sidebar-title", "Tartil" }
            }
            ul { class: "sidebar-nav",
                for (target , icon , label) in items {
                    li {
                        button {
                            class: if current == target { "sidebar-item active" } else { "sidebar-item" },
                            onclick: move |_| view.set(target),
                            Icon { name: "{icon}", class: "sidebar-icon" }
                            span { "{label}" }
                        }
                    }
                }
            }
        }
    }
}
