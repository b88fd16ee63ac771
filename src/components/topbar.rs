use dioxus::prelude::*;

use crate::components::app::Theme;
use crate::components::{view_label, AppView, Icon};

#[component]
pub fn TopBar() -> Element {
    let view = use_context::<Signal<AppView>>();
    let mut theme = use_context::<Signal<Theme>>();

    let label = view_label(&view());
    let theme_icon = match theme() {
        Theme::Dark => "sun",
        Theme::Light => "moon",
    };

    rsx! {
        header { class: "topbar",
            h1 { class: "topbar-title", "{label}" }
            button {
                class: "topbar-theme-toggle",
                title: "Toggle light/dark theme",
                onclick: move |_| {
                    let next = theme().toggled();
                    theme.set(next);
                },
                Icon { name: "{theme_icon}", class: "topbar-icon" }
            }
        }
    }
}
