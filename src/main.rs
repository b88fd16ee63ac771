use dioxus::prelude::*;

mod api;
mod components;
mod player;

use components::AppShell;

const APP_CSS: Asset = asset!("/assets/styling/app.css");

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Title { "Tartil" }
        document::Meta { name: "theme-color", content: "#0e7a5f" }
        document::Meta { name: "mobile-web-app-capable", content: "yes" }
        document::Stylesheet { href: APP_CSS }

        AppShell {}
    }
}
