//! Invisible component that pumps audio-engine events into the session
//! controller on a fixed tick, the same cadence the playback state is
//! polled at in the browser.

use dioxus::prelude::*;

#[cfg(target_arch = "wasm32")]
use crate::components::PlayerHandle;

#[cfg(target_arch = "wasm32")]
#[component]
pub fn AudioController() -> Element {
    let player = use_context::<PlayerHandle>();

    use_effect(move || {
        let player = player.clone();
        spawn(async move {
            loop {
                gloo_timers::future::TimeoutFuture::new(200).await;
                player.pump();
            }
        });
    });

    rsx! {}
}

// Playback only exists in the browser; native builds render nothing here.
#[cfg(not(target_arch = "wasm32"))]
#[component]
pub fn AudioController() -> Element {
    rsx! {}
}
