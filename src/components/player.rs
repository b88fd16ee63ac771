use dioxus::prelude::*;

use crate::api::ReciterProfile;
use crate::components::{Icon, PlayerHandle};
use crate::player::TransportState;

/// m:ss rendering for the progress readout.
fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }
    let total = seconds as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

#[component]
pub fn PlayerBar() -> Element {
    let player = use_context::<PlayerHandle>();
    let reciters = use_context::<Signal<Vec<ReciterProfile>>>();
    let session = player.session();

    let Some(chapter) = session.active_chapter.clone() else {
        return rsx! {
            footer { class: "player-bar",
                p { class: "player-empty", "Select a surah to begin listening" }
            }
        };
    };

    let is_playing = session.transport == TransportState::Playing;
    let is_loading = session.transport == TransportState::Loading;
    let play_icon = if is_playing { "pause" } else { "play" };
    let volume_icon = if session.muted { "volume-muted" } else { "volume" };
    let elapsed = format_time(session.position_seconds);
    let total = format_time(session.duration_seconds);
    let seek_disabled = session.duration_seconds <= 0.0;

    let player_for_prev = player.clone();
    let player_for_toggle = player.clone();
    let player_for_next = player.clone();
    let player_for_seek = player.clone();
    let player_for_volume = player.clone();
    let player_for_mute = player.clone();
    let player_for_repeat = player.clone();
    let player_for_reciter = player.clone();
    let reciter_list = reciters();

    rsx! {
        footer { class: "player-bar",
            div { class: "player-track",
                div { class: "player-artwork", "{chapter.number}" }
                div { class: "player-track-text",
                    span { class: "player-track-name", "{chapter.name}" }
                    span { class: "player-track-sub",
                        if chapter.name_arabic.is_empty() {
                            "{session.active_reciter.name}"
                        } else {
                            "{chapter.name_arabic} · {session.active_reciter.name}"
                        }
                    }
                    if let Some(error) = &session.last_error {
                        span { class: "player-error", "{error}" }
                    }
                }
            }

            div { class: "player-transport",
                div { class: "player-buttons",
                    button {
                        class: "player-button",
                        title: "Previous surah",
                        onclick: move |_| player_for_prev.play_previous(),
                        Icon { name: "previous", class: "player-icon" }
                    }
                    button {
                        class: "player-button player-button-main",
                        title: "Play or pause",
                        onclick: move |_| player_for_toggle.toggle_play(),
                        if is_loading {
                            span { class: "player-spinner" }
                        } else {
                            Icon { name: "{play_icon}", class: "player-icon" }
                        }
                    }
                    button {
                        class: "player-button",
                        title: "Next surah",
                        onclick: move |_| player_for_next.play_next(),
                        Icon { name: "next", class: "player-icon" }
                    }
                    button {
                        class: if session.auto_advance { "player-button player-repeat active" } else { "player-button player-repeat" },
                        title: "Continue with the next surah when this one ends",
                        onclick: move |_| player_for_repeat.toggle_auto_advance(),
                        Icon { name: "repeat", class: "player-icon" }
                    }
                }
                div { class: "player-progress",
                    span { class: "player-time", "{elapsed}" }
                    input {
                        class: "player-slider",
                        r#type: "range",
                        min: "0",
                        max: "{session.duration_seconds}",
                        step: "0.1",
                        value: "{session.position_seconds}",
                        disabled: seek_disabled,
                        oninput: move |evt| {
                            if let Ok(seconds) = evt.value().parse::<f64>() {
                                player_for_seek.seek_to(seconds);
                            }
                        },
                    }
                    span { class: "player-time", "{total}" }
                }
            }

            div { class: "player-side",
                select {
                    class: "player-reciter-select",
                    value: "{session.active_reciter.id}",
                    onchange: move |evt| {
                        if let Ok(id) = evt.value().parse::<u32>() {
                            let reciters = reciters.peek();
                            if let Some(reciter) = reciters.iter().find(|r| r.id == id) {
                                player_for_reciter.change_reciter(reciter.clone());
                            }
                        }
                    },
                    for reciter in reciter_list {
                        option { value: "{reciter.id}", "{reciter.name}" }
                    }
                }
                button {
                    class: "player-button",
                    title: "Mute or unmute",
                    onclick: move |_| player_for_mute.toggle_mute(),
                    Icon { name: "{volume_icon}", class: "player-icon" }
                }
                input {
                    class: "player-slider player-volume",
                    r#type: "range",
                    min: "0",
                    max: "1",
                    step: "0.01",
                    value: "{session.volume}",
                    oninput: move |evt| {
                        if let Ok(volume) = evt.value().parse::<f64>() {
                            player_for_volume.set_volume(volume);
                        }
                    },
                }
            }
        }
    }
}
