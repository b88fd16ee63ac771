//! The components module contains all shared components for our app.

mod app;
mod app_view;
mod audio_controller;
mod icons;
mod player;
mod player_handle;
mod sidebar;
mod topbar;
pub mod views;

pub use app::{AppShell, Theme};
pub use app_view::{view_label, AppView};
pub use audio_controller::AudioController;
pub use icons::Icon;
pub use player::PlayerBar;
pub use player_handle::PlayerHandle;
pub use sidebar::Sidebar;
pub use topbar::TopBar;
