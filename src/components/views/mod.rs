mod chapters;
mod home;
mod playlist_detail;
mod playlists;
mod reciters;

pub use chapters::ChaptersView;
pub use home::HomeView;
pub use playlist_detail::PlaylistDetailView;
pub use playlists::{PlaylistCard, PlaylistsView, CURATED_PLAYLISTS};
pub use reciters::RecitersView;
