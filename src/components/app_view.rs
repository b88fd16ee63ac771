//! Defines the shared application view state.

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum AppView {
    Home,
    Chapters,
    Playlists,
    PlaylistDetail(usize),
    Reciters,
}

pub fn view_label(view: &AppView) -> &'static str {
    match view {
        AppView::Home => "Home",
        AppView::Chapters => "Surahs",
        AppView::Playlists => "Playlists",
        AppView::PlaylistDetail(_) => "Playlist",
        AppView::Reciters => "Reciters",
    }
}
