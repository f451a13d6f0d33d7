// UI state module.
// Status line and favorites panel state driven by the app loop.

pub mod favorites;
pub mod status;

pub use favorites::FavoritesPanel;
pub use status::StatusLine;
