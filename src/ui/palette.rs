// Color palettes for the light and dark themes.

use ratatui::style::{Color, Style};

use crate::preferences::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg: Color,
    pub fg: Color,
    pub accent: Color,
    pub highlight: Color,
    pub muted: Color,
    pub danger: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                bg: Color::Reset,
                fg: Color::White,
                accent: Color::Cyan,
                highlight: Color::Yellow,
                muted: Color::DarkGray,
                danger: Color::Red,
            },
            Theme::Light => Self {
                bg: Color::White,
                fg: Color::Black,
                accent: Color::Blue,
                highlight: Color::Magenta,
                muted: Color::Gray,
                danger: Color::Red,
            },
        }
    }

    /// Base text style on the theme background.
    pub fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }
}
