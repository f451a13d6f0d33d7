// User preferences.
// Theme and last-searched city, each stored as a single scalar.

use std::fmt;

use crate::error::Result;
use crate::storage::SharedStore;

const THEME_KEY: &str = "theme";
const LAST_CITY_KEY: &str = "lastCity";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Parse a stored value. Anything but "light" is dark.
    pub fn parse(value: &str) -> Self {
        if value.trim() == "light" {
            Theme::Light
        } else {
            Theme::Dark
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Glyph for the theme toggle.
    pub fn glyph(&self) -> &'static str {
        match self {
            Theme::Light => "🌞",
            Theme::Dark => "🌙",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone)]
pub struct PreferencesStore {
    store: SharedStore,
    default_city: String,
}

impl PreferencesStore {
    pub fn new(store: SharedStore, default_city: impl Into<String>) -> Self {
        Self {
            store,
            default_city: default_city.into(),
        }
    }

    pub fn theme(&self) -> Theme {
        self.read(THEME_KEY)
            .map(|value| Theme::parse(&value))
            .unwrap_or_default()
    }

    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        self.store.set(THEME_KEY, theme.as_str())
    }

    /// Flip and persist the theme, returning the new one.
    pub fn toggle_theme(&self) -> Result<Theme> {
        let theme = self.theme().toggled();
        self.set_theme(theme)?;
        Ok(theme)
    }

    /// Last searched city, or the default city if none was saved.
    pub fn last_city(&self) -> String {
        self.read(LAST_CITY_KEY)
            .filter(|city| !city.trim().is_empty())
            .unwrap_or_else(|| self.default_city.clone())
    }

    pub fn set_last_city(&self, city: &str) -> Result<()> {
        self.store.set(LAST_CITY_KEY, city.trim())
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read preference");
                None
            }
        }
    }
}
