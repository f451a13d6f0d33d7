// Favorites panel state.
// Keeps the displayed favorites in sync with the store and tracks keyboard selection.

use ratatui::widgets::ListState;

/// Selectable list of favorite cities.
#[derive(Debug, Clone, Default)]
pub struct FavoritesPanel {
    pub items: Vec<String>,
    pub list_state: ListState,
}

impl FavoritesPanel {
    pub fn new(items: Vec<String>) -> Self {
        let mut panel = Self::default();
        panel.set_items(items);
        panel
    }

    /// Replace the items, keeping the selection in range.
    pub fn set_items(&mut self, items: Vec<String>) {
        self.items = items;
        let selected = match (self.list_state.selected(), self.items.len()) {
            (_, 0) => None,
            (Some(i), len) => Some(i.min(len - 1)),
            (None, _) => Some(0),
        };
        self.list_state.select(selected);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the selected city.
    pub fn selected(&self) -> Option<&str> {
        let index = self.list_state.selected()?;
        self.items.get(index).map(String::as_str)
    }

    /// Select the next item in the list.
    pub fn select_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < self.items.len() => i + 1,
            Some(i) => i, // Stay at end
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Select the previous item in the list.
    pub fn select_prev(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }
}
