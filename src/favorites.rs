// Favorite cities.
// An ordered, case-insensitive set persisted as a JSON array and rewritten on every change.

use crate::error::Result;
use crate::storage::SharedStore;

const FAVORITES_KEY: &str = "favorites";

#[derive(Clone)]
pub struct FavoritesStore {
    store: SharedStore,
}

impl FavoritesStore {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Favorites in insertion order. Unreadable data reads as an empty list.
    pub fn list(&self) -> Vec<String> {
        let raw = match self.store.get(FAVORITES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read favorites");
                return Vec::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring malformed favorites list");
            Vec::new()
        })
    }

    pub fn contains(&self, city: &str) -> bool {
        position(&self.list(), city).is_some()
    }

    /// Append `city` unless already present. Returns true if it was added.
    pub fn add(&self, city: &str) -> Result<bool> {
        let city = city.trim();
        if city.is_empty() {
            return Ok(false);
        }

        let mut favorites = self.list();
        if position(&favorites, city).is_some() {
            return Ok(false);
        }

        favorites.push(city.to_string());
        self.save(&favorites)?;
        Ok(true)
    }

    /// Remove `city` if present. Returns true if it was removed.
    pub fn remove(&self, city: &str) -> Result<bool> {
        let mut favorites = self.list();
        let Some(index) = position(&favorites, city) else {
            return Ok(false);
        };

        favorites.remove(index);
        self.save(&favorites)?;
        Ok(true)
    }

    /// Add if absent, remove if present. Returns the resulting membership.
    pub fn toggle(&self, city: &str) -> Result<bool> {
        if self.remove(city)? {
            Ok(false)
        } else {
            self.add(city)
        }
    }

    fn save(&self, favorites: &[String]) -> Result<()> {
        let json = serde_json::to_string(favorites)?;
        self.store.set(FAVORITES_KEY, &json)
    }
}

fn position(favorites: &[String], city: &str) -> Option<usize> {
    let needle = city.trim().to_lowercase();
    favorites.iter().position(|c| c.to_lowercase() == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore};
    use std::collections::HashSet;
    use std::sync::Arc;

    fn favorites() -> FavoritesStore {
        FavoritesStore::new(MemoryStore::shared())
    }

    #[test]
    fn test_empty_by_default() {
        assert!(favorites().list().is_empty());
    }

    #[test]
    fn test_add_preserves_order_and_case() {
        let favs = favorites();
        favs.add("Tashkent").unwrap();
        favs.add("Samarkand").unwrap();
        favs.add("Bukhara").unwrap();

        assert_eq!(favs.list(), vec!["Tashkent", "Samarkand", "Bukhara"]);
    }

    #[test]
    fn test_membership_is_case_insensitive() {
        let favs = favorites();
        favs.add("Tashkent").unwrap();

        assert!(favs.contains("tashkent"));
        assert!(favs.contains("TASHKENT"));
        assert!(!favs.add("tashkent").unwrap());
        assert_eq!(favs.list(), vec!["Tashkent"]);
    }

    #[test]
    fn test_remove() {
        let favs = favorites();
        favs.add("Tashkent").unwrap();
        favs.add("Samarkand").unwrap();

        assert!(favs.remove("TASHKENT").unwrap());
        assert!(!favs.remove("Tashkent").unwrap());
        assert_eq!(favs.list(), vec!["Samarkand"]);
    }

    #[test]
    fn test_toggle_reports_membership() {
        let favs = favorites();

        assert!(favs.toggle("Tashkent").unwrap());
        assert!(favs.contains("Tashkent"));

        assert!(!favs.toggle("tashkent").unwrap());
        assert!(!favs.contains("Tashkent"));
    }

    #[test]
    fn test_toggle_twice_restores_set() {
        let favs = favorites();
        favs.add("Samarkand").unwrap();
        favs.add("Bukhara").unwrap();

        for city in ["Tashkent", "Samarkand"] {
            let before: HashSet<String> = favs.list().into_iter().collect();
            favs.toggle(city).unwrap();
            favs.toggle(city).unwrap();
            let after: HashSet<String> = favs.list().into_iter().collect();
            assert_eq!(before, after);
        }
    }

    #[test]
    fn test_blank_city_is_ignored() {
        let favs = favorites();
        assert!(!favs.add("   ").unwrap());
        assert!(favs.list().is_empty());
    }

    #[test]
    fn test_malformed_list_reads_empty() {
        let store = Arc::new(MemoryStore::new());
        store.set(FAVORITES_KEY, "not a list").unwrap();

        let favs = FavoritesStore::new(store);
        assert!(favs.list().is_empty());

        // The next write replaces the corrupt value
        favs.add("Tashkent").unwrap();
        assert_eq!(favs.list(), vec!["Tashkent"]);
    }

    #[test]
    fn test_persisted_as_json_array() {
        let store = Arc::new(MemoryStore::new());
        let favs = FavoritesStore::new(store.clone());
        favs.add("Tashkent").unwrap();

        assert_eq!(
            store.get(FAVORITES_KEY).unwrap(),
            Some(r#"["Tashkent"]"#.to_string())
        );
    }
}
