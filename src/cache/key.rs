// Cache key derivation.
// Normalizes queries so casing and float noise map to the same cache entry.

use std::fmt;

const PREFIX: &str = "weather";

/// Deterministic storage key for a weather query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Key for a city query: the lower-cased, trimmed name.
    pub fn city(name: &str) -> Self {
        Self(format!("{}:{}", PREFIX, name.trim().to_lowercase()))
    }

    /// Key for a coordinate query: both axes rounded to 3 decimal places.
    pub fn coordinates(latitude: f64, longitude: f64) -> Self {
        Self(format!(
            "{}:{},{}",
            PREFIX,
            round3(latitude),
            round3(longitude)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Format with exactly 3 decimals, never producing "-0.000".
fn round3(value: f64) -> String {
    let thousandths = (value * 1000.0).round() as i64;
    format!("{:.3}", thousandths as f64 / 1000.0)
}
