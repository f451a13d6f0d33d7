// Weather API response types and query model.
// Mirrors the subset of the current-weather payload the widget consumes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cache::CacheKey;

/// Condition code assumed when the payload carries no condition entry.
pub const CLEAR_SKY_CODE: i64 = 800;

/// Current-weather response for a single query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    /// Resolved location name.
    #[serde(default)]
    pub name: String,
    /// Condition entries; the first is the primary one.
    #[serde(default)]
    pub weather: Vec<Condition>,
    /// Temperatures (Kelvin), humidity, and pressure.
    pub main: Readings,
    #[serde(default)]
    pub wind: Wind,
}

impl WeatherReport {
    /// The primary condition, if the API supplied any.
    pub fn primary(&self) -> Option<&Condition> {
        self.weather.first()
    }

    /// Location name, or `None` when the API left it blank.
    pub fn location_name(&self) -> Option<&str> {
        Some(self.name.as_str()).filter(|name| !name.trim().is_empty())
    }

    /// Location name, or `fallback` when the API left it blank.
    pub fn display_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.location_name().unwrap_or(fallback)
    }
}

/// A weather condition entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default = "default_condition_code")]
    pub id: i64,
    /// Condition group label, e.g. "Clouds".
    #[serde(default)]
    pub main: String,
    /// Free-text description, e.g. "scattered clouds".
    #[serde(default)]
    pub description: String,
}

fn default_condition_code() -> i64 {
    CLEAR_SKY_CODE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Readings {
    pub temp: f64,
    pub feels_like: f64,
    #[serde(default)]
    pub humidity: u32,
    #[serde(default)]
    pub pressure: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    #[serde(default)]
    pub speed: f64,
}

/// A geographic position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// What the user asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    City(String),
    Coordinates(Coordinates),
}

impl Query {
    pub fn city(name: impl Into<String>) -> Self {
        Query::City(name.into())
    }

    pub fn coordinates(latitude: f64, longitude: f64) -> Self {
        Query::Coordinates(Coordinates::new(latitude, longitude))
    }

    /// Cache key for this query.
    pub fn cache_key(&self) -> CacheKey {
        match self {
            Query::City(name) => CacheKey::city(name),
            Query::Coordinates(c) => CacheKey::coordinates(c.latitude, c.longitude),
        }
    }

    /// Location query parameters for the weather endpoint.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            Query::City(name) => vec![("q", name.trim().to_string())],
            Query::Coordinates(c) => vec![
                ("lat", c.latitude.to_string()),
                ("lon", c.longitude.to_string()),
            ],
        }
    }

    /// Whether this query names `city`, compared case-insensitively.
    pub fn is_city(&self, city: &str) -> bool {
        match self {
            Query::City(name) => name.trim().to_lowercase() == city.trim().to_lowercase(),
            Query::Coordinates(_) => false,
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::City(name) => f.write_str(name.trim()),
            Query::Coordinates(_) => f.write_str("GPS"),
        }
    }
}

/// A report plus where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched {
    pub report: WeatherReport,
    /// True when a fresh cache entry answered without a network call.
    pub served_from_cache: bool,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::{Value, json};

    /// A realistic current-weather payload.
    pub fn payload(name: &str, temp: f64) -> Value {
        json!({
            "coord": {"lon": 69.2401, "lat": 41.2995},
            "weather": [
                {"id": 802, "main": "Clouds", "description": "scattered clouds", "icon": "03d"}
            ],
            "main": {
                "temp": temp,
                "feels_like": temp - 1.0,
                "temp_min": temp - 2.0,
                "temp_max": temp + 2.0,
                "pressure": 1012,
                "humidity": 40
            },
            "wind": {"speed": 3.6, "deg": 250},
            "name": name,
            "cod": 200
        })
    }
}
