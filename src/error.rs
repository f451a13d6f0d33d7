// Error types for nimbus.
// Covers weather API failures, local storage errors, geolocation, and config.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NimbusError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Weather API error: HTTP {status}")]
    RemoteApi { status: u16 },

    #[error("Malformed cache entry: {key}")]
    MalformedCache { key: String },

    #[error("Geolocation error: {0}")]
    Geolocation(#[from] GeolocationError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Missing API key: set OPENWEATHER_API_KEY or api_key in config.toml")]
    MissingApiKey,
}

/// Reasons a position request can fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeolocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("location request timed out")]
    Timeout,

    #[error("location unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, NimbusError>;
