// Weather API module.
// Provides the cached HTTP client and response types for the current-weather endpoint.

pub mod client;
pub mod types;

pub use client::{DEFAULT_API_BASE, WeatherClient};
pub use types::*;
