// Application configuration.
// Loaded from config.toml in the user's config directory, with an environment override for the API key.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::DEFAULT_TTL;
use crate::error::{NimbusError, Result};
use crate::storage::paths;
use crate::weather::{Coordinates, DEFAULT_API_BASE};

/// Environment variable that overrides `api_key`.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Weather API credential.
    pub api_key: String,

    /// Base URL of the weather API, without the trailing endpoint.
    pub api_base: String,

    /// City shown when every other lookup fails, and on first launch.
    pub default_city: String,

    /// How long a cached response stays eligible for normal reads.
    pub cache_ttl_secs: u64,

    /// HTTP request timeout.
    pub request_timeout_secs: u64,

    pub geolocation: GeolocationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            default_city: "Tashkent".to_string(),
            cache_ttl_secs: DEFAULT_TTL.as_secs(),
            request_timeout_secs: 10,
            geolocation: GeolocationConfig::default(),
        }
    }
}

/// Where positions come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LocationSource {
    /// Approximate position from the public IP address.
    #[default]
    Ip,
    /// Coordinates written in the config file.
    Fixed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeolocationConfig {
    pub provider: LocationSource,

    /// Used by the `fixed` provider.
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    pub high_accuracy: bool,

    pub timeout_secs: u64,

    /// A previous fix younger than this is reused.
    pub maximum_age_secs: u64,

    /// Fall back to the default city when a location lookup fails.
    pub fallback_to_default_city: bool,
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            provider: LocationSource::Ip,
            latitude: None,
            longitude: None,
            high_accuracy: false,
            timeout_secs: 8,
            maximum_age_secs: 600,
            fallback_to_default_city: false,
        }
    }
}

impl GeolocationConfig {
    /// Configured fixed position, if both axes are set.
    pub fn fixed_coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
            _ => None,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn maximum_age(&self) -> Duration {
        Duration::from_secs(self.maximum_age_secs)
    }
}

impl Config {
    /// Load from the default location, apply the environment, and validate.
    pub fn load() -> Result<Self> {
        let mut config = match paths::config_path() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Read a config file. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| NimbusError::Config(e.to_string()))
    }

    /// Apply environment overrides through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.api_key = key.trim().to_string();
        }
    }

    /// Reject configurations the widget cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(NimbusError::MissingApiKey);
        }
        if self.default_city.trim().is_empty() {
            return Err(NimbusError::Config(
                "default_city must not be empty".to_string(),
            ));
        }
        if self.cache_ttl_secs == 0 {
            return Err(NimbusError::Config(
                "cache_ttl_secs must be greater than 0".to_string(),
            ));
        }
        if !self.api_base.starts_with("http://") && !self.api_base.starts_with("https://") {
            return Err(NimbusError::Config(format!(
                "api_base must be an http(s) URL, got: {}",
                self.api_base
            )));
        }
        if self.geolocation.provider == LocationSource::Fixed
            && self.geolocation.fixed_coordinates().is_none()
        {
            return Err(NimbusError::Config(
                "geolocation.provider = \"fixed\" requires latitude and longitude".to_string(),
            ));
        }
        if self.geolocation.timeout_secs == 0 {
            tracing::warn!("geolocation.timeout_secs is 0, location lookups will always time out");
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn valid() -> Config {
        Config {
            api_key: "abc123".to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.default_city, "Tashkent");
        assert_eq!(config.cache_ttl(), Duration::from_secs(600));
        assert_eq!(config.geolocation.timeout(), Duration::from_secs(8));
        assert_eq!(config.geolocation.maximum_age(), Duration::from_secs(600));
        assert!(!config.geolocation.high_accuracy);
        assert!(!config.geolocation.fallback_to_default_city);
    }

    #[test]
    fn test_parse_partial_file() {
        let config = Config::parse(
            r#"
            api_key = "abc123"
            default_city = "Samarkand"

            [geolocation]
            provider = "fixed"
            latitude = 39.65
            longitude = 66.96
            "#,
        )
        .unwrap();

        assert_eq!(config.default_city, "Samarkand");
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.geolocation.provider, LocationSource::Fixed);
        assert_eq!(
            config.geolocation.fixed_coordinates(),
            Some(Coordinates::new(39.65, 66.96))
        );
        assert_eq!(config.geolocation.timeout_secs, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_invalid_toml() {
        let err = Config::parse("api_key = ").unwrap_err();
        assert!(matches!(err, NimbusError::Config(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load_from(&temp_dir.path().join("config.toml")).unwrap();
        assert_eq!(config.default_city, "Tashkent");
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "api_key = \"k\"\ncache_ttl_secs = 120\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api_key, "k");
        assert_eq!(config.cache_ttl(), Duration::from_secs(120));
    }

    #[test]
    fn test_env_overrides_api_key() {
        let mut config = valid();
        config.apply_env(|name| (name == API_KEY_ENV).then(|| " from-env ".to_string()));
        assert_eq!(config.api_key, "from-env");
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let mut config = valid();
        config.apply_env(|_| Some("   ".to_string()));
        assert_eq!(config.api_key, "abc123");
    }

    #[test]
    fn test_missing_api_key() {
        let err = Config::default().validate().unwrap_err();
        assert!(matches!(err, NimbusError::MissingApiKey));
    }

    #[test]
    fn test_validation_errors() {
        let mut config = valid();
        config.default_city = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = valid();
        config.cache_ttl_secs = 0;
        assert!(config.validate().is_err());

        let mut config = valid();
        config.api_base = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        let mut config = valid();
        config.geolocation.provider = LocationSource::Fixed;
        assert!(config.validate().is_err());
    }
}
