// Location lookup.
// One-shot position requests bounded by a timeout, with reuse of a recent fix.

use std::future::Future;
use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::config::{GeolocationConfig, LocationSource};
use crate::error::{GeolocationError, NimbusError, Result};
use crate::weather::Coordinates;

const IP_LOOKUP_URL: &str = "http://ip-api.com/json/";

/// Options for a single position request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocateOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    pub maximum_age: Duration,
}

impl Default for LocateOptions {
    fn default() -> Self {
        Self {
            high_accuracy: false,
            timeout: Duration::from_secs(8),
            maximum_age: Duration::from_secs(600),
        }
    }
}

impl From<&GeolocationConfig> for LocateOptions {
    fn from(config: &GeolocationConfig) -> Self {
        Self {
            high_accuracy: config.high_accuracy,
            timeout: config.timeout(),
            maximum_age: config.maximum_age(),
        }
    }
}

/// Something that can report the device position.
pub trait LocationProvider: Send + Sync {
    fn current_position(
        &self,
        high_accuracy: bool,
    ) -> impl Future<Output = std::result::Result<Coordinates, GeolocationError>> + Send;
}

/// Approximate position from the public IP address.
///
/// IP lookups have one accuracy level, so `high_accuracy` has no effect.
#[derive(Debug, Clone)]
pub struct IpLocator {
    client: Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

impl IpLocator {
    pub fn new() -> Result<Self> {
        Self::with_url(IP_LOOKUP_URL)
    }

    pub fn with_url(url: &str) -> Result<Self> {
        let client = Client::builder().build().map_err(NimbusError::Network)?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

impl LocationProvider for IpLocator {
    async fn current_position(
        &self,
        _high_accuracy: bool,
    ) -> std::result::Result<Coordinates, GeolocationError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("fields", "status,message,lat,lon")])
            .send()
            .await
            .map_err(|e| GeolocationError::Unavailable(e.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(GeolocationError::PermissionDenied);
            }
            status if !status.is_success() => {
                return Err(GeolocationError::Unavailable(format!("HTTP {}", status)));
            }
            _ => {}
        }

        let body: IpLookupResponse = response
            .json()
            .await
            .map_err(|e| GeolocationError::Unavailable(e.to_string()))?;

        match (body.status.as_str(), body.lat, body.lon) {
            ("success", Some(lat), Some(lon)) => Ok(Coordinates::new(lat, lon)),
            _ => Err(GeolocationError::Unavailable(
                body.message.unwrap_or_else(|| "lookup failed".to_string()),
            )),
        }
    }
}

/// Always reports the same position.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocator(pub Coordinates);

impl LocationProvider for FixedLocator {
    async fn current_position(
        &self,
        _high_accuracy: bool,
    ) -> std::result::Result<Coordinates, GeolocationError> {
        Ok(self.0)
    }
}

/// Provider selected by configuration.
#[derive(Debug, Clone)]
pub enum Locator {
    Ip(IpLocator),
    Fixed(FixedLocator),
}

impl Locator {
    pub fn from_config(config: &GeolocationConfig) -> Result<Self> {
        match (config.provider, config.fixed_coordinates()) {
            (LocationSource::Fixed, Some(coords)) => Ok(Locator::Fixed(FixedLocator(coords))),
            (LocationSource::Fixed, None) => Err(NimbusError::Config(
                "fixed location provider needs latitude and longitude".to_string(),
            )),
            (LocationSource::Ip, _) => Ok(Locator::Ip(IpLocator::new()?)),
        }
    }
}

impl LocationProvider for Locator {
    async fn current_position(
        &self,
        high_accuracy: bool,
    ) -> std::result::Result<Coordinates, GeolocationError> {
        match self {
            Locator::Ip(locator) => locator.current_position(high_accuracy).await,
            Locator::Fixed(locator) => locator.current_position(high_accuracy).await,
        }
    }
}

/// Awaitable position lookup with timeout and maximum-age reuse.
///
/// Only one request is outstanding at a time; concurrent callers wait and
/// then reuse the fix the first caller obtained.
pub struct Geolocator<P> {
    provider: P,
    options: LocateOptions,
    last_fix: Mutex<Option<(Coordinates, Instant)>>,
}

impl<P: LocationProvider> Geolocator<P> {
    pub fn new(provider: P, options: LocateOptions) -> Self {
        Self {
            provider,
            options,
            last_fix: Mutex::new(None),
        }
    }

    /// Resolve the current position, or fail with denial, timeout, or unavailability.
    pub async fn locate(&self) -> std::result::Result<Coordinates, GeolocationError> {
        let mut last_fix = self.last_fix.lock().await;

        if let Some((coords, at)) = *last_fix {
            if at.elapsed() < self.options.maximum_age {
                tracing::debug!("reusing recent location fix");
                return Ok(coords);
            }
        }

        let request = self.provider.current_position(self.options.high_accuracy);
        let coords = match tokio::time::timeout(self.options.timeout, request).await {
            Ok(Ok(coords)) => coords,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "location lookup failed");
                return Err(e);
            }
            Err(_) => {
                tracing::warn!(timeout = ?self.options.timeout, "location lookup timed out");
                return Err(GeolocationError::Timeout);
            }
        };

        *last_fix = Some((coords, Instant::now()));
        Ok(coords)
    }
}
