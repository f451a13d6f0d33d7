// Retrieval orchestration.
// Runs the fallback chain: fetch, then stale cache, then default city, then give up.

use std::future::Future;

use crate::error::{GeolocationError, Result};
use crate::location::{Geolocator, LocationProvider};
use crate::state::StatusLine;
use crate::weather::{Coordinates, Fetched, Query, WeatherClient, WeatherReport};

/// Where weather reports come from, as seen by the orchestrator.
pub trait WeatherSource: Send + Sync {
    /// Cache-aware fetch. Fails on transport or API errors.
    fn fetch(&self, query: &Query) -> impl Future<Output = Result<Fetched>> + Send;

    /// Last known report for a query regardless of age.
    fn stale(&self, query: &Query) -> Option<WeatherReport>;
}

impl WeatherSource for WeatherClient {
    async fn fetch(&self, query: &Query) -> Result<Fetched> {
        match query {
            Query::City(name) => self.fetch_by_city(name).await,
            Query::Coordinates(c) => self.fetch_by_coordinates(c.latitude, c.longitude).await,
        }
    }

    fn stale(&self, query: &Query) -> Option<WeatherReport> {
        WeatherClient::stale(self, query)
    }
}

/// How a retrieval ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Fetched over the network.
    Fresh(WeatherReport),
    /// Served from a fresh cache entry.
    Cached(WeatherReport),
    /// Fetch failed; an expired cache entry was used instead.
    Stale(WeatherReport),
    /// Fetch failed with nothing cached; the default city is shown instead.
    DefaultCity(WeatherReport),
    /// Every step failed. Nothing to render.
    Unavailable,
    /// The position could not be determined.
    LocationFailed(GeolocationError),
}

/// Result of one search, ready to be applied to the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct Retrieval {
    /// The query that was attempted. `None` when no position was obtained.
    pub query: Option<Query>,
    pub outcome: Outcome,
    /// Default city at the time of the search.
    pub default_city: String,
}

impl Retrieval {
    /// Report to render, if any.
    pub fn report(&self) -> Option<&WeatherReport> {
        match &self.outcome {
            Outcome::Fresh(report)
            | Outcome::Cached(report)
            | Outcome::Stale(report)
            | Outcome::DefaultCity(report) => Some(report),
            Outcome::Unavailable | Outcome::LocationFailed(_) => None,
        }
    }

    /// Name of the rendered location, falling back to what was asked for.
    pub fn display_name(&self) -> Option<String> {
        let report = self.report()?;
        let fallback = match (&self.outcome, &self.query) {
            (Outcome::DefaultCity(_), _) => self.default_city.clone(),
            (_, Some(query)) => query.to_string(),
            (_, None) => String::new(),
        };
        Some(report.display_name(&fallback).to_string())
    }

    fn is_location_search(&self) -> bool {
        matches!(self.query, Some(Query::Coordinates(_))) || self.query.is_none()
    }

    /// Status line describing the outcome.
    pub fn status(&self) -> StatusLine {
        let name = self.display_name().unwrap_or_default();
        match &self.outcome {
            Outcome::Fresh(_) | Outcome::Cached(_) if self.is_location_search() => {
                StatusLine::info(format!("Location: {}", name))
            }
            Outcome::Fresh(_) => StatusLine::info(format!("Fresh data received: {}", name)),
            Outcome::Cached(_) => {
                let asked = self.query.as_ref().map(Query::to_string).unwrap_or(name);
                StatusLine::info(format!("Showing cached data: {}", asked))
            }
            Outcome::Stale(_) => StatusLine::info("Showing stale cached data."),
            Outcome::DefaultCity(_) => {
                StatusLine::info(format!("Showing default city: {}", self.default_city))
            }
            Outcome::Unavailable if self.is_location_search() => {
                StatusLine::error("Could not fetch weather for your location.")
            }
            Outcome::Unavailable => {
                StatusLine::error("No data available. Please try again later.")
            }
            Outcome::LocationFailed(e) => {
                StatusLine::error(format!("Geolocation denied or failed: {}", e))
            }
        }
    }
}

/// Composes weather lookups with the fallback policy.
pub struct Retriever<S> {
    source: S,
    default_city: String,
    location_fallback: bool,
}

impl<S: WeatherSource> Retriever<S> {
    pub fn new(source: S, default_city: impl Into<String>) -> Self {
        Self {
            source,
            default_city: default_city.into(),
            location_fallback: false,
        }
    }

    /// Let failed coordinate lookups fall back to the default city too.
    pub fn with_location_fallback(mut self, enabled: bool) -> Self {
        self.location_fallback = enabled;
        self
    }

    #[cfg(test)]
    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn search_city(&self, city: &str) -> Retrieval {
        self.retrieve(Query::city(city)).await
    }

    pub async fn search_coordinates(&self, coords: Coordinates) -> Retrieval {
        self.retrieve(Query::Coordinates(coords)).await
    }

    /// Resolve the current position, then search it.
    pub async fn search_current_location<P: LocationProvider>(
        &self,
        geolocator: &Geolocator<P>,
    ) -> Retrieval {
        match geolocator.locate().await {
            Ok(coords) => self.search_coordinates(coords).await,
            Err(e) => Retrieval {
                query: None,
                outcome: Outcome::LocationFailed(e),
                default_city: self.default_city.clone(),
            },
        }
    }

    /// Run the full chain for a query.
    pub async fn retrieve(&self, query: Query) -> Retrieval {
        let outcome = match self.source.fetch(&query).await {
            Ok(Fetched {
                report,
                served_from_cache: true,
            }) => Outcome::Cached(report),
            Ok(Fetched { report, .. }) => Outcome::Fresh(report),
            Err(e) => {
                tracing::warn!(%query, error = %e, "fetch failed, falling back");
                self.fall_back(&query).await
            }
        };

        Retrieval {
            query: Some(query),
            outcome,
            default_city: self.default_city.clone(),
        }
    }

    async fn fall_back(&self, query: &Query) -> Outcome {
        if let Some(report) = self.source.stale(query) {
            tracing::info!(%query, "showing stale cache entry");
            return Outcome::Stale(report);
        }

        let try_default = match query {
            Query::City(_) => !query.is_city(&self.default_city),
            Query::Coordinates(_) => self.location_fallback,
        };

        if try_default {
            tracing::info!(city = %self.default_city, "trying default city");
            match self.source.fetch(&Query::city(&self.default_city)).await {
                Ok(fetched) => return Outcome::DefaultCity(fetched.report),
                Err(e) => {
                    tracing::warn!(error = %e, "default city fetch failed");
                }
            }
        }

        tracing::error!(%query, "no weather data available");
        Outcome::Unavailable
    }
}
