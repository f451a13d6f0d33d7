// Weather API HTTP client.
// Serves fresh cache entries directly and writes every successful fetch back to the cache.

use std::time::Duration;

use reqwest::{
    Client, Response,
    header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT},
};

use crate::cache::CacheStore;
use crate::error::{NimbusError, Result};

use super::types::{Fetched, Query, WeatherReport};

pub const DEFAULT_API_BASE: &str = "https://api.openweathermap.org/data/2.5";

/// Current-weather client with a read-through/write-through cache.
///
/// No retries happen here. Fallback policy belongs to the caller.
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
    cache: CacheStore,
}

impl WeatherClient {
    /// Create a client against `base_url`, e.g. [`DEFAULT_API_BASE`].
    pub fn new(
        api_key: &str,
        base_url: &str,
        cache: CacheStore,
        timeout: Duration,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("nimbus-tui"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(NimbusError::Network)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            cache,
        })
    }

    #[cfg(test)]
    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Current weather for a city name.
    pub async fn fetch_by_city(&self, name: &str) -> Result<Fetched> {
        self.fetch_query(&Query::city(name)).await
    }

    /// Current weather for a coordinate pair.
    pub async fn fetch_by_coordinates(&self, latitude: f64, longitude: f64) -> Result<Fetched> {
        self.fetch_query(&Query::coordinates(latitude, longitude)).await
    }

    /// Fresh cache entry first, network otherwise.
    async fn fetch_query(&self, query: &Query) -> Result<Fetched> {
        let key = query.cache_key();

        if let Some(report) = self.cache.get::<WeatherReport>(&key) {
            return Ok(Fetched {
                report,
                served_from_cache: true,
            });
        }

        tracing::info!(%query, "fetching current weather");
        let report = self.request(query).await?;

        if let Err(e) = self.cache.put(&key, &report) {
            tracing::warn!(%key, error = %e, "failed to write weather cache");
        }

        Ok(Fetched {
            report,
            served_from_cache: false,
        })
    }

    /// Last cached report for a query, ignoring the TTL.
    pub fn stale(&self, query: &Query) -> Option<WeatherReport> {
        self.cache
            .get_stale::<WeatherReport>(&query.cache_key())
            .map(|entry| entry.data)
    }

    /// Issue the GET and decode the body.
    async fn request(&self, query: &Query) -> Result<WeatherReport> {
        let url = format!("{}/weather", self.base_url);
        let mut params = query.params();
        params.push(("appid", self.api_key.clone()));

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(NimbusError::Network)?;

        let response = self.check_response(response)?;
        let body = response.text().await.map_err(NimbusError::Network)?;
        let report: WeatherReport = serde_json::from_str(&body)?;
        Ok(report)
    }

    /// Check response status and convert errors.
    fn check_response(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            tracing::warn!(status = status.as_u16(), "weather API returned an error");
            Err(NimbusError::RemoteApi {
                status: status.as_u16(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheKey, CachedData, DEFAULT_TTL};
    use crate::storage::MemoryStore;
    use crate::weather::types::fixtures;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> WeatherClient {
        let cache = CacheStore::new(MemoryStore::shared(), DEFAULT_TTL);
        WeatherClient::new("test_key", &server.uri(), cache, Duration::from_secs(5))
            .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_by_city() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "Tashkent"))
            .and(query_param("appid", "test_key"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(fixtures::payload("Tashkent", 300.15)),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let fetched = client.fetch_by_city("Tashkent").await.unwrap();

        assert!(!fetched.served_from_cache);
        assert_eq!(fetched.report.name, "Tashkent");
        assert_eq!(fetched.report.main.temp, 300.15);
    }

    #[tokio::test]
    async fn test_second_fetch_served_from_cache() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(fixtures::payload("Tashkent", 300.15)),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let first = client.fetch_by_city("Tashkent").await.unwrap();
        let second = client.fetch_by_city("tashkent").await.unwrap();

        assert!(!first.served_from_cache);
        assert!(second.served_from_cache);
        assert_eq!(first.report, second.report);
    }

    #[tokio::test]
    async fn test_fetch_by_coordinates() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("lat", "41.2995"))
            .and(query_param("lon", "69.2401"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(fixtures::payload("Tashkent", 290.0)),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let fetched = client.fetch_by_coordinates(41.2995, 69.2401).await.unwrap();
        assert!(!fetched.served_from_cache);

        // Float noise lands on the same cache entry
        let again = client.fetch_by_coordinates(41.29951, 69.24009).await.unwrap();
        assert!(again.served_from_cache);
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let err = client.fetch_by_city("Atlantis").await.unwrap_err();

        assert!(matches!(err, NimbusError::RemoteApi { status: 404 }));
        assert!(client.stale(&Query::city("Atlantis")).is_none());
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let err = client.fetch_by_city("Tashkent").await.unwrap_err();

        assert!(matches!(err, NimbusError::Json(_)));
    }

    #[tokio::test]
    async fn test_transport_failure() {
        // Nothing listens on the mock server once it is dropped
        let uri = {
            let mock_server = MockServer::start().await;
            mock_server.uri()
        };

        let cache = CacheStore::new(MemoryStore::shared(), DEFAULT_TTL);
        let client =
            WeatherClient::new("test_key", &uri, cache, Duration::from_secs(2)).unwrap();
        let err = client.fetch_by_city("Tashkent").await.unwrap_err();

        assert!(matches!(err, NimbusError::Network(_)));
    }

    #[tokio::test]
    async fn test_expired_entry_triggers_network() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(fixtures::payload("Tashkent", 280.0)),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let old: WeatherReport =
            serde_json::from_value(fixtures::payload("Tashkent", 300.0)).unwrap();
        let mut entry = CachedData::new(old);
        entry.cached_at = chrono::Utc::now() - chrono::Duration::minutes(15);
        client
            .cache()
            .put_entry(&CacheKey::city("Tashkent"), &entry)
            .unwrap();

        let fetched = client.fetch_by_city("Tashkent").await.unwrap();

        assert!(!fetched.served_from_cache);
        assert_eq!(fetched.report.main.temp, 280.0);
    }
}
