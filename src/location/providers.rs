//! Geocoding providers: the `Geocoder` seam and the Nominatim client.

use super::types::{Candidate, GeocodeError, LocationQuery};
use std::io;
use std::time::Duration;

/// Hard cap on rows requested per search.
pub const RESULT_LIMIT: usize = 5;

pub const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

pub fn default_user_agent() -> String {
    format!(
        "destcheck/{} (travel-destination-validator)",
        env!("CARGO_PKG_VERSION")
    )
}

/// A text-search geocoder. One call issues at most one outbound request.
pub trait Geocoder: Send {
    fn search(&self, city: &str, country: &str) -> Result<Vec<Candidate>, GeocodeError>;
}

impl<G: Geocoder + ?Sized> Geocoder for Box<G> {
    fn search(&self, city: &str, country: &str) -> Result<Vec<Candidate>, GeocodeError> {
        (**self).search(city, country)
    }
}

// ─── Nominatim provider ─────────────────────────────────────────

/// Connection settings for the search endpoint.
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    pub endpoint: String,
    /// Sent on every request; Nominatim's usage policy requires one.
    pub user_agent: String,
    pub timeout: Duration,
    /// Optional `accept-language`. Affects the language of `address.country`.
    pub language: Option<String>,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: default_user_agent(),
            timeout: DEFAULT_TIMEOUT,
            language: None,
        }
    }
}

/// Blocking client for the OpenStreetMap Nominatim `/search` API.
pub struct NominatimClient {
    agent: ureq::Agent,
    config: GeocoderConfig,
}

impl NominatimClient {
    pub fn new(config: GeocoderConfig) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();
        Self { agent, config }
    }

    pub fn config(&self) -> &GeocoderConfig {
        &self.config
    }
}

impl Geocoder for NominatimClient {
    fn search(&self, city: &str, country: &str) -> Result<Vec<Candidate>, GeocodeError> {
        let text = LocationQuery::new(city, country).search_text();
        tracing::debug!(endpoint = %self.config.endpoint, q = %text, "geocoding request");

        let mut request = self
            .agent
            .get(&self.config.endpoint)
            .set("User-Agent", &self.config.user_agent)
            .query("q", &text)
            .query("format", "json")
            .query("addressdetails", "1")
            .query("limit", &RESULT_LIMIT.to_string());
        if let Some(ref lang) = self.config.language {
            request = request.query("accept-language", lang);
        }

        let response = request.call().map_err(|e| match e {
            ureq::Error::Status(code, resp) => GeocodeError::Service {
                status: Some(code),
                message: resp.status_text().to_string(),
            },
            ureq::Error::Transport(t) => GeocodeError::Transport(t.to_string()),
        })?;

        let candidates: Vec<Candidate> = response.into_json().map_err(|e| match e.kind() {
            io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => GeocodeError::Service {
                status: None,
                message: e.to_string(),
            },
            _ => GeocodeError::Transport(e.to_string()),
        })?;

        tracing::debug!(q = %text, rows = candidates.len(), "geocoding response");
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, timeout: Duration) -> NominatimClient {
        NominatimClient::new(GeocoderConfig {
            endpoint: format!("{}/search", server.uri()),
            user_agent: "destcheck-tests/1.0".into(),
            timeout,
            language: None,
        })
    }

    async fn search(
        client: NominatimClient,
        city: &'static str,
        country: &'static str,
    ) -> Result<Vec<Candidate>, GeocodeError> {
        tokio::task::spawn_blocking(move || client.search(city, country))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_request_shape() {
        let server = MockServer::start().await;
        let body = serde_json::json!([
            {
                "display_name": "Toronto, Ontario, Canada",
                "address": {"city": "Toronto", "state": "Ontario", "country": "Canada"}
            }
        ]);

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "Toronto, Canada"))
            .and(query_param("format", "json"))
            .and(query_param("addressdetails", "1"))
            .and(query_param("limit", "5"))
            .and(header("User-Agent", "destcheck-tests/1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        let rows = search(client, "Toronto", "Canada").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].address.country, "Canada");
        assert_eq!(rows[0].province(), Some("Ontario"));
    }

    #[tokio::test]
    async fn test_language_param() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("accept-language", "en"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = client_for(&server, Duration::from_secs(5)).config().clone();
        config.language = Some("en".into());
        let rows = search(NominatimClient::new(config), "Lyon", "France").await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        let err = search(client, "Lima", "Peru").await.unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert!(!err.is_transport());
    }

    #[tokio::test]
    async fn test_malformed_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        let err = search(client, "Lima", "Peru").await.unwrap_err();
        assert!(matches!(err, GeocodeError::Service { status: None, .. }));
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([]))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_millis(200));
        let err = search(client, "Oslo", "Norway").await.unwrap_err();
        assert!(err.is_transport());
    }

    #[test]
    fn test_unreachable_is_transport_error() {
        // Grab a free port, then close it so nothing is listening.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let client = NominatimClient::new(GeocoderConfig {
            endpoint: format!("http://127.0.0.1:{}/search", port),
            timeout: Duration::from_secs(2),
            ..GeocoderConfig::default()
        });
        let err = client.search("Oslo", "Norway").unwrap_err();
        assert!(err.is_transport());
    }

    #[test]
    fn test_default_config() {
        let cfg = GeocoderConfig::default();
        assert_eq!(cfg.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert!(cfg.user_agent.starts_with("destcheck/"));
        assert!(cfg.language.is_none());
    }
}
