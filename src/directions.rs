//! Directions provider integration
//!
//! The organizer only needs a drawable path for an already ordered list of
//! coordinates. `GoogleDirectionsClient` asks the Directions JSON API for an
//! origin/waypoints/destination route and returns the overview polyline.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Url;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::config::DirectionsConfig;
use crate::{Result, TripcraftError};

/// Source of path geometry for an ordered list of `(lat, lng)` stops
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    /// Encoded polyline through `stops` in order, or `None` when the
    /// provider has no route.
    async fn fetch_route(&self, stops: &[(f64, f64)]) -> Result<Option<String>>;
}

/// Provider used when no directions API key is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDirections;

#[async_trait]
impl DirectionsProvider for NoDirections {
    async fn fetch_route(&self, _stops: &[(f64, f64)]) -> Result<Option<String>> {
        Ok(None)
    }
}

#[derive(Debug, Deserialize)]
struct OverviewPolyline {
    points: String,
}

#[derive(Debug, Deserialize)]
struct RouteResponse {
    overview_polyline: OverviewPolyline,
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    routes: Vec<RouteResponse>,
}

fn format_stop((lat, lng): (f64, f64)) -> String {
    format!("{lat},{lng}")
}

/// Google Directions API client
pub struct GoogleDirectionsClient {
    client: ClientWithMiddleware,
    base_url: String,
    api_key: String,
}

impl GoogleDirectionsClient {
    /// Create a client with timeout and transient-retry middleware
    pub fn new(config: &DirectionsConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| TripcraftError::config("Directions API key is not configured"))?;

        let timeout = Duration::from_secs(config.timeout_seconds.into());
        let inner = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("Tripcraft/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(inner)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key,
        })
    }

    /// Build the request URL for an ordered list of stops
    pub fn request_url(&self, stops: &[(f64, f64)]) -> Result<Url> {
        let (Some(&first), Some(&last)) = (stops.first(), stops.last()) else {
            return Err(TripcraftError::validation("a route needs at least one stop"));
        };

        let mut params = vec![
            ("origin", format_stop(first)),
            ("destination", format_stop(last)),
            ("key", self.api_key.clone()),
        ];
        if stops.len() > 2 {
            let waypoints = stops[1..stops.len() - 1]
                .iter()
                .copied()
                .map(format_stop)
                .collect::<Vec<_>>()
                .join("|");
            params.push(("waypoints", waypoints));
        }

        Url::parse_with_params(&self.base_url, &params)
            .map_err(|e| TripcraftError::config(format!("Invalid directions base URL: {e}")))
    }

    /// Pull the first route's overview polyline out of a response body
    pub fn parse_polyline(body: &str) -> Result<Option<String>> {
        let response: DirectionsResponse = serde_json::from_str(body)
            .map_err(|e| TripcraftError::api(format!("Invalid directions response: {e}")))?;

        if response.routes.is_empty() {
            debug!(status = ?response.status, "directions returned no routes");
        }

        Ok(response
            .routes
            .into_iter()
            .next()
            .map(|route| route.overview_polyline.points)
            .filter(|points| !points.is_empty()))
    }
}

#[async_trait]
impl DirectionsProvider for GoogleDirectionsClient {
    #[instrument(skip(self, stops), fields(stops = stops.len()))]
    async fn fetch_route(&self, stops: &[(f64, f64)]) -> Result<Option<String>> {
        if stops.len() < 2 {
            return Ok(None);
        }

        let url = self.request_url(stops)?;
        let start_time = Instant::now();

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TripcraftError::api(format!(
                "Directions request failed with status {status}"
            )));
        }
        let body = response.text().await?;

        let elapsed = start_time.elapsed();
        if elapsed.as_secs() > 5 {
            warn!("Slow directions response: {:.3}s", elapsed.as_secs_f64());
        }

        Self::parse_polyline(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GoogleDirectionsClient {
        let config = DirectionsConfig {
            api_key: Some("test-key".to_string()),
            ..DirectionsConfig::default()
        };
        GoogleDirectionsClient::new(&config).unwrap()
    }

    #[test]
    fn test_requires_api_key() {
        let result = GoogleDirectionsClient::new(&DirectionsConfig::default());
        assert!(matches!(result, Err(TripcraftError::Config { .. })));
    }

    #[test]
    fn test_request_url_with_waypoints() {
        let url = client()
            .request_url(&[(26.9, 75.8), (26.95, 75.85), (27.0, 75.9), (27.1, 76.0)])
            .unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("origin".to_string(), "26.9,75.8".to_string())));
        assert!(pairs.contains(&("destination".to_string(), "27.1,76".to_string())));
        assert!(pairs.contains(&("waypoints".to_string(), "26.95,75.85|27,75.9".to_string())));
        assert!(pairs.contains(&("key".to_string(), "test-key".to_string())));
    }

    #[test]
    fn test_request_url_without_waypoints() {
        let url = client().request_url(&[(1.0, 2.0), (3.0, 4.0)]).unwrap();
        assert!(url.query_pairs().all(|(k, _)| k != "waypoints"));
    }

    #[test]
    fn test_parse_polyline() {
        let body = r#"{"status": "OK", "routes": [{"overview_polyline": {"points": "a~l~Fjk~uOwHJy@P"}}]}"#;
        assert_eq!(
            GoogleDirectionsClient::parse_polyline(body).unwrap(),
            Some("a~l~Fjk~uOwHJy@P".to_string())
        );
    }

    #[test]
    fn test_parse_polyline_no_routes() {
        let body = r#"{"status": "ZERO_RESULTS", "routes": []}"#;
        assert_eq!(GoogleDirectionsClient::parse_polyline(body).unwrap(), None);
        assert_eq!(GoogleDirectionsClient::parse_polyline("{}").unwrap(), None);
    }

    #[test]
    fn test_parse_polyline_garbage() {
        assert!(GoogleDirectionsClient::parse_polyline("not json").is_err());
    }

    #[tokio::test]
    async fn test_single_stop_skips_request() {
        assert_eq!(client().fetch_route(&[(1.0, 2.0)]).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_no_directions() {
        assert_eq!(NoDirections.fetch_route(&[(1.0, 2.0), (3.0, 4.0)]).await.unwrap(), None);
    }
}
