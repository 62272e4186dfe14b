//! Sensor HTTP client
//!
//! `SensorSource` is the seam between the pollers and the remote endpoint;
//! `HttpSensorSource` is the reqwest-backed implementation.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::error::{FetchError, FetchResult};
use super::types::{HistoryWindow, LatestReading};
use crate::config::SourceConfig;

/// Path of the latest-reading endpoint, relative to the base URL
pub const LATEST_PATH: &str = "/api/latest";
/// Path of the history endpoint, relative to the base URL
pub const HISTORY_PATH: &str = "/api/history";

/// Longest slice of an error body carried into a status error
const MAX_ERROR_BODY: usize = 200;

/// A remote source of temperature readings
#[async_trait]
pub trait SensorSource: Send + Sync {
    /// Fetch the most recent reading and its trend
    async fn fetch_latest(&self) -> FetchResult<LatestReading>;

    /// Fetch the window of recent readings
    async fn fetch_history(&self) -> FetchResult<HistoryWindow>;
}

/// Sensor source reached over HTTP
pub struct HttpSensorSource {
    client: Client,
    latest_url: Url,
    history_url: Url,
}

impl HttpSensorSource {
    /// Create a new client for the configured base URL
    pub fn new(config: &SourceConfig) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(FetchError::Request)?;

        Ok(Self {
            client,
            latest_url: endpoint(&config.base_url, LATEST_PATH)?,
            history_url: endpoint(&config.base_url, HISTORY_PATH)?,
        })
    }

    /// URL polled for the latest reading
    pub fn latest_url(&self) -> &Url {
        &self.latest_url
    }

    /// URL polled for the history window
    pub fn history_url(&self) -> &Url {
        &self.history_url
    }

    /// Issue a bare GET and decode the JSON body
    async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> FetchResult<T> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(FetchError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: status_message(status, &text),
            });
        }

        let body = response.bytes().await.map_err(FetchError::from_transport)?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl SensorSource for HttpSensorSource {
    async fn fetch_latest(&self) -> FetchResult<LatestReading> {
        self.get_json(&self.latest_url).await
    }

    async fn fetch_history(&self) -> FetchResult<HistoryWindow> {
        self.get_json(&self.history_url).await
    }
}

/// Join the base URL and an endpoint path, tolerating a trailing slash
fn endpoint(base_url: &str, path: &str) -> FetchResult<Url> {
    let base = base_url.trim().trim_end_matches('/');
    Url::parse(&format!("{}{}", base, path))
        .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", base_url, e)))
}

/// Human-readable message for a failed status
fn status_message(status: reqwest::StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("Unexpected status")
            .to_string();
    }
    body.chars().take(MAX_ERROR_BODY).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> SourceConfig {
        SourceConfig {
            base_url: base_url.to_string(),
            ..SourceConfig::default()
        }
    }

    #[test]
    fn test_endpoint_urls() {
        let source = HttpSensorSource::new(&config("http://sensor.local:5000")).unwrap();
        assert_eq!(source.latest_url().as_str(), "http://sensor.local:5000/api/latest");
        assert_eq!(source.history_url().as_str(), "http://sensor.local:5000/api/history");
    }

    #[test]
    fn test_trailing_slash_normalized() {
        let source = HttpSensorSource::new(&config("http://sensor.local/")).unwrap();
        assert_eq!(source.latest_url().as_str(), "http://sensor.local/api/latest");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpSensorSource::new(&config("not a url"));
        assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
    }

    #[test]
    fn test_status_message() {
        let status = reqwest::StatusCode::SERVICE_UNAVAILABLE;
        assert_eq!(status_message(status, ""), "Service Unavailable");
        assert_eq!(status_message(status, " sensor offline \n"), "sensor offline");

        let long = "x".repeat(500);
        assert_eq!(status_message(status, &long).len(), MAX_ERROR_BODY);
    }
}
