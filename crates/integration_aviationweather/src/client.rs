//! AviationWeather.gov METAR client
//!
//! HTTP client for the `MetarJSON.php` GeoJSON endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::{
    models::FeatureCollection,
    parser::{ParsedFeed, parse_feed},
};

/// Feed client errors
#[derive(Debug, Error)]
pub enum FeedError {
    /// Connection to the feed failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the feed failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response body was not a usable feature collection
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Service is temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

impl From<reqwest::Error> for FeedError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() {
            Self::ConnectionFailed(e.to_string())
        } else if e.is_decode() {
            Self::ParseError(e.to_string())
        } else {
            Self::RequestFailed(e.to_string())
        }
    }
}

/// Upstream feed configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AviationWeatherConfig {
    /// Base URL of the JSON endpoints (default: <https://aviationweather.gov/cgi-bin/json>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bounding box `min_lon,min_lat,max_lon,max_lat` of stations to fetch
    #[serde(default = "default_bbox")]
    pub bbox: String,

    /// Connect timeout in milliseconds (default: 1000)
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,

    /// Overall request timeout in milliseconds (default: 10000)
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,

    /// User-Agent header sent upstream
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "https://aviationweather.gov/cgi-bin/json".to_string()
}

fn default_bbox() -> String {
    "-85.6898,30.1588,-80.8209,35.1475".to_string()
}

const fn default_connect_timeout() -> u64 {
    1_000
}

const fn default_timeout() -> u64 {
    10_000
}

fn default_user_agent() -> String {
    concat!("metar-server/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for AviationWeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            bbox: default_bbox(),
            connect_timeout_ms: default_connect_timeout(),
            timeout_ms: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl AviationWeatherConfig {
    /// Full URL of the METAR endpoint (without query)
    #[must_use]
    pub fn metar_url(&self) -> String {
        format!("{}/MetarJSON.php", self.base_url.trim_end_matches('/'))
    }
}

/// Client trait for fetching the METAR feed
#[async_trait]
pub trait MetarFeedClient: Send + Sync {
    /// Fetch the feed and parse every station in it
    async fn fetch_metars(&self) -> Result<ParsedFeed, FeedError>;
}

/// AviationWeather.gov HTTP client implementation
#[derive(Debug)]
pub struct AviationWeatherClient {
    client: Client,
    config: AviationWeatherConfig,
}

impl AviationWeatherClient {
    /// Create a new client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: AviationWeatherConfig) -> Result<Self, FeedError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| FeedError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create a new client with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_defaults() -> Result<Self, FeedError> {
        Self::new(AviationWeatherConfig::default())
    }

    /// The active configuration
    pub const fn config(&self) -> &AviationWeatherConfig {
        &self.config
    }
}

#[async_trait]
impl MetarFeedClient for AviationWeatherClient {
    #[instrument(skip(self), fields(bbox = %self.config.bbox))]
    async fn fetch_metars(&self) -> Result<ParsedFeed, FeedError> {
        let url = self.config.metar_url();
        debug!(url = %url, "Fetching METAR feed");

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .query(&[("density", "all"), ("bbox", self.config.bbox.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FeedError::RateLimitExceeded);
        }
        if status.is_server_error() {
            return Err(FeedError::ServiceUnavailable(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(FeedError::RequestFailed(format!("HTTP {status}")));
        }

        let collection: FeatureCollection = response
            .json()
            .await
            .map_err(|e| FeedError::ParseError(e.to_string()))?;

        let parsed = parse_feed(&collection.features);
        debug!(
            features = collection.features.len(),
            records = parsed.records.len(),
            rejected = parsed.rejected,
            "Parsed METAR feed"
        );
        Ok(parsed)
    }
}
