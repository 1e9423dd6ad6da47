//! METAR feed adapter - Implements MetarFeedPort using integration_aviationweather

use application::{
    error::ApplicationError,
    ports::{MetarBatch, MetarFeedPort},
};
use async_trait::async_trait;
use integration_aviationweather::{
    AviationWeatherClient, AviationWeatherConfig, FeedError, MetarFeedClient, ParsedFeed,
};
use tracing::{debug, instrument};

/// Adapter for the AviationWeather.gov METAR feed
pub struct MetarFeedAdapter {
    client: Box<dyn MetarFeedClient>,
}

impl std::fmt::Debug for MetarFeedAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetarFeedAdapter")
            .field("client", &"MetarFeedClient")
            .finish()
    }
}

impl MetarFeedAdapter {
    /// Create an adapter over an HTTP client built from `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(config: AviationWeatherConfig) -> Result<Self, ApplicationError> {
        let client = AviationWeatherClient::new(config)
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self::with_client(client))
    }

    /// Wrap an existing feed client
    pub fn with_client(client: impl MetarFeedClient + 'static) -> Self {
        Self {
            client: Box::new(client),
        }
    }

    /// Map integration feed error to application error
    fn map_error(err: FeedError) -> ApplicationError {
        match err {
            FeedError::ConnectionFailed(e)
            | FeedError::RequestFailed(e)
            | FeedError::ServiceUnavailable(e) => ApplicationError::ExternalService(e),
            FeedError::ParseError(e) => {
                ApplicationError::ExternalService(format!("Undecodable METAR feed: {e}"))
            },
            FeedError::RateLimitExceeded => {
                ApplicationError::ExternalService("METAR feed rate limit exceeded".into())
            },
        }
    }

    fn map_feed(feed: ParsedFeed) -> MetarBatch {
        MetarBatch {
            records: feed.records,
            rejected: feed.rejected,
        }
    }
}

#[async_trait]
impl MetarFeedPort for MetarFeedAdapter {
    #[instrument(skip(self))]
    async fn fetch_metars(&self) -> Result<MetarBatch, ApplicationError> {
        let result = self.client.fetch_metars().await.map_err(Self::map_error);

        match &result {
            Ok(feed) => {
                debug!(
                    records = feed.records.len(),
                    rejected = feed.rejected,
                    "Retrieved METAR feed"
                );
            },
            Err(e) => {
                debug!(error = %e, "Failed to retrieve METAR feed");
            },
        }

        result.map(Self::map_feed)
    }
}
