//! Upstream METAR feed port

use async_trait::async_trait;
use domain::Metar;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Result of one upstream fetch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetarBatch {
    /// Successfully parsed records in feed order
    pub records: Vec<Metar>,
    /// Stations dropped because their data was malformed
    pub rejected: usize,
}

/// Port for pulling the current observations from the upstream provider
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MetarFeedPort: Send + Sync {
    /// Fetch and parse the current feed
    ///
    /// A malformed station only increments `rejected`; an error is returned
    /// only when the feed as a whole could not be retrieved or decoded.
    async fn fetch_metars(&self) -> Result<MetarBatch, ApplicationError>;
}
