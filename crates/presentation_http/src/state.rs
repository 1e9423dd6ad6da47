//! Application state shared across handlers

use std::sync::Arc;

use application::{MetarIngestionService, MetarService};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Lookup and filtering over cached observations
    pub metar_service: Arc<MetarService>,
    /// Refresh cycle, read for readiness reporting
    pub ingestion: Arc<MetarIngestionService>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("metar_service", &self.metar_service)
            .field("ingestion", &self.ingestion)
            .finish()
    }
}
