//! Application services - Use case implementations

mod ingestion_service;
mod metar_service;

pub use ingestion_service::{MetarIngestionService, RefreshOutcome, RefreshStatus};
pub use metar_service::{MetarService, StationCatalog};
