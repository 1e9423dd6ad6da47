//! Factory functions for scheduled tasks
//!
//! Provides pre-built task closures for the scheduler to run:
//! - METAR refresh (every 5 minutes by default)

use std::sync::Arc;

use application::services::{MetarIngestionService, RefreshOutcome};
use futures::future::BoxFuture;
use tracing::debug;

/// Task name for the METAR refresh
pub const METAR_REFRESH_TASK: &str = "metar_refresh";

/// Create a METAR refresh task closure
///
/// A cycle whose feed fetch failed is reported as `Err` so the scheduler
/// counts it as a failed run. Skipped cycles count as successful.
pub fn create_metar_refresh_task(
    ingestion: Arc<MetarIngestionService>,
) -> impl Fn() -> BoxFuture<'static, Result<(), String>> + Send + Sync + 'static {
    move || {
        let service = Arc::clone(&ingestion);

        Box::pin(async move {
            debug!("Running scheduled METAR refresh");

            match service.refresh().await {
                RefreshOutcome::FetchFailed => Err("METAR feed fetch failed".to_string()),
                RefreshOutcome::Skipped | RefreshOutcome::Completed { .. } => Ok(()),
            }
        })
    }
}
