//! Weather product stores
//!
//! Provides the store adapters for the application layer:
//! - `MokaProductStore`: in-memory store, lost on restart
//! - `RedbProductStore`: embedded persistent store

mod moka_store;
mod redb_store;

use std::sync::Arc;

use application::{error::ApplicationError, ports::WeatherProductStore};
use tracing::info;

pub use moka_store::{DEFAULT_MAX_ENTRIES, MokaProductStore};
pub use redb_store::RedbProductStore;

use crate::config::{CacheBackend, CacheConfig};

/// Store statistics for monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Lookups that found a product
    pub hits: u64,
    /// Lookups that found nothing
    pub misses: u64,
    /// Current number of products
    pub entries: u64,
}

impl StoreStats {
    /// Calculate the hit rate as a fraction (0.0 - 1.0)
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Build the store selected by `config`
///
/// # Errors
///
/// Returns an error if the persistent store cannot be opened.
pub fn build_product_store(
    config: &CacheConfig,
) -> Result<Arc<dyn WeatherProductStore>, ApplicationError> {
    match config.backend {
        CacheBackend::Memory => {
            info!(max_entries = config.max_entries, "Using in-memory product store");
            Ok(Arc::new(MokaProductStore::with_capacity(config.max_entries)))
        },
        CacheBackend::Redb => {
            info!(path = %config.path, "Using persistent product store");
            Ok(Arc::new(RedbProductStore::new(&config.path)?))
        },
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use domain::WeatherProduct;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn hit_rate_of_empty_stats_is_zero() {
        assert!(StoreStats::default().hit_rate().abs() < f64::EPSILON);
    }

    #[test]
    fn hit_rate_counts_hits() {
        let stats = StoreStats {
            hits: 3,
            misses: 1,
            entries: 3,
        };
        assert!((stats.hit_rate() - 0.75).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn builds_memory_store_by_default() {
        let store = build_product_store(&CacheConfig::default()).unwrap();
        store
            .save(WeatherProduct::new("METAR_KATL", "{}", Utc::now()))
            .await
            .unwrap();
        assert!(store.find_by_key("METAR_KATL").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn builds_redb_store_at_configured_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("metar.redb");
        let config = CacheConfig {
            backend: CacheBackend::Redb,
            path: path.to_string_lossy().into_owned(),
            ..CacheConfig::default()
        };

        let store = build_product_store(&config).unwrap();
        store
            .save(WeatherProduct::new("METAR_KATL", "{}", Utc::now()))
            .await
            .unwrap();

        assert!(path.exists());
    }
}
