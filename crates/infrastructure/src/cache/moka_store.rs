//! Moka in-memory product store
//!
//! Thread-safe in-memory store for weather products. Entries never expire;
//! the capacity bound only guards against unbounded growth.

use std::sync::atomic::{AtomicU64, Ordering};

use application::{error::ApplicationError, ports::WeatherProductStore};
use async_trait::async_trait;
use domain::WeatherProduct;
use moka::future::Cache;
use tracing::{debug, instrument};

use super::StoreStats;

/// Default maximum number of products held in memory
pub const DEFAULT_MAX_ENTRIES: u64 = 10_000;

/// Moka-based in-memory product store
///
/// Each `save` is a single `insert`, so readers observe whole products only.
pub struct MokaProductStore {
    cache: Cache<String, WeatherProduct>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl std::fmt::Debug for MokaProductStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaProductStore")
            .field("entries", &self.cache.entry_count())
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .finish()
    }
}

impl MokaProductStore {
    /// Create a store with the default capacity
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }

    /// Create a store holding at most `max_entries` products
    #[must_use]
    pub fn with_capacity(max_entries: u64) -> Self {
        Self {
            cache: Cache::builder().max_capacity(max_entries).build(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Lookup statistics
    pub async fn stats(&self) -> StoreStats {
        self.cache.run_pending_tasks().await;
        StoreStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.cache.entry_count(),
        }
    }
}

impl Default for MokaProductStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WeatherProductStore for MokaProductStore {
    #[instrument(skip(self), level = "debug")]
    async fn find_by_key(&self, key: &str) -> Result<Option<WeatherProduct>, ApplicationError> {
        let found = self.cache.get(key).await;
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(key = %key, "Store hit");
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!(key = %key, "Store miss");
        }
        Ok(found)
    }

    #[instrument(skip(self, product), fields(key = %product.key), level = "debug")]
    async fn save(&self, product: WeatherProduct) -> Result<WeatherProduct, ApplicationError> {
        self.cache
            .insert(product.key.clone(), product.clone())
            .await;
        debug!("Product saved");
        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    #[tokio::test]
    async fn save_then_find_returns_product() {
        let store = MokaProductStore::new();
        let product = WeatherProduct::new("METAR_KATL", r#"{"icao":"KATL"}"#, Utc::now());

        store.save(product.clone()).await.unwrap();
        let found = store.find_by_key("METAR_KATL").await.unwrap();

        assert_eq!(found, Some(product));
    }

    #[tokio::test]
    async fn find_missing_key_returns_none() {
        let store = MokaProductStore::new();
        assert!(store.find_by_key("METAR_KJFK").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_replaces_existing_product() {
        let store = MokaProductStore::new();
        let created = Utc::now();
        let mut product = WeatherProduct::new("METAR_KATL", "old", created);
        store.save(product.clone()).await.unwrap();

        product.replace_value("new", created + Duration::minutes(5));
        store.save(product).await.unwrap();

        let found = store.find_by_key("METAR_KATL").await.unwrap().unwrap();
        assert_eq!(found.value, "new");
        assert_eq!(found.created_at, created);
    }

    #[tokio::test]
    async fn stats_track_hits_and_misses() {
        let store = MokaProductStore::new();
        store
            .save(WeatherProduct::new("METAR_KATL", "{}", Utc::now()))
            .await
            .unwrap();

        store.find_by_key("METAR_KATL").await.unwrap();
        store.find_by_key("METAR_KPDK").await.unwrap();

        let stats = store.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn debug_impl() {
        let store = MokaProductStore::default();
        let debug = format!("{store:?}");
        assert!(debug.contains("MokaProductStore"));
        assert!(debug.contains("hits"));
    }
}
