//! Redb persistent product store
//!
//! Keeps weather products in an embedded ACID key-value file so a restarted
//! server can answer from the last observations before its first refresh.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use application::{error::ApplicationError, ports::WeatherProductStore};
use async_trait::async_trait;
use bincode::{Decode, Encode};
use chrono::{DateTime, Utc};
use domain::WeatherProduct;
use redb::{Database, ReadableDatabase, ReadableTableMetadata, TableDefinition};
use tracing::{debug, instrument, warn};

use super::StoreStats;

/// Table holding one row per product key
const PRODUCT_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("weather_products");

/// On-disk row layout
#[derive(Debug, Encode, Decode)]
struct StoredProduct {
    value: String,
    /// Unix epoch milliseconds
    created_at_ms: i64,
    /// Unix epoch milliseconds
    updated_at_ms: i64,
}

impl StoredProduct {
    fn from_product(product: &WeatherProduct) -> Self {
        Self {
            value: product.value.clone(),
            created_at_ms: product.created_at.timestamp_millis(),
            updated_at_ms: product.updated_at.timestamp_millis(),
        }
    }

    fn into_product(self, key: &str) -> Result<WeatherProduct, ApplicationError> {
        Ok(WeatherProduct {
            key: key.to_string(),
            value: self.value,
            created_at: timestamp(self.created_at_ms)?,
            updated_at: timestamp(self.updated_at_ms)?,
        })
    }
}

fn timestamp(millis: i64) -> Result<DateTime<Utc>, ApplicationError> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| ApplicationError::Internal(format!("Stored timestamp out of range: {millis}")))
}

fn internal(context: &str) -> impl FnOnce(redb::Error) -> ApplicationError + '_ {
    move |e| ApplicationError::Internal(format!("{context}: {e}"))
}

/// Redb-based persistent product store
///
/// # Auto-Recovery
///
/// If the database file is corrupted or incompatible, it is deleted and
/// recreated empty; the next refresh repopulates it.
pub struct RedbProductStore {
    db: Arc<Database>,
    path: Option<PathBuf>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl std::fmt::Debug for RedbProductStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbProductStore")
            .field("db", &"<Database>")
            .field("path", &self.path)
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .finish()
    }
}

impl RedbProductStore {
    /// Open (or create) a store at `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened after recreation.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, ApplicationError> {
        let path_buf = path.as_ref().to_path_buf();

        if let Some(parent) = path_buf.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                ApplicationError::Internal(format!(
                    "Failed to create store directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let db = match Database::create(&path_buf) {
            Ok(db) => db,
            Err(e) => {
                warn!(
                    path = %path_buf.display(),
                    error = %e,
                    "Product store corrupted or incompatible, recreating"
                );
                if path_buf.exists() {
                    fs::remove_file(&path_buf).map_err(|e| {
                        ApplicationError::Internal(format!(
                            "Failed to remove corrupted database: {e}"
                        ))
                    })?;
                }
                Database::create(&path_buf).map_err(|e| {
                    ApplicationError::Internal(format!("Failed to create Redb database: {e}"))
                })?
            },
        };

        Self::from_database(db, Some(path_buf))
    }

    /// Create a store backed by memory only
    #[cfg(test)]
    pub fn in_memory() -> Result<Self, ApplicationError> {
        let db = Database::builder()
            .create_with_backend(redb::backends::InMemoryBackend::new())
            .map_err(|e| {
                ApplicationError::Internal(format!("Failed to create in-memory Redb: {e}"))
            })?;
        Self::from_database(db, None)
    }

    fn from_database(db: Database, path: Option<PathBuf>) -> Result<Self, ApplicationError> {
        // Opening the table inside a write transaction creates it
        let write_txn = db.begin_write().map_err(|e| {
            ApplicationError::Internal(format!("Failed to begin write transaction: {e}"))
        })?;
        {
            let _ = write_txn.open_table(PRODUCT_TABLE).map_err(|e| {
                ApplicationError::Internal(format!("Failed to open product table: {e}"))
            })?;
        }
        write_txn.commit().map_err(|e| {
            ApplicationError::Internal(format!("Failed to commit transaction: {e}"))
        })?;

        Ok(Self {
            db: Arc::new(db),
            path,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        })
    }

    fn entry_count(&self) -> u64 {
        self.db
            .begin_read()
            .ok()
            .and_then(|txn| txn.open_table(PRODUCT_TABLE).ok())
            .and_then(|table| table.len().ok())
            .unwrap_or(0)
    }

    /// Lookup statistics
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entry_count(),
        }
    }
}

#[async_trait]
impl WeatherProductStore for RedbProductStore {
    #[instrument(skip(self), level = "debug")]
    async fn find_by_key(&self, key: &str) -> Result<Option<WeatherProduct>, ApplicationError> {
        let db = Arc::clone(&self.db);
        let owned_key = key.to_string();

        // Redb operations are blocking
        let bytes = tokio::task::spawn_blocking(move || {
            let read_txn = db.begin_read()?;
            let table = read_txn.open_table(PRODUCT_TABLE)?;
            Ok::<_, redb::Error>(table.get(owned_key.as_str())?.map(|v| v.value().to_vec()))
        })
        .await
        .map_err(|e| ApplicationError::Internal(format!("Task join error: {e}")))?
        .map_err(internal("Redb get error"))?;

        let Some(bytes) = bytes else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!(key = %key, "Store miss (Redb)");
            return Ok(None);
        };

        // An unreadable row is treated as absent; the next refresh overwrites it
        let decoded =
            bincode::decode_from_slice::<StoredProduct, _>(&bytes, bincode::config::standard())
                .map_err(|e| {
                    ApplicationError::Internal(format!("Stored product decode error: {e}"))
                })
                .and_then(|(stored, _)| stored.into_product(key));

        match decoded {
            Ok(product) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, "Store hit (Redb)");
                Ok(Some(product))
            },
            Err(e) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                warn!(key = %key, error = %e, "Unreadable stored product, treating as missing");
                Ok(None)
            },
        }
    }

    #[instrument(skip(self, product), fields(key = %product.key), level = "debug")]
    async fn save(&self, product: WeatherProduct) -> Result<WeatherProduct, ApplicationError> {
        let row = bincode::encode_to_vec(
            StoredProduct::from_product(&product),
            bincode::config::standard(),
        )
        .map_err(|e| ApplicationError::Internal(format!("Product encode error: {e}")))?;

        let db = Arc::clone(&self.db);
        let key = product.key.clone();

        tokio::task::spawn_blocking(move || {
            let write_txn = db.begin_write()?;
            {
                let mut table = write_txn.open_table(PRODUCT_TABLE)?;
                table.insert(key.as_str(), row.as_slice())?;
            }
            write_txn.commit()?;
            Ok::<_, redb::Error>(())
        })
        .await
        .map_err(|e| ApplicationError::Internal(format!("Task join error: {e}")))?
        .map_err(internal("Redb insert error"))?;

        debug!("Product saved (Redb)");
        Ok(product)
    }
}
