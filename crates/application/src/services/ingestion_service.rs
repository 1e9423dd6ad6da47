//! METAR ingestion service
//!
//! One refresh cycle pulls the upstream feed and writes every parsed record
//! into the product store under `METAR_<station>`. Cycles never overlap and
//! never fail outward: problems are logged and summarized in the outcome.

use std::{fmt, sync::Arc, time::Instant};

use chrono::{DateTime, Utc};
use domain::{Metar, WeatherProduct, metar_key};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{MetarFeedPort, WeatherProductStore},
};

/// Summary of one refresh attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RefreshOutcome {
    /// Another cycle was still running
    Skipped,
    /// The feed could not be retrieved; the store was left untouched
    FetchFailed,
    /// The feed was processed
    Completed {
        /// Records written to the store
        stored: usize,
        /// Stations dropped by the parser
        rejected: usize,
        /// Records that could not be serialized or saved
        failed: usize,
    },
}

/// The most recent finished refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshStatus {
    pub outcome: RefreshOutcome,
    pub finished_at: DateTime<Utc>,
}

/// Fetch-parse-store cycle over the upstream feed
pub struct MetarIngestionService {
    feed: Arc<dyn MetarFeedPort>,
    store: Arc<dyn WeatherProductStore>,
    in_progress: Mutex<()>,
    last_status: RwLock<Option<RefreshStatus>>,
}

impl fmt::Debug for MetarIngestionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetarIngestionService")
            .field("last_status", &*self.last_status.read())
            .finish_non_exhaustive()
    }
}

impl MetarIngestionService {
    /// Create a new ingestion service
    pub fn new(feed: Arc<dyn MetarFeedPort>, store: Arc<dyn WeatherProductStore>) -> Self {
        Self {
            feed,
            store,
            in_progress: Mutex::new(()),
            last_status: RwLock::new(None),
        }
    }

    /// Run one refresh cycle
    ///
    /// Returns [`RefreshOutcome::Skipped`] straight away when a cycle is
    /// already running.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> RefreshOutcome {
        let Ok(_guard) = self.in_progress.try_lock() else {
            info!("METAR refresh already in progress, skipping");
            return RefreshOutcome::Skipped;
        };

        let start = Instant::now();
        let outcome = match self.feed.fetch_metars().await {
            Ok(batch) => {
                let mut stored = 0;
                let mut failed = 0;
                for metar in &batch.records {
                    match self.store_record(metar, Utc::now()).await {
                        Ok(()) => stored += 1,
                        Err(e) => {
                            warn!(station = %metar.icao, error = %e, "Failed to store METAR");
                            failed += 1;
                        },
                    }
                }
                RefreshOutcome::Completed {
                    stored,
                    rejected: batch.rejected,
                    failed,
                }
            },
            Err(e) => {
                warn!(error = %e, "METAR feed fetch failed");
                RefreshOutcome::FetchFailed
            },
        };

        if let RefreshOutcome::Completed {
            stored,
            rejected,
            failed,
        } = outcome
        {
            info!(
                stored,
                rejected,
                failed,
                duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
                "METAR refresh completed"
            );
        }

        *self.last_status.write() = Some(RefreshStatus {
            outcome,
            finished_at: Utc::now(),
        });
        outcome
    }

    /// The most recent non-skipped refresh, if any has finished
    pub fn last_status(&self) -> Option<RefreshStatus> {
        *self.last_status.read()
    }

    /// Outcome of the most recent non-skipped refresh
    pub fn last_outcome(&self) -> Option<RefreshOutcome> {
        self.last_status().map(|status| status.outcome)
    }

    async fn store_record(&self, metar: &Metar, now: DateTime<Utc>) -> Result<(), ApplicationError> {
        let key = metar_key(&metar.icao);
        let value = serde_json::to_string(metar)
            .map_err(|e| ApplicationError::Internal(format!("METAR serialization error: {e}")))?;

        let product = match self.store.find_by_key(&key).await? {
            Some(mut existing) => {
                existing.replace_value(value, now);
                existing
            },
            None => {
                debug!(key = %key, "Creating new weather product");
                WeatherProduct::new(key, value, now)
            },
        };

        self.store.save(product).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;

    use chrono::Duration;
    use domain::{StationCode, Temperature};

    use super::*;
    use crate::ports::{MetarBatch, MockMetarFeedPort, MockWeatherProductStore};

    fn record(station: &str) -> Metar {
        Metar {
            temperature: Some(Temperature { celsius: 23 }),
            ..Metar::new(StationCode::parse(station).unwrap(), "2022-01-01T00:00:00Z")
        }
    }

    fn feed_returning(records: Vec<Metar>, rejected: usize) -> MockMetarFeedPort {
        let mut feed = MockMetarFeedPort::new();
        feed.expect_fetch_metars().returning(move || {
            Ok(MetarBatch {
                records: records.clone(),
                rejected,
            })
        });
        feed
    }

    /// Store mock backed by a shared vector of saved products
    fn recording_store(
        existing: Vec<WeatherProduct>,
    ) -> (MockWeatherProductStore, Arc<StdMutex<Vec<WeatherProduct>>>) {
        let saved = Arc::new(StdMutex::new(Vec::new()));
        let mut store = MockWeatherProductStore::new();
        store
            .expect_find_by_key()
            .returning(move |key| Ok(existing.iter().find(|p| p.key == key).cloned()));
        let sink = Arc::clone(&saved);
        store.expect_save().returning(move |product| {
            sink.lock().unwrap().push(product.clone());
            Ok(product)
        });
        (store, saved)
    }

    #[tokio::test]
    async fn refresh_stores_each_record_under_prefixed_key() {
        let (store, saved) = recording_store(vec![]);
        let service = MetarIngestionService::new(
            Arc::new(feed_returning(vec![record("KATL"), record("KPDK")], 0)),
            Arc::new(store),
        );

        let outcome = service.refresh().await;

        assert_eq!(
            outcome,
            RefreshOutcome::Completed {
                stored: 2,
                rejected: 0,
                failed: 0
            }
        );
        let saved = saved.lock().unwrap();
        let keys: Vec<&str> = saved.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["METAR_KATL", "METAR_KPDK"]);
        let decoded: Metar = serde_json::from_str(&saved[0].value).unwrap();
        assert_eq!(decoded, record("KATL"));
    }

    #[tokio::test]
    async fn refresh_overwrites_existing_entry_and_keeps_created_at() {
        let created = Utc::now() - Duration::hours(1);
        let existing = WeatherProduct::new("METAR_KATL", "stale", created);
        let (store, saved) = recording_store(vec![existing]);
        let service = MetarIngestionService::new(
            Arc::new(feed_returning(vec![record("KATL")], 0)),
            Arc::new(store),
        );

        service.refresh().await;

        let saved = saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].created_at, created);
        assert!(saved[0].updated_at > created);
        assert_ne!(saved[0].value, "stale");
    }

    #[tokio::test]
    async fn refresh_reports_rejected_stations() {
        let (store, saved) = recording_store(vec![]);
        let service = MetarIngestionService::new(
            Arc::new(feed_returning(vec![record("KATL")], 1)),
            Arc::new(store),
        );

        let outcome = service.refresh().await;

        assert_eq!(
            outcome,
            RefreshOutcome::Completed {
                stored: 1,
                rejected: 1,
                failed: 0
            }
        );
        assert_eq!(saved.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn refresh_fetch_failure_leaves_store_untouched() {
        let mut feed = MockMetarFeedPort::new();
        feed.expect_fetch_metars()
            .returning(|| Err(ApplicationError::ExternalService("timeout".to_string())));
        let mut store = MockWeatherProductStore::new();
        store.expect_find_by_key().never();
        store.expect_save().never();
        let service = MetarIngestionService::new(Arc::new(feed), Arc::new(store));

        let outcome = service.refresh().await;

        assert_eq!(outcome, RefreshOutcome::FetchFailed);
        assert_eq!(service.last_outcome(), Some(RefreshOutcome::FetchFailed));
    }

    #[tokio::test]
    async fn refresh_continues_after_store_failure() {
        let mut store = MockWeatherProductStore::new();
        store.expect_find_by_key().returning(|_| Ok(None));
        store.expect_save().returning(|product| {
            if product.key == "METAR_KATL" {
                Err(ApplicationError::Internal("write failed".to_string()))
            } else {
                Ok(product)
            }
        });
        let service = MetarIngestionService::new(
            Arc::new(feed_returning(vec![record("KATL"), record("KPDK")], 0)),
            Arc::new(store),
        );

        let outcome = service.refresh().await;

        assert_eq!(
            outcome,
            RefreshOutcome::Completed {
                stored: 1,
                rejected: 0,
                failed: 1
            }
        );
    }

    #[tokio::test]
    async fn refresh_skips_while_another_cycle_runs() {
        let mut feed = MockMetarFeedPort::new();
        feed.expect_fetch_metars().never();
        let service =
            MetarIngestionService::new(Arc::new(feed), Arc::new(MockWeatherProductStore::new()));

        let _running = service.in_progress.lock().await;
        let outcome = service.refresh().await;

        assert_eq!(outcome, RefreshOutcome::Skipped);
        assert!(service.last_status().is_none());
    }

    #[tokio::test]
    async fn last_status_records_completed_refresh() {
        let (store, _saved) = recording_store(vec![]);
        let service = MetarIngestionService::new(
            Arc::new(feed_returning(vec![], 0)),
            Arc::new(store),
        );
        assert!(service.last_outcome().is_none());

        service.refresh().await;

        let status = service.last_status().unwrap();
        assert_eq!(
            status.outcome,
            RefreshOutcome::Completed {
                stored: 0,
                rejected: 0,
                failed: 0
            }
        );
        assert!(status.finished_at <= Utc::now());
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let json = serde_json::to_value(RefreshOutcome::Completed {
            stored: 3,
            rejected: 1,
            failed: 0,
        })
        .unwrap();
        assert_eq!(json["status"], "completed");
        assert_eq!(json["stored"], 3);

        let skipped = serde_json::to_value(RefreshOutcome::Skipped).unwrap();
        assert_eq!(skipped["status"], "skipped");
    }
}
