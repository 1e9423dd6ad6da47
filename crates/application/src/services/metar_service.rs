//! METAR lookup service
//!
//! Serves client requests from whatever the ingestion cycle has already
//! stored. Never calls upstream.

use std::{fmt, sync::Arc};

use domain::{Metar, MetarAttribute, StationCode, StationList, metar_key};
use tracing::{debug, instrument, warn};

use crate::{error::ApplicationError, ports::WeatherProductStore};

/// The stations a deployment accepts and the keyword that selects all of them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationCatalog {
    /// Accepted station codes, in the order group lookups return them
    pub stations: StationList,
    /// Reserved identifier expanding to every station (matched case-insensitively)
    pub group_name: String,
    /// Human-readable region used in rejection messages
    pub region_name: String,
}

impl StationCatalog {
    /// Create a catalog
    #[must_use]
    pub fn new(
        stations: StationList,
        group_name: impl Into<String>,
        region_name: impl Into<String>,
    ) -> Self {
        Self {
            stations,
            group_name: group_name.into(),
            region_name: region_name.into(),
        }
    }

    /// Whether `identifier` is the group keyword
    #[must_use]
    pub fn is_group(&self, identifier: &str) -> bool {
        identifier.eq_ignore_ascii_case(&self.group_name)
    }
}

/// Lookup and attribute filtering over the weather product store
pub struct MetarService {
    store: Arc<dyn WeatherProductStore>,
    catalog: StationCatalog,
}

impl fmt::Debug for MetarService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetarService")
            .field("catalog", &self.catalog)
            .finish_non_exhaustive()
    }
}

impl MetarService {
    /// Create a new lookup service
    pub fn new(store: Arc<dyn WeatherProductStore>, catalog: StationCatalog) -> Self {
        Self { store, catalog }
    }

    /// The configured catalog
    pub const fn catalog(&self) -> &StationCatalog {
        &self.catalog
    }

    /// Whether `code` is on the allow-list (case-insensitive)
    pub fn is_valid_station(&self, code: &str) -> bool {
        self.catalog.stations.contains(code)
    }

    /// Read the cached record for one station
    ///
    /// A missing entry and an entry that no longer decodes are both reported
    /// as `NotFound`.
    #[instrument(skip(self), fields(station = %code))]
    pub async fn get_record(&self, code: &StationCode) -> Result<Metar, ApplicationError> {
        let key = metar_key(code);
        let Some(product) = self.store.find_by_key(&key).await? else {
            debug!(key = %key, "No cached product");
            return Err(ApplicationError::NotFound(format!(
                "No METAR cached for station {code}"
            )));
        };

        serde_json::from_str(&product.value).map_err(|e| {
            warn!(key = %key, error = %e, "Cached METAR could not be decoded");
            ApplicationError::NotFound(format!("No readable METAR cached for station {code}"))
        })
    }

    /// Resolve a station code or the group keyword to records
    ///
    /// With no `attributes` the full records are returned, otherwise each
    /// record is narrowed to the station code plus the requested attributes.
    ///
    /// # Errors
    ///
    /// - `InvalidPayload` if the identifier is not accepted or nothing was found
    ///   for the group
    /// - `NotFound` if a single accepted station has no readable entry
    #[instrument(skip(self, attributes), fields(attributes = attributes.len()))]
    pub async fn lookup(
        &self,
        identifier: &str,
        attributes: &[MetarAttribute],
    ) -> Result<Vec<Metar>, ApplicationError> {
        let records = if self.catalog.is_group(identifier) {
            self.lookup_group().await
        } else {
            let code = self.accepted_code(identifier)?;
            vec![self.get_record(&code).await?]
        };

        if records.is_empty() {
            return Err(self.invalid_station(identifier));
        }

        if attributes.is_empty() {
            return Ok(records);
        }
        Ok(records
            .iter()
            .map(|record| record.filtered(attributes))
            .collect())
    }

    /// Number of accepted stations that currently have a readable entry
    pub async fn cached_station_count(&self) -> usize {
        self.lookup_group().await.len()
    }

    /// Every accepted station that can be read, in catalog order
    ///
    /// A station that cannot be read for any reason is logged and left out.
    async fn lookup_group(&self) -> Vec<Metar> {
        let mut records = Vec::with_capacity(self.catalog.stations.len());
        for code in &self.catalog.stations {
            match self.get_record(code).await {
                Ok(record) => records.push(record),
                Err(ApplicationError::NotFound(reason)) => {
                    warn!(station = %code, reason = %reason, "Skipping station without data");
                },
                Err(e) => {
                    warn!(station = %code, error = %e, "Skipping unreadable station");
                },
            }
        }
        records
    }

    fn accepted_code(&self, identifier: &str) -> Result<StationCode, ApplicationError> {
        if !self.is_valid_station(identifier) {
            return Err(self.invalid_station(identifier));
        }
        StationCode::parse(identifier).map_err(|_| self.invalid_station(identifier))
    }

    fn invalid_station(&self, identifier: &str) -> ApplicationError {
        ApplicationError::InvalidPayload(format!(
            "Provided station [{identifier}] is not on the {} sectional chart.  Please provide an accepted station identifier",
            self.catalog.region_name
        ))
    }
}
