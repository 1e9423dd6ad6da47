//! Station allow-list configuration.

use application::services::StationCatalog;
use domain::{DomainError, StationList};
use serde::{Deserialize, Serialize};

/// Stations on the Atlanta sectional chart
pub const ATLANTA_SECTIONAL_STATIONS: &str =
    "KCNI,KGVL,KVPC,KJCA,KRYY,KLZU,KWDR,KPUJ,KMGE,KPDK,KFTY,KCTJ,KCVC,KATL,KCCO,KFFC,KHMP,KLGC,KOPN";

/// Which stations the service accepts and how the group keyword is spelled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationsConfig {
    /// Comma-separated station codes, in group lookup order
    #[serde(default = "default_icao_codes")]
    pub icao_codes: String,

    /// Identifier that expands to every configured station
    #[serde(default = "default_group_name")]
    pub group_name: String,

    /// Region named in rejection messages
    #[serde(default = "default_region_name")]
    pub region_name: String,
}

fn default_icao_codes() -> String {
    ATLANTA_SECTIONAL_STATIONS.to_string()
}

fn default_group_name() -> String {
    "atlanta".to_string()
}

fn default_region_name() -> String {
    "Atlanta".to_string()
}

impl Default for StationsConfig {
    fn default() -> Self {
        Self {
            icao_codes: default_icao_codes(),
            group_name: default_group_name(),
            region_name: default_region_name(),
        }
    }
}

impl StationsConfig {
    /// Parse the configured allow-list
    ///
    /// # Errors
    ///
    /// Returns an error if any entry is not a valid station code.
    pub fn station_list(&self) -> Result<StationList, DomainError> {
        StationList::from_csv(&self.icao_codes)
    }

    /// Build the lookup catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the allow-list is malformed or empty, or the group
    /// name is blank.
    pub fn catalog(&self) -> Result<StationCatalog, DomainError> {
        let stations = self.station_list()?;
        if stations.is_empty() {
            return Err(DomainError::ValidationError(
                "stations.icao_codes must name at least one station".to_string(),
            ));
        }
        if self.group_name.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "stations.group_name must not be empty".to_string(),
            ));
        }
        Ok(StationCatalog::new(
            stations,
            self.group_name.trim(),
            self.region_name.clone(),
        ))
    }
}
