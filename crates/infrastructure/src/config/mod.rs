//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `stations`: station allow-list and group keyword
//! - `refresh`: upstream refresh schedule
//! - `cache`: product store backend
//!
//! Upstream feed settings reuse [`AviationWeatherConfig`] directly.
//!
//! Sources are layered: built-in defaults, then an optional `config.toml`
//! in the working directory, then `METAR__`-prefixed environment variables
//! (e.g. `METAR__SERVER__PORT=9000`, `METAR__CACHE__BACKEND=redb`).

mod cache;
mod refresh;
mod server;
mod stations;

use application::error::ApplicationError;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, builder::DefaultState};
use serde::{Deserialize, Serialize};

pub use cache::{CacheBackend, CacheConfig};
pub use integration_aviationweather::AviationWeatherConfig;
pub use refresh::RefreshConfig;
pub use server::ServerConfig;
pub use stations::{ATLANTA_SECTIONAL_STATIONS, StationsConfig};

use crate::scheduler::validate_cron;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "METAR";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Accepted stations
    #[serde(default)]
    pub stations: StationsConfig,

    /// Upstream AviationWeather.gov feed
    #[serde(default)]
    pub upstream: AviationWeatherConfig,

    /// Refresh schedule
    #[serde(default)]
    pub refresh: RefreshConfig,

    /// Product store
    #[serde(default)]
    pub cache: CacheConfig,
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::defaults()?
            // Load from file if exists
            .add_source(File::with_name("config").required(false))
            // Override with environment variables (e.g., METAR__SERVER__PORT)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a TOML document layered over the defaults
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("stations.group_name", "atlanta")
    }

    /// Check settings that deserialization alone cannot catch
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` naming the first bad setting.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        self.stations
            .catalog()
            .map_err(|e| ApplicationError::Configuration(format!("stations: {e}")))?;

        if self.refresh.enabled {
            validate_cron(&self.refresh.cron)
                .map_err(|e| ApplicationError::Configuration(format!("refresh.cron: {e}")))?;
        }

        if self.upstream.timeout_ms == 0 || self.upstream.connect_timeout_ms == 0 {
            return Err(ApplicationError::Configuration(
                "upstream timeouts must be greater than zero".to_string(),
            ));
        }

        if self.upstream.base_url.trim().is_empty() {
            return Err(ApplicationError::Configuration(
                "upstream.base_url must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
