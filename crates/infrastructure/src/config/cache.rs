//! Product store configuration.

use serde::{Deserialize, Serialize};

use crate::cache::DEFAULT_MAX_ENTRIES;

/// Which store keeps the cached products
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// In-memory (Moka); empty after every restart
    #[default]
    Memory,
    /// Embedded database file (Redb)
    Redb,
}

/// Product store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Store backend
    #[serde(default)]
    pub backend: CacheBackend,

    /// Database file used by the `redb` backend
    #[serde(default = "default_path")]
    pub path: String,

    /// Maximum number of products held by the `memory` backend
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
}

fn default_path() -> String {
    "data/metar.redb".to_string()
}

const fn default_max_entries() -> u64 {
    DEFAULT_MAX_ENTRIES
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            path: default_path(),
            max_entries: default_max_entries(),
        }
    }
}
