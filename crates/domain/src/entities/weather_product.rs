//! Cached weather product
//!
//! The persisted unit of the weather cache: a serialized record stored under a
//! prefixed key, e.g. `METAR_KATL`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::StationCode;

/// Key prefix for METAR entries
pub const METAR_KEY_PREFIX: &str = "METAR_";

/// Cache key of the METAR entry for `station`
#[must_use]
pub fn metar_key(station: &StationCode) -> String {
    format!("{METAR_KEY_PREFIX}{station}")
}

/// A serialized weather record with bookkeeping timestamps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherProduct {
    /// Unique cache key
    pub key: String,
    /// Serialized record (JSON)
    pub value: String,
    /// When the entry was first stored
    pub created_at: DateTime<Utc>,
    /// When the value was last replaced
    pub updated_at: DateTime<Utc>,
}

impl WeatherProduct {
    /// Create a fresh entry with both timestamps set to `now`
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the value in place, keeping `created_at`
    pub fn replace_value(&mut self, value: impl Into<String>, now: DateTime<Utc>) {
        self.value = value.into();
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn metar_key_uses_prefix() {
        let code = StationCode::parse("katl").unwrap();
        assert_eq!(metar_key(&code), "METAR_KATL");
    }

    #[test]
    fn new_sets_both_timestamps() {
        let now = Utc::now();
        let product = WeatherProduct::new("METAR_KATL", "{}", now);
        assert_eq!(product.created_at, now);
        assert_eq!(product.updated_at, now);
    }

    #[test]
    fn replace_value_keeps_created_at() {
        let created = Utc::now();
        let mut product = WeatherProduct::new("METAR_KATL", "old", created);
        let later = created + Duration::minutes(5);

        product.replace_value("new", later);

        assert_eq!(product.value, "new");
        assert_eq!(product.created_at, created);
        assert_eq!(product.updated_at, later);
    }
}
