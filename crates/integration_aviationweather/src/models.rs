//! Wire types for the `MetarJSON` response
//!
//! Features are kept as raw JSON so that one malformed station cannot fail
//! decoding of the whole collection.

use serde::Deserialize;
use serde_json::Value;

/// GeoJSON `FeatureCollection` as returned by `MetarJSON.php`
#[derive(Debug, Deserialize)]
pub(crate) struct FeatureCollection {
    pub features: Vec<Value>,
}
