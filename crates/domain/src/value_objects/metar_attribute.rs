//! METAR attribute vocabulary
//!
//! Names clients may pass as `data=` query parameters to narrow a record.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A selectable METAR attribute
///
/// Parsing never fails: any name outside the fixed vocabulary maps to
/// [`MetarAttribute::Name`], which selects the station `name` field. The
/// parser never fills `name`, so an unknown attribute effectively selects
/// nothing beyond the station identifier. Existing clients rely on unknown
/// names being accepted silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetarAttribute {
    Observed,
    RawText,
    Barometer,
    Ceiling,
    Clouds,
    Dewpoint,
    Elevation,
    FlightCategory,
    HumidityPercent,
    Temperature,
    Visibility,
    Wind,
    /// Catch-all for unrecognized names
    Name,
}

impl MetarAttribute {
    /// Every attribute with a dedicated wire name
    pub const KNOWN: [Self; 12] = [
        Self::Observed,
        Self::RawText,
        Self::Barometer,
        Self::Ceiling,
        Self::Clouds,
        Self::Dewpoint,
        Self::Elevation,
        Self::FlightCategory,
        Self::HumidityPercent,
        Self::Temperature,
        Self::Visibility,
        Self::Wind,
    ];

    /// Map a requested name to an attribute (exact, case-sensitive match)
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "observed" => Self::Observed,
            "raw_text" => Self::RawText,
            "barometer" => Self::Barometer,
            "ceiling" => Self::Ceiling,
            "clouds" => Self::Clouds,
            "dewpoint" => Self::Dewpoint,
            "elevation" => Self::Elevation,
            "flight_category" => Self::FlightCategory,
            "humidity_percent" => Self::HumidityPercent,
            "temperature" => Self::Temperature,
            "visibility" => Self::Visibility,
            "wind" => Self::Wind,
            _ => Self::Name,
        }
    }

    /// Wire name of the attribute
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Observed => "observed",
            Self::RawText => "raw_text",
            Self::Barometer => "barometer",
            Self::Ceiling => "ceiling",
            Self::Clouds => "clouds",
            Self::Dewpoint => "dewpoint",
            Self::Elevation => "elevation",
            Self::FlightCategory => "flight_category",
            Self::HumidityPercent => "humidity_percent",
            Self::Temperature => "temperature",
            Self::Visibility => "visibility",
            Self::Wind => "wind",
            Self::Name => "name",
        }
    }
}

impl fmt::Display for MetarAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
