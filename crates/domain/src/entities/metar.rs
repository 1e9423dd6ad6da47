//! METAR weather record
//!
//! One station's routine aviation weather observation. Upstream reports vary
//! in which measurements they carry, so everything except the station code is
//! optional: an absent field means "not reported", never zero.

use serde::{Deserialize, Serialize};

use crate::value_objects::{MetarAttribute, StationCode};

/// Air temperature, rounded to whole degrees Celsius
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Temperature {
    pub celsius: i64,
}

/// Dewpoint, rounded to whole degrees Celsius
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dewpoint {
    pub celsius: i64,
}

/// Surface wind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wind {
    /// Speed in knots
    pub speed_kt: i64,
    /// True direction the wind blows from, in degrees
    pub degrees: i64,
}

/// Lowest broken or overcast layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ceiling {
    /// Height above ground level in feet
    pub feet: f64,
    /// Sky cover code (e.g. `BKN`, `OVC`)
    pub code: String,
}

/// A single reported cloud layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cloud {
    /// Sky cover code (e.g. `FEW`, `SCT`)
    pub code: String,
    /// Layer base in feet above ground level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_feet_agl: Option<f64>,
}

/// Prevailing visibility
///
/// Kept as text: upstream sends either a number or a qualified value like `"10+"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visibility {
    pub miles: String,
}

/// Altimeter setting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Barometer {
    pub mb: f64,
}

/// A station observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metar {
    /// Station identifier
    pub icao: StationCode,

    /// Observation time as reported upstream
    ///
    /// Always present on ingested records; only attribute-filtered responses
    /// leave it empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed: Option<String>,

    /// Verbatim report text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<Temperature>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dewpoint: Option<Dewpoint>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind: Option<Wind>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ceiling: Option<Ceiling>,

    /// Cloud layers in report order (at most nine)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clouds: Option<Vec<Cloud>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,

    /// Flight rule category (VFR, MVFR, IFR, LIFR)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barometer: Option<Barometer>,

    /// Station elevation in feet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity_percent: Option<i64>,

    /// Station name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Metar {
    /// Create a record carrying only the mandatory fields
    #[must_use]
    pub fn new(icao: StationCode, observed: impl Into<String>) -> Self {
        Self {
            observed: Some(observed.into()),
            ..Self::bare(icao)
        }
    }

    /// A record with nothing but the station identifier
    #[must_use]
    pub const fn bare(icao: StationCode) -> Self {
        Self {
            icao,
            observed: None,
            raw_text: None,
            temperature: None,
            dewpoint: None,
            wind: None,
            ceiling: None,
            clouds: None,
            visibility: None,
            flight_category: None,
            barometer: None,
            elevation: None,
            humidity_percent: None,
            name: None,
        }
    }

    /// Copy of this record restricted to the station code plus `attributes`
    ///
    /// Attributes absent on the source stay absent on the copy.
    #[must_use]
    pub fn filtered(&self, attributes: &[MetarAttribute]) -> Self {
        let mut filtered = Self::bare(self.icao.clone());
        for attribute in attributes {
            filtered.copy_attribute(self, *attribute);
        }
        filtered
    }

    fn copy_attribute(&mut self, source: &Self, attribute: MetarAttribute) {
        match attribute {
            MetarAttribute::Observed => self.observed.clone_from(&source.observed),
            MetarAttribute::RawText => self.raw_text.clone_from(&source.raw_text),
            MetarAttribute::Barometer => self.barometer = source.barometer,
            MetarAttribute::Ceiling => self.ceiling.clone_from(&source.ceiling),
            MetarAttribute::Clouds => self.clouds.clone_from(&source.clouds),
            MetarAttribute::Dewpoint => self.dewpoint = source.dewpoint,
            MetarAttribute::Elevation => self.elevation = source.elevation,
            MetarAttribute::FlightCategory => {
                self.flight_category.clone_from(&source.flight_category);
            },
            MetarAttribute::HumidityPercent => self.humidity_percent = source.humidity_percent,
            MetarAttribute::Temperature => self.temperature = source.temperature,
            MetarAttribute::Visibility => self.visibility.clone_from(&source.visibility),
            MetarAttribute::Wind => self.wind = source.wind,
            MetarAttribute::Name => self.name.clone_from(&source.name),
        }
    }
}
