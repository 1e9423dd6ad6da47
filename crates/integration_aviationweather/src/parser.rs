//! `MetarJSON` feature parser
//!
//! Turns GeoJSON features into [`Metar`] records. Each feature is handled on
//! its own: a malformed station is rejected and counted, the rest of the feed
//! still parses.
//!
//! Property names follow the upstream feed:
//!
//! | Property | Record field |
//! |---|---|
//! | `id` | `icao` |
//! | `obsTime` | `observed` |
//! | `temp`, `dewp` | `temperature`, `dewpoint` (rounded half-up) |
//! | `wspd` + `wdir` | `wind` |
//! | `ceil` + `cover` | `ceiling` |
//! | `cldCvg1..9` + `cldBas1..9` | `clouds` (base in hundreds of feet) |
//! | `visib` | `visibility` |
//! | `fltcat` | `flight_category` |
//! | `altim` | `barometer` |
//! | `rawOb` | `raw_text` |

use domain::{
    Barometer, Ceiling, Cloud, Dewpoint, DomainError, Metar, StationCode, Temperature, Visibility,
    Wind,
};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

/// Highest cloud layer index the feed reports
const MAX_CLOUD_LAYERS: usize = 9;

type Properties = Map<String, Value>;

/// Why a single station was rejected
#[derive(Debug, Error)]
pub enum StationParseError {
    /// Feature has no `properties` object
    #[error("feature has no properties object")]
    MissingProperties,

    /// A mandatory property is absent
    #[error("missing required property `{0}`")]
    MissingField(String),

    /// A property is present but has the wrong shape
    #[error("property `{field}` has unexpected value {value}")]
    InvalidField { field: String, value: String },

    /// Station identifier is not a valid code
    #[error(transparent)]
    InvalidStation(#[from] DomainError),
}

impl StationParseError {
    fn invalid(field: &str, value: &Value) -> Self {
        Self::InvalidField {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

/// Records parsed from one feed document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedFeed {
    /// Parsed records in feed order
    pub records: Vec<Metar>,
    /// Number of stations rejected as malformed
    pub rejected: usize,
}

/// Parse every feature of a feed
///
/// Features without a top-level `id` are skipped without counting as rejected.
pub fn parse_feed(features: &[Value]) -> ParsedFeed {
    let mut parsed = ParsedFeed::default();
    for feature in features {
        match parse_feature(feature) {
            Ok(Some(metar)) => parsed.records.push(metar),
            Ok(None) => debug!("Skipping feature without id"),
            Err(e) => {
                let station = feature
                    .pointer("/properties/id")
                    .and_then(Value::as_str)
                    .unwrap_or("<unknown>");
                warn!(station = %station, error = %e, "Rejecting malformed station");
                parsed.rejected += 1;
            },
        }
    }
    parsed
}

/// Parse a single GeoJSON feature
///
/// Returns `Ok(None)` for features that carry no top-level `id`.
///
/// # Errors
///
/// Returns a [`StationParseError`] if a required property is missing or any
/// property has an unexpected type.
pub fn parse_feature(feature: &Value) -> Result<Option<Metar>, StationParseError> {
    if feature.get("id").is_none_or(Value::is_null) {
        return Ok(None);
    }
    let props = feature
        .get("properties")
        .and_then(Value::as_object)
        .ok_or(StationParseError::MissingProperties)?;
    parse_properties(props).map(Some)
}

fn parse_properties(props: &Properties) -> Result<Metar, StationParseError> {
    let id = required(props, "id")?;
    let icao = StationCode::parse(
        id.as_str()
            .ok_or_else(|| StationParseError::invalid("id", id))?,
    )?;
    let observed = scalar_text("obsTime", required(props, "obsTime")?)?;

    let mut metar = Metar::new(icao, observed);

    if let Some(v) = optional(props, "temp") {
        metar.temperature = Some(Temperature {
            celsius: round_half_up(number("temp", v)?),
        });
    }
    if let Some(v) = optional(props, "dewp") {
        metar.dewpoint = Some(Dewpoint {
            celsius: round_half_up(number("dewp", v)?),
        });
    }
    if let Some(v) = optional(props, "wspd") {
        metar.wind = Some(Wind {
            speed_kt: integer("wspd", v)?,
            degrees: integer("wdir", required(props, "wdir")?)?,
        });
    }
    if let Some(v) = optional(props, "ceil") {
        metar.ceiling = Some(Ceiling {
            feet: number("ceil", v)?,
            code: text("cover", required(props, "cover")?)?,
        });
    }

    let clouds = parse_clouds(props)?;
    if !clouds.is_empty() {
        metar.clouds = Some(clouds);
    }

    if let Some(v) = optional(props, "visib") {
        metar.visibility = Some(Visibility {
            miles: scalar_text("visib", v)?,
        });
    }
    if let Some(v) = optional(props, "fltcat") {
        metar.flight_category = Some(text("fltcat", v)?);
    }
    if let Some(v) = optional(props, "altim") {
        metar.barometer = Some(Barometer {
            mb: number("altim", v)?,
        });
    }
    if let Some(v) = optional(props, "rawOb") {
        metar.raw_text = Some(text("rawOb", v)?);
    }

    Ok(metar)
}

fn parse_clouds(props: &Properties) -> Result<Vec<Cloud>, StationParseError> {
    let mut clouds = Vec::new();
    for layer in 1..=MAX_CLOUD_LAYERS {
        let cover_key = format!("cldCvg{layer}");
        let Some(cover) = optional(props, &cover_key) else {
            continue;
        };
        let base_key = format!("cldBas{layer}");
        let base_feet_agl = optional(props, &base_key)
            .map(|v| number(&base_key, v).map(|hundreds| hundreds * 100.0))
            .transpose()?;
        clouds.push(Cloud {
            code: text(&cover_key, cover)?,
            base_feet_agl,
        });
    }
    Ok(clouds)
}

fn optional<'a>(props: &'a Properties, key: &str) -> Option<&'a Value> {
    props.get(key).filter(|v| !v.is_null())
}

fn required<'a>(props: &'a Properties, key: &str) -> Result<&'a Value, StationParseError> {
    optional(props, key).ok_or_else(|| StationParseError::MissingField(key.to_string()))
}

fn text(field: &str, value: &Value) -> Result<String, StationParseError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| StationParseError::invalid(field, value))
}

/// A string verbatim, or a number rendered as text
fn scalar_text(field: &str, value: &Value) -> Result<String, StationParseError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(StationParseError::invalid(field, value)),
    }
}

/// A JSON number or a numeric string
fn number(field: &str, value: &Value) -> Result<f64, StationParseError> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
        .filter(|n: &f64| n.is_finite())
        .ok_or_else(|| StationParseError::invalid(field, value))
}

/// An integral JSON number or integer string (`"VRB"` is rejected)
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn integer(field: &str, value: &Value) -> Result<i64, StationParseError> {
    if let Some(n) = value.as_i64() {
        return Ok(n);
    }
    if let Some(f) = value.as_f64().filter(|f| f.fract() == 0.0) {
        return Ok(f as i64);
    }
    value
        .as_str()
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| StationParseError::invalid(field, value))
}

#[allow(clippy::cast_possible_truncation)]
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
