//! Station code value object
//!
//! A normalized aviation station identifier (usually a four-letter ICAO code).
//!
//! # Examples
//!
//! ```
//! use domain::value_objects::StationCode;
//!
//! let code = StationCode::parse(" katl ").expect("valid code");
//! assert_eq!(code.as_str(), "KATL");
//!
//! assert!(StationCode::parse("").is_err());
//! assert!(StationCode::parse("K-TL").is_err());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Station identifier, always trimmed and upper case
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StationCode(String);

impl StationCode {
    /// Longest identifier accepted
    pub const MAX_LEN: usize = 8;

    /// Parse and normalize a station code
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStationCode` if the trimmed input is empty,
    /// longer than [`Self::MAX_LEN`], or contains non-alphanumeric characters.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty()
            || trimmed.len() > Self::MAX_LEN
            || !trimmed.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(DomainError::InvalidStationCode(raw.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// The normalized code
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StationCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StationCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StationCode> for String {
    fn from(code: StationCode) -> Self {
        code.0
    }
}
