//! Station allow-list
//!
//! The ordered set of station codes a deployment serves, parsed from a
//! comma-separated configuration value such as `"KATL,KPDK,KFTY"`.

use std::fmt;

use crate::{errors::DomainError, value_objects::StationCode};

/// Ordered, duplicate-free list of accepted station codes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StationList {
    codes: Vec<StationCode>,
}

impl StationList {
    /// Build a list from already-parsed codes, dropping duplicates
    #[must_use]
    pub fn new(codes: impl IntoIterator<Item = StationCode>) -> Self {
        let mut unique: Vec<StationCode> = Vec::new();
        for code in codes {
            if !unique.contains(&code) {
                unique.push(code);
            }
        }
        Self { codes: unique }
    }

    /// Parse a comma-separated list
    ///
    /// Blank entries (e.g. from a trailing comma) are ignored. Order is preserved.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStationCode` for the first malformed entry.
    pub fn from_csv(raw: &str) -> Result<Self, DomainError> {
        let codes = raw
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(StationCode::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(codes))
    }

    /// Whether `code` (compared case-insensitively) is on the list
    ///
    /// Surrounding whitespace is significant: `" KATL"` is not accepted.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        let normalized = code.to_ascii_uppercase();
        self.codes.iter().any(|c| c.as_str() == normalized)
    }

    /// Iterate in configured order
    pub fn iter(&self) -> impl Iterator<Item = &StationCode> {
        self.codes.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl fmt::Display for StationList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .codes
            .iter()
            .map(StationCode::as_str)
            .collect::<Vec<_>>()
            .join(",");
        f.write_str(&joined)
    }
}

impl<'a> IntoIterator for &'a StationList {
    type Item = &'a StationCode;
    type IntoIter = std::slice::Iter<'a, StationCode>;

    fn into_iter(self) -> Self::IntoIter {
        self.codes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_csv_preserves_order() {
        let list = StationList::from_csv("KCNI,KGVL,KATL").unwrap();
        let codes: Vec<&str> = list.iter().map(StationCode::as_str).collect();
        assert_eq!(codes, vec!["KCNI", "KGVL", "KATL"]);
    }

    #[test]
    fn from_csv_tolerates_whitespace_and_trailing_comma() {
        let list = StationList::from_csv(" katl , kpdk ,").unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.contains("KATL"));
        assert!(list.contains("KPDK"));
    }

    #[test]
    fn from_csv_drops_duplicates() {
        let list = StationList::from_csv("KATL,KPDK,katl").unwrap();
        assert_eq!(list.to_string(), "KATL,KPDK");
    }

    #[test]
    fn from_csv_rejects_malformed_entry() {
        assert!(StationList::from_csv("KATL,K TL").is_err());
    }

    #[test]
    fn contains_is_case_insensitive() {
        let list = StationList::from_csv("KATL").unwrap();
        assert!(list.contains("katl"));
        assert!(list.contains("KaTl"));
        assert!(!list.contains("KJFK"));
    }

    #[test]
    fn contains_does_not_trim() {
        let list = StationList::from_csv("KATL").unwrap();
        assert!(!list.contains(" KATL"));
        assert!(!list.contains("katl\t"));
    }

    #[test]
    fn empty_list() {
        let list = StationList::from_csv("").unwrap();
        assert!(list.is_empty());
        assert!(!list.contains("KATL"));
    }
}
