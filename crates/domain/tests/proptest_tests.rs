//! Property-based tests for domain value objects
//!
//! These tests use proptest to verify invariants across many random inputs.

use domain::value_objects::{MetarAttribute, StationCode, StationList};
use proptest::prelude::*;

// ============================================================================
// StationList Property Tests
// ============================================================================

mod station_list_tests {
    use super::*;

    fn code_strategy() -> impl Strategy<Value = String> {
        "[A-Z][A-Z0-9]{3}"
    }

    proptest! {
        #[test]
        fn every_listed_code_is_valid(
            codes in prop::collection::vec(code_strategy(), 1..20)
        ) {
            let list = StationList::from_csv(&codes.join(",")).unwrap();
            for code in &codes {
                prop_assert!(list.contains(code));
                prop_assert!(list.contains(&code.to_ascii_lowercase()));
            }
        }

        #[test]
        fn unlisted_code_is_invalid(
            codes in prop::collection::vec(code_strategy(), 0..20),
            candidate in code_strategy()
        ) {
            prop_assume!(!codes.contains(&candidate));
            let list = StationList::from_csv(&codes.join(",")).unwrap();
            prop_assert!(!list.contains(&candidate));
        }

        #[test]
        fn configured_order_is_preserved(
            codes in prop::collection::hash_set(code_strategy(), 1..20)
        ) {
            let codes: Vec<String> = codes.into_iter().collect();
            let list = StationList::from_csv(&codes.join(",")).unwrap();
            let listed: Vec<String> = list.iter().map(|c| c.as_str().to_string()).collect();
            prop_assert_eq!(listed, codes);
        }
    }
}

// ============================================================================
// StationCode Property Tests
// ============================================================================

mod station_code_tests {
    use super::*;

    proptest! {
        #[test]
        fn parse_always_uppercases(raw in "[a-zA-Z0-9]{1,8}") {
            let code = StationCode::parse(&raw).unwrap();
            prop_assert_eq!(code.as_str(), raw.to_ascii_uppercase());
        }

        #[test]
        fn parse_rejects_non_alphanumeric(raw in "[A-Z]{1,3}[^A-Za-z0-9]{1}[A-Z]{1,3}") {
            prop_assert!(StationCode::parse(&raw).is_err());
        }
    }
}

// ============================================================================
// MetarAttribute Property Tests
// ============================================================================

mod metar_attribute_tests {
    use super::*;

    proptest! {
        #[test]
        fn unknown_names_map_to_name(raw in "[a-z_]{1,20}") {
            let known = MetarAttribute::KNOWN.iter().any(|a| a.as_str() == raw);
            prop_assume!(!known);
            prop_assert_eq!(MetarAttribute::from_name(&raw), MetarAttribute::Name);
        }
    }
}
