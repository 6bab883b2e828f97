//! Property-based tests for module_logger using proptest

use module_logger::core::{abbreviate_module, level_name, Event, FieldMap, Fields, TimeZone};
use module_logger::formatters::strip_control_and_extended;
use module_logger::prelude::*;
use proptest::prelude::*;

fn any_level() -> impl Strategy<Value = Level> {
    prop_oneof![
        Just(Level::Debug),
        Just(Level::Info),
        Just(Level::Notice),
        Just(Level::Warning),
        Just(Level::Error),
        Just(Level::Critical),
        Just(Level::Alert),
        Just(Level::Emergency),
    ]
}

fn any_field_value() -> impl Strategy<Value = FieldValue> {
    prop_oneof![
        "[a-z0-9 ]{0,12}".prop_map(FieldValue::from),
        any::<i64>().prop_map(FieldValue::from),
        any::<bool>().prop_map(FieldValue::from),
    ]
}

// ============================================================================
// Level Tests
// ============================================================================

proptest! {
    /// Ordering of levels follows their numeric values
    #[test]
    fn test_level_ordering(level1 in any_level(), level2 in any_level()) {
        let val1 = level1.value();
        let val2 = level2.value();

        prop_assert_eq!(level1 <= level2, val1 <= val2);
        prop_assert_eq!(level1 < level2, val1 < val2);
        prop_assert_eq!(level1 >= level2, val1 >= val2);
        prop_assert_eq!(level1 > level2, val1 > val2);
    }

    /// Names parse back regardless of case
    #[test]
    fn test_level_parse_ignores_case(level in any_level(), lower in any::<bool>()) {
        let name = if lower {
            level.name().to_lowercase()
        } else {
            level.name().to_string()
        };
        prop_assert_eq!(name.parse::<Level>().ok(), Some(level));
    }

    /// Values round-trip and unknown values have a fallback name
    #[test]
    fn test_level_value_lookup(level in any_level(), value in any::<i32>()) {
        prop_assert_eq!(Level::from_value(level.value()), Some(level));
        prop_assert_eq!(level_name(level.value()), level.name());

        if Level::from_value(value).is_none() {
            prop_assert_eq!(level_name(value), "UNKNOWN");
        }
    }
}

// ============================================================================
// Formatting Helper Tests
// ============================================================================

proptest! {
    /// Abbreviation keeps the last segment and shortens the others to one character
    #[test]
    fn test_abbreviate_module_shape(segments in prop::collection::vec("[a-z]{1,8}", 1..6)) {
        let module = segments.join(".");
        let abbreviated = abbreviate_module(&module);
        let parts: Vec<&str> = abbreviated.split('.').collect();

        prop_assert_eq!(parts.len(), segments.len());
        prop_assert_eq!(parts.last().copied(), segments.last().map(String::as_str));
        for (part, segment) in parts.iter().zip(&segments).take(segments.len() - 1) {
            prop_assert_eq!(part.chars().count(), 1);
            prop_assert!(segment.starts_with(*part));
        }
    }

    /// Abbreviation never panics on arbitrary UTF-8
    #[test]
    fn test_abbreviate_module_any_input(module in "\\PC{0,40}") {
        let abbreviated = abbreviate_module(&module);
        prop_assert!(abbreviated.len() <= module.len());
    }

    /// Cleaned text only contains printable ASCII
    #[test]
    fn test_strip_control_and_extended(text in "\\PC{0,64}") {
        let cleaned = strip_control_and_extended(&text);
        prop_assert!(cleaned.chars().all(|c| (' '..='~').contains(&c)));
    }
}

// ============================================================================
// Field Tests
// ============================================================================

proptest! {
    /// Serializing the same event twice yields the same text
    #[test]
    fn test_field_serialization_is_stable(
        custom in prop::collection::btree_map("[a-z]{1,6}", any_field_value(), 0..8),
        global in prop::collection::btree_map("[a-z]{1,6}", any_field_value(), 0..8),
    ) {
        let mut fields = Fields::from_custom(FieldMap::from_iter(custom.clone()));
        for (key, value) in &global {
            fields.insert_global(key.clone(), value.clone());
        }

        let event = Event::new(TimeZone::Utc.now(), "props", Level::Info, fields, vec![]);
        let first = event.serialize();
        prop_assert_eq!(&first, &event.serialize());

        let map = event.to_map(&[]);
        prop_assert_eq!(map.len(), custom.len() + global.len());
        for key in global.keys() {
            let prefixed = format!("#{}", key);
            prop_assert!(map.contains_key(&prefixed));
        }
    }

    /// Excluded global keys never appear in the map; custom keys always do
    #[test]
    fn test_to_map_exclusion(
        keys in prop::collection::btree_set("[a-z]{1,6}", 1..8),
    ) {
        let excluded: Vec<String> = keys.iter().take(1).cloned().collect();
        let excluded_refs: Vec<&str> = excluded.iter().map(String::as_str).collect();

        let mut fields = Fields::new();
        for key in &keys {
            fields.insert_custom(key.clone(), 1);
            fields.insert_global(key.clone(), 2);
        }

        let event = Event::new(TimeZone::Utc.now(), "props", Level::Debug, fields, vec![]);
        let map = event.to_map(&excluded_refs);

        prop_assert_eq!(map.len(), keys.len() * 2 - 1);
        prop_assert!(map.contains_key(&excluded[0]));
        let prefixed = format!("#{}", excluded[0]);
        prop_assert!(!map.contains_key(&prefixed));
    }
}
