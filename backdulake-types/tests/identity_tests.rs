use backdulake_types::{IdentityResolver, IdentityValue, Record, DEFAULT_IDENTITY_FIELD};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;
use std::collections::HashSet;

fn make_record(value: serde_json::Value) -> Record {
    Record::from_value(value).unwrap()
}

// ── IdentityValue ────────────────────────────────────────────────

#[test]
fn numeric_and_string_ids_are_equal() {
    let a = IdentityValue::from(1);
    let b = IdentityValue::from("1");
    assert_eq!(a, b);
}

#[test]
fn different_ids_are_not_equal() {
    assert_ne!(IdentityValue::from(1), IdentityValue::from(2));
    assert_ne!(IdentityValue::from("a"), IdentityValue::from("b"));
}

#[test]
fn loose_ids_collapse_in_a_set() {
    let mut set = HashSet::new();
    set.insert(IdentityValue::from(42));
    set.insert(IdentityValue::from("42"));
    set.insert(IdentityValue::from_value(json!(42.0)).unwrap());
    assert_eq!(set.len(), 1);
}

#[test]
fn raw_value_is_preserved() {
    let id = IdentityValue::from("42");
    assert_eq!(id.as_value(), &json!("42"));
    assert_eq!(id.to_string(), "42");
}

#[test]
fn serde_roundtrips_through_raw_value() {
    let id: IdentityValue = serde_json::from_value(json!(17)).unwrap();
    assert_eq!(serde_json::to_value(&id).unwrap(), json!(17));
}

#[test]
fn serde_rejects_null_identity() {
    let result: Result<IdentityValue, _> = serde_json::from_value(json!(null));
    assert!(result.is_err());
}

// ── IdentityResolver ─────────────────────────────────────────────

#[test]
fn default_field_is_id() {
    let resolver = IdentityResolver::default();
    assert_eq!(resolver.field(), DEFAULT_IDENTITY_FIELD);
    assert_eq!(resolver.field(), "id");
}

#[test]
fn identity_of_reads_configured_field() {
    let resolver = IdentityResolver::new("_id");
    let record = make_record(json!({"id": 1, "_id": "abc"}));
    assert_eq!(resolver.identity_of(&record), Some(IdentityValue::from("abc")));
}

#[test]
fn missing_or_null_identity_is_absent() {
    let resolver = IdentityResolver::default();
    assert!(resolver.identity_of(&make_record(json!({"name": "Jaime"}))).is_none());
    assert!(resolver.identity_of(&make_record(json!({"id": null}))).is_none());
}

#[test]
fn zero_is_a_valid_identity() {
    let resolver = IdentityResolver::default();
    let record = make_record(json!({"id": 0}));
    assert_eq!(resolver.identity_of(&record), Some(IdentityValue::from(0)));
}

#[test]
fn with_identity_sets_the_field() {
    let resolver = IdentityResolver::new("uuid");
    let record = resolver.with_identity(make_record(json!({"name": "x"})), IdentityValue::from("u-1"));
    assert_eq!(record.get("uuid"), Some(&json!("u-1")));
    assert_eq!(record.get_str("name"), Some("x"));
}

#[test]
fn equals_requires_both_identities() {
    let resolver = IdentityResolver::default();
    let a = make_record(json!({"id": 3}));
    let b = make_record(json!({"id": "3", "other": true}));
    let none = make_record(json!({}));
    assert!(resolver.equals(&a, &b));
    assert!(!resolver.equals(&a, &none));
    assert!(!resolver.equals(&none, &none));
}

#[test]
fn find_returns_first_loose_match() {
    let resolver = IdentityResolver::default();
    let records = vec![
        make_record(json!({"id": 1, "n": "first"})),
        make_record(json!({"id": "2", "n": "second"})),
        make_record(json!({"id": 2, "n": "third"})),
    ];
    let found = resolver.find(&records, &IdentityValue::from(2)).unwrap();
    assert_eq!(found.get_str("n"), Some("second"));
    assert_eq!(resolver.position(&records, &IdentityValue::from("1")), Some(0));
    assert!(resolver.find(&records, &IdentityValue::from(9)).is_none());
}

#[test]
fn find_on_empty_collection() {
    let resolver = IdentityResolver::default();
    assert!(resolver.find(&[], &IdentityValue::from(1)).is_none());
}

// ── Properties ───────────────────────────────────────────────────

proptest! {
    /// An integer and its decimal string always resolve to the same identity.
    #[test]
    fn integer_equals_its_string_form(n in any::<i64>()) {
        prop_assert_eq!(IdentityValue::from(n), IdentityValue::from(n.to_string()));
    }

    /// Loose equality never conflates distinct integers.
    #[test]
    fn distinct_integers_stay_distinct(a in any::<i64>(), b in any::<i64>()) {
        prop_assume!(a != b);
        prop_assert_ne!(IdentityValue::from(a), IdentityValue::from(b));
    }
}
