use backdulake_store::{FetchTarget, RuleKind, Store, StoreConfig, StoreError};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;

const CONTACT_TOML: &str = r#"
display_name = "ContactStore"
identity_field = "_id"
fetch_target = "resource"

[default_model]
name = ""
active = true

[aliases]
pc = "Postal Code"
"first,last" = "Full name"

[messages]
required = "Please provide {field}."

[schema.properties.pc]
required = true
type = "string"
length = 5
"#;

// ── Defaults ─────────────────────────────────────────────────────

#[test]
fn defaults() {
    let config = StoreConfig::default();
    assert_eq!(config.display_name, "Store");
    assert_eq!(config.identity_field, "id");
    assert!(config.default_model.is_empty());
    assert_eq!(config.fetch_target, FetchTarget::Parent);
    assert!(config.aliases.is_empty());
    assert!(config.schema.properties.contains_key("id"));
}

// ── TOML / JSON ──────────────────────────────────────────────────

#[test]
fn parses_toml() {
    let config = StoreConfig::from_toml_str(CONTACT_TOML).unwrap();
    assert_eq!(config.display_name, "ContactStore");
    assert_eq!(config.identity_field, "_id");
    assert_eq!(config.fetch_target, FetchTarget::Resource);
    assert_eq!(config.default_model.get_bool("active"), Some(true));
    assert_eq!(config.aliases.alias("pc"), "Postal Code");
    assert_eq!(config.messages.template(RuleKind::Required), "Please provide {field}.");
    assert!(config.schema.is_required("pc"));
}

#[test]
fn toml_config_drives_validation_messages() {
    let config = StoreConfig::from_toml_str(CONTACT_TOML).unwrap();
    let store = Store::new(config, || {});
    let record = backdulake_store::Record::from_value(json!({})).unwrap();
    let result = store.validate(Some(&record), None).unwrap().unwrap();
    assert_eq!(result.messages(), vec!["Please provide Postal Code."]);
}

#[test]
fn partial_config_fills_defaults() {
    let config = StoreConfig::from_json_str(r#"{"display_name": "Tiny"}"#).unwrap();
    assert_eq!(config.display_name, "Tiny");
    assert_eq!(config.identity_field, "id");
}

#[test]
fn rejects_empty_identity_field() {
    let err = StoreConfig::from_toml_str(r#"identity_field = "  ""#).unwrap_err();
    assert!(matches!(err, StoreError::Config(_)));
    assert!(!err.is_usage_error());
}

#[test]
fn rejects_bad_pattern() {
    let err = StoreConfig::from_json_str(
        r#"{"schema": {"type": "object", "properties": {"pc": {"pattern": "[0-"}}}}"#,
    )
    .unwrap_err();
    assert!(matches!(err, StoreError::Schema(_)));
}

#[test]
fn rejects_malformed_toml() {
    let err = StoreConfig::from_toml_str("display_name = ").unwrap_err();
    assert!(matches!(err, StoreError::Toml(_)));
}

// ── Files ────────────────────────────────────────────────────────

#[test]
fn loads_toml_file() {
    let mut file = NamedTempFile::with_suffix(".toml").unwrap();
    file.write_all(CONTACT_TOML.as_bytes()).unwrap();
    let config = StoreConfig::load(file.path()).unwrap();
    assert_eq!(config.identity_field, "_id");
}

#[test]
fn loads_json_file() {
    let mut file = NamedTempFile::with_suffix(".json").unwrap();
    file.write_all(br#"{"identity_field": "uuid"}"#).unwrap();
    let config = StoreConfig::load(file.path()).unwrap();
    assert_eq!(config.identity_field, "uuid");
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = StoreConfig::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, StoreError::Io(_)));
}
