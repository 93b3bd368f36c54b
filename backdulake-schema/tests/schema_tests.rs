use backdulake_schema::{indefinite_article, AliasMap, MessageCatalog, PropertySchema, RuleKind, SchemaError, ValidationSchema};
use pretty_assertions::assert_eq;
use serde_json::json;

// ── Parsing ──────────────────────────────────────────────────────

#[test]
fn parses_object_schema_from_json() {
    let schema = ValidationSchema::from_value(json!({
        "type": "object",
        "properties": {
            "name": { "required": true, "type": "string", "minLength": 2, "maxLength": 40 },
            "pc": { "pattern": "^[0-9]{5}$", "length": 5 }
        }
    }))
    .unwrap();

    let name = &schema.properties["name"];
    assert!(name.required);
    assert_eq!(name.value_type.as_deref(), Some("string"));
    assert_eq!(name.min_length, Some(2));
    assert_eq!(name.max_length, Some(40));
    assert_eq!(schema.properties["pc"].length, Some(5));
    assert_eq!(schema.fields(), vec!["name", "pc"]);
}

#[test]
fn property_order_is_preserved() {
    let schema = ValidationSchema::from_json_str(
        r#"{"type":"object","properties":{"z":{},"a":{},"m":{}}}"#,
    )
    .unwrap();
    assert_eq!(schema.fields(), vec!["z", "a", "m"]);
}

#[test]
fn parses_schema_from_toml() {
    let schema = ValidationSchema::from_toml_str(
        r#"
        type = "object"

        [properties.email]
        required = true
        format = "email"

        [properties.age]
        type = "integer"
        minimum = 0
        "#,
    )
    .unwrap();
    assert!(schema.is_required("email"));
    assert_eq!(schema.properties["email"].format.as_deref(), Some("email"));
    assert_eq!(schema.properties["age"].minimum, Some(0.0));
}

#[test]
fn missing_type_defaults_to_object() {
    let schema = ValidationSchema::from_value(json!({"properties": {}})).unwrap();
    assert_eq!(schema.schema_type, "object");
}

#[test]
fn rejects_invalid_pattern() {
    let err = ValidationSchema::from_value(json!({
        "type": "object",
        "properties": { "pc": { "pattern": "([0-9" } }
    }))
    .unwrap_err();
    assert!(matches!(err, SchemaError::InvalidPattern { ref field, .. } if field == "pc"));
}

#[test]
fn rejects_non_object_root() {
    let err = ValidationSchema::from_value(json!({"type": "array"})).unwrap_err();
    assert!(matches!(err, SchemaError::UnsupportedType(ref t) if t == "array"));
}

#[test]
fn builder_matches_parsed_schema() {
    let built = ValidationSchema::object()
        .with_property("name", PropertySchema::new().required().of_type("string"));
    let parsed = ValidationSchema::from_value(json!({
        "type": "object",
        "properties": { "name": { "required": true, "type": "string" } }
    }))
    .unwrap();
    assert_eq!(built, parsed);
}

#[test]
fn default_schema_has_optional_numeric_id() {
    let schema = ValidationSchema::default();
    assert!(!schema.is_required("id"));
    assert_eq!(schema.properties["id"].value_type.as_deref(), Some("number"));
}

// ── Aliases & catalog ────────────────────────────────────────────

#[test]
fn alias_falls_back_to_field_name() {
    let aliases = AliasMap::new().with("pc", "Postal Code");
    assert_eq!(aliases.alias("pc"), "Postal Code");
    assert_eq!(aliases.alias("vat"), "vat");
}

#[test]
fn aliases_deserialize_from_plain_map() {
    let aliases: AliasMap = serde_json::from_value(json!({"pc": "Postal Code"})).unwrap();
    assert_eq!(aliases.alias("pc"), "Postal Code");
}

#[test]
fn catalog_deserializes_by_rule_name() {
    let catalog: MessageCatalog = serde_json::from_value(json!({
        "minLength": "{field} is too short",
        "bogus": "x"
    }))
    .unwrap();
    assert_eq!(catalog.template(RuleKind::MinLength), "{field} is too short");
    assert_eq!(catalog.template(RuleKind::Required), "{field} is required.");
    assert_eq!(catalog.unknown_rules(), vec!["bogus"]);
}

#[test]
fn rule_names_match_schema_keywords() {
    let names: Vec<&str> = RuleKind::ALL.iter().map(|r| r.name()).collect();
    assert!(names.contains(&"minLength"));
    assert!(names.contains(&"maxLength"));
    assert_eq!(serde_json::to_value(RuleKind::MinLength).unwrap(), json!("minLength"));
}

// ── Articles ─────────────────────────────────────────────────────

#[test]
fn article_for_vowels_and_consonants() {
    assert_eq!(indefinite_article("integer"), "an");
    assert_eq!(indefinite_article("array"), "an");
    assert_eq!(indefinite_article("object"), "an");
    assert_eq!(indefinite_article("string"), "a");
    assert_eq!(indefinite_article("number"), "a");
    assert_eq!(indefinite_article("boolean"), "a");
}
