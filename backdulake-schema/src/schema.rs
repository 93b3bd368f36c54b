//! Validation schemas: per-field rules, loaded from JSON or TOML.

use crate::{SchemaError, SchemaResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declarative description of a valid record.
///
/// Mirrors the object-schema shape servers and forms already exchange:
///
/// ```json
/// { "type": "object",
///   "properties": { "name": { "required": true, "type": "string", "minLength": 2 } } }
/// ```
///
/// Property order is kept; violations are reported in that order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationSchema {
    #[serde(rename = "type", default = "object_type")]
    pub schema_type: String,
    #[serde(default)]
    pub properties: IndexMap<String, PropertySchema>,
    /// Draft-style list of required fields, merged with per-property `required`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

fn object_type() -> String {
    "object".to_string()
}

impl ValidationSchema {
    /// An object schema with no properties.
    pub fn object() -> Self {
        Self {
            schema_type: object_type(),
            properties: IndexMap::new(),
            required: Vec::new(),
        }
    }

    /// Adds (or replaces) a property rule.
    #[must_use]
    pub fn with_property(mut self, field: impl Into<String>, property: PropertySchema) -> Self {
        self.properties.insert(field.into(), property);
        self
    }

    /// Parses and checks a schema from a JSON value.
    pub fn from_value(value: Value) -> SchemaResult<Self> {
        let schema: Self = serde_json::from_value(value)?;
        schema.check()?;
        Ok(schema)
    }

    /// Parses and checks a schema from JSON text.
    pub fn from_json_str(json: &str) -> SchemaResult<Self> {
        let schema: Self = serde_json::from_str(json)?;
        schema.check()?;
        Ok(schema)
    }

    /// Parses and checks a schema from TOML text.
    pub fn from_toml_str(text: &str) -> SchemaResult<Self> {
        let schema: Self = toml::from_str(text)?;
        schema.check()?;
        Ok(schema)
    }

    /// Verifies the root is an object schema and every pattern compiles.
    pub fn check(&self) -> SchemaResult<()> {
        if self.schema_type != "object" {
            return Err(SchemaError::UnsupportedType(self.schema_type.clone()));
        }
        for (field, property) in &self.properties {
            if let Some(pattern) = &property.pattern {
                regex_lite::Regex::new(pattern).map_err(|source| SchemaError::InvalidPattern {
                    field: field.clone(),
                    source,
                })?;
            }
        }
        Ok(())
    }

    /// Whether `field` must be present, from either declaration style.
    pub fn is_required(&self, field: &str) -> bool {
        self.properties.get(field).is_some_and(|p| p.required)
            || self.required.iter().any(|f| f == field)
    }

    /// Fields to evaluate, in order: declared properties first, then any
    /// draft-style required names without a property entry.
    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = self.properties.keys().map(String::as_str).collect();
        for name in &self.required {
            if !self.properties.contains_key(name) {
                fields.push(name);
            }
        }
        fields
    }
}

impl Default for ValidationSchema {
    /// Object schema whose only rule is an optional numeric `id`.
    fn default() -> Self {
        Self::object().with_property("id", PropertySchema::new().of_type("number"))
    }
}

/// Rules for a single field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySchema {
    #[serde(default)]
    pub required: bool,
    /// Expected JSON type: string, number, integer, boolean, object, array, null, any.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Named format: email, url, date, alpha, alphanumeric, number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<Value>>,
}

impl PropertySchema {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn of_type(mut self, value_type: impl Into<String>) -> Self {
        self.value_type = Some(value_type.into());
        self
    }

    #[must_use]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    #[must_use]
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    #[must_use]
    pub fn min_length(mut self, n: u64) -> Self {
        self.min_length = Some(n);
        self
    }

    #[must_use]
    pub fn max_length(mut self, n: u64) -> Self {
        self.max_length = Some(n);
        self
    }

    #[must_use]
    pub fn length(mut self, n: u64) -> Self {
        self.length = Some(n);
        self
    }

    #[must_use]
    pub fn minimum(mut self, n: f64) -> Self {
        self.minimum = Some(n);
        self
    }

    #[must_use]
    pub fn maximum(mut self, n: f64) -> Self {
        self.maximum = Some(n);
        self
    }

    #[must_use]
    pub fn one_of(mut self, allowed: Vec<Value>) -> Self {
        self.allowed = Some(allowed);
        self
    }
}
