//! Identity resolution for records.
//!
//! The key field of a resource is configurable (`id`, `_id`, `uuid`, ...).
//! Identity values coming off the wire are not type-stable either: the same
//! record may be keyed `5` in one response and `"5"` in another. Both sides
//! are normalized to a string key before comparison, so those compare equal.

use crate::{json_kind, Error, Record, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Field name used when a store does not configure one.
pub const DEFAULT_IDENTITY_FIELD: &str = "id";

/// A record's identity, as found in its identity field.
///
/// Only scalar JSON values (strings, numbers, booleans) can be identities.
/// Equality and hashing go through [`IdentityValue::key`], so `1`, `1.0`
/// and `"1"` are the same identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct IdentityValue {
    raw: Value,
    key: String,
}

impl IdentityValue {
    /// Wraps a JSON value. `null`, arrays and objects are rejected.
    pub fn from_value(raw: Value) -> Result<Self> {
        let key = match &raw {
            Value::String(s) => s.clone(),
            Value::Number(n) => normalize_number(n),
            Value::Bool(b) => b.to_string(),
            other => return Err(Error::InvalidIdentity(json_kind(other).to_string())),
        };
        Ok(Self { raw, key })
    }

    /// The value exactly as it appeared on the record.
    pub fn as_value(&self) -> &Value {
        &self.raw
    }

    /// The normalized string form used for comparisons.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn into_value(self) -> Value {
        self.raw
    }
}

/// Integral numbers render without a fractional part so that `1.0 == 1`.
fn normalize_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 => {
            (f as i64).to_string()
        }
        _ => n.to_string(),
    }
}

impl PartialEq for IdentityValue {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for IdentityValue {}

impl Hash for IdentityValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for IdentityValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

impl TryFrom<Value> for IdentityValue {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}

impl From<IdentityValue> for Value {
    fn from(id: IdentityValue) -> Self {
        id.raw
    }
}

impl From<i64> for IdentityValue {
    fn from(n: i64) -> Self {
        Self {
            raw: Value::from(n),
            key: n.to_string(),
        }
    }
}

impl From<i32> for IdentityValue {
    fn from(n: i32) -> Self {
        Self::from(i64::from(n))
    }
}

impl From<u64> for IdentityValue {
    fn from(n: u64) -> Self {
        Self {
            raw: Value::from(n),
            key: n.to_string(),
        }
    }
}

impl From<&str> for IdentityValue {
    fn from(s: &str) -> Self {
        Self {
            raw: Value::from(s),
            key: s.to_string(),
        }
    }
}

impl From<String> for IdentityValue {
    fn from(s: String) -> Self {
        Self {
            key: s.clone(),
            raw: Value::String(s),
        }
    }
}

/// Reads and writes the identity field of records.
///
/// Configured once per store with the field name; all identity lookups in a
/// store go through the same resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityResolver {
    field: String,
}

impl IdentityResolver {
    /// Creates a resolver keyed on `field`.
    pub fn new(field: impl Into<String>) -> Self {
        Self { field: field.into() }
    }

    /// The configured identity field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the record's identity, or `None` when the field is missing,
    /// `null`, or holds a non-scalar value.
    pub fn identity_of(&self, record: &Record) -> Option<IdentityValue> {
        match record.get(&self.field) {
            None | Some(Value::Null) => None,
            Some(value) => IdentityValue::from_value(value.clone()).ok(),
        }
    }

    pub fn has_identity(&self, record: &Record) -> bool {
        self.identity_of(record).is_some()
    }

    /// Sets the identity field in place.
    pub fn set_identity(&self, record: &mut Record, id: IdentityValue) {
        record.insert(self.field.clone(), id.into_value());
    }

    /// Returns `record` with its identity field set to `id`.
    #[must_use]
    pub fn with_identity(&self, mut record: Record, id: IdentityValue) -> Record {
        self.set_identity(&mut record, id);
        record
    }

    /// Whether the record's identity loosely equals `id`.
    /// Records without an identity never match.
    pub fn matches(&self, record: &Record, id: &IdentityValue) -> bool {
        self.identity_of(record).is_some_and(|own| own == *id)
    }

    /// Whether two records share an identity. False if either lacks one.
    pub fn equals(&self, a: &Record, b: &Record) -> bool {
        match (self.identity_of(a), self.identity_of(b)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// First record in `records` whose identity loosely equals `id`.
    pub fn find<'a>(&self, records: &'a [Record], id: &IdentityValue) -> Option<&'a Record> {
        records.iter().find(|r| self.matches(r, id))
    }

    /// Index of the first record whose identity loosely equals `id`.
    pub fn position(&self, records: &[Record], id: &IdentityValue) -> Option<usize> {
        records.iter().position(|r| self.matches(r, id))
    }
}

impl Default for IdentityResolver {
    fn default() -> Self {
        Self::new(DEFAULT_IDENTITY_FIELD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn float_with_zero_fraction_normalizes_to_integer() {
        let id = IdentityValue::from_value(json!(7.0)).unwrap();
        assert_eq!(id.key(), "7");
    }

    #[test]
    fn fractional_float_keeps_fraction() {
        let id = IdentityValue::from_value(json!(7.5)).unwrap();
        assert_eq!(id.key(), "7.5");
    }

    #[test]
    fn null_and_composites_are_not_identities() {
        assert!(IdentityValue::from_value(Value::Null).is_err());
        assert!(IdentityValue::from_value(json!([1])).is_err());
        assert!(IdentityValue::from_value(json!({"id": 1})).is_err());
    }
}
