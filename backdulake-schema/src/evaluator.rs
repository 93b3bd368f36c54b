//! Rule evaluation against a schema.

use crate::{MessageFormatter, PropertySchema, RawViolation, RuleKind, ValidationSchema};
use regex_lite::Regex;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock, PoisonError};
use tracing::warn;

/// Options handed to an evaluator for one run.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationOptions<'a> {
    /// Stop at the first violation per field. Stores always pass `false`
    /// so forms can show every problem at once.
    pub single_error: bool,
    /// Message renderer for evaluators that format their own messages.
    pub messages: MessageFormatter<'a>,
}

/// The rule-evaluation capability behind a [`Validator`](crate::Validator).
///
/// Implementations report violations in schema order and never fail;
/// a schema they cannot interpret is simply not enforced.
pub trait SchemaEvaluator: Send + Sync {
    fn evaluate(
        &self,
        value: &Value,
        schema: &ValidationSchema,
        options: &EvaluationOptions<'_>,
    ) -> Vec<RawViolation>;
}

/// Built-in evaluator covering the rules in [`RuleKind`].
///
/// Property patterns are compiled on first use and kept for the life of
/// the evaluator. A pattern that fails to compile is remembered as such
/// and reported once.
#[derive(Debug, Default)]
pub struct RuleEvaluator {
    patterns: Mutex<HashMap<String, Option<Regex>>>,
}

impl RuleEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `text` matches `pattern`. `None` if the pattern is invalid.
    fn pattern_matches(&self, field: &str, pattern: &str, text: &str) -> Option<bool> {
        let mut patterns = self.patterns.lock().unwrap_or_else(PoisonError::into_inner);
        let compiled = patterns.entry(pattern.to_string()).or_insert_with(|| {
            Regex::new(pattern)
                .map_err(|e| warn!("Invalid pattern on field {}: {}; not enforced", field, e))
                .ok()
        });
        compiled.as_ref().map(|re| re.is_match(text))
    }

    #[cfg(test)]
    fn cached_patterns(&self) -> usize {
        self.patterns.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn check_property(
        &self,
        field: &str,
        value: &Value,
        property: &PropertySchema,
        out: &mut Vec<RawViolation>,
    ) {
        let violation = |rule: RuleKind, constraint: Value| {
            RawViolation::new(rule, field, value.clone(), constraint)
        };

        if let Some(expected) = &property.value_type {
            if !matches_type(value, expected) {
                // Further rules assume the declared type.
                out.push(violation(RuleKind::Type, Value::String(expected.clone())));
                return;
            }
        }

        if let Some(format) = &property.format {
            if format == "number" {
                if !is_numeric(value) {
                    out.push(violation(RuleKind::Number, Value::Bool(true)));
                }
            } else if let Some(valid) = matches_format(value, format) {
                if !valid {
                    out.push(violation(RuleKind::Format, Value::String(format.clone())));
                }
            } else {
                warn!("Unknown format {:?} on field {}; not enforced", format, field);
            }
        }

        if let Some(s) = value.as_str() {
            let len = s.chars().count() as u64;
            if let Some(min) = property.min_length.filter(|min| len < *min) {
                out.push(violation(RuleKind::MinLength, Value::from(min)));
            }
            if let Some(max) = property.max_length.filter(|max| len > *max) {
                out.push(violation(RuleKind::MaxLength, Value::from(max)));
            }
            if let Some(exact) = property.length.filter(|exact| len != *exact) {
                out.push(violation(RuleKind::Length, Value::from(exact)));
            }
            if let Some(pattern) = &property.pattern {
                if self.pattern_matches(field, pattern, s) == Some(false) {
                    out.push(violation(RuleKind::Pattern, Value::String(pattern.clone())));
                }
            }
        }

        if let Some(n) = value.as_f64() {
            if let Some(min) = property.minimum.filter(|min| n < *min) {
                out.push(violation(RuleKind::Minimum, Value::from(min)));
            }
            if let Some(max) = property.maximum.filter(|max| n > *max) {
                out.push(violation(RuleKind::Maximum, Value::from(max)));
            }
        }

        if let Some(allowed) = &property.allowed {
            if !allowed.contains(value) {
                out.push(violation(RuleKind::Enum, Value::Array(allowed.clone())));
            }
        }
    }
}

impl SchemaEvaluator for RuleEvaluator {
    fn evaluate(
        &self,
        value: &Value,
        schema: &ValidationSchema,
        options: &EvaluationOptions<'_>,
    ) -> Vec<RawViolation> {
        let empty = Map::new();
        let object = value.as_object().unwrap_or(&empty);
        let unconstrained = PropertySchema::default();

        let mut violations = Vec::new();
        for field in schema.fields() {
            let property = schema.properties.get(field).unwrap_or(&unconstrained);
            let field_value = object.get(field).filter(|v| !v.is_null());
            let before = violations.len();

            match field_value {
                None => {
                    if schema.is_required(field) {
                        violations.push(RawViolation::new(
                            RuleKind::Required,
                            field,
                            Value::Null,
                            Value::Bool(true),
                        ));
                    }
                }
                Some(v) => self.check_property(field, v, property, &mut violations),
            }

            if options.single_error {
                violations.truncate(before + 1);
            }
        }
        violations
    }
}

fn matches_type(value: &Value, expected: &str) -> bool {
    match expected {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        "any" => true,
        other => {
            warn!("Unknown type {:?} in schema; not enforced", other);
            true
        }
    }
}

/// Numbers, and strings that parse as one.
fn is_numeric(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => s.trim().parse::<f64>().is_ok_and(f64::is_finite),
        _ => false,
    }
}

/// `None` when the format is not one we know.
fn matches_format(value: &Value, format: &str) -> Option<bool> {
    let re = match format {
        "email" => email_re(),
        "url" => url_re(),
        "date" => date_re(),
        "alpha" => alpha_re(),
        "alphanumeric" => alphanumeric_re(),
        _ => return None,
    };
    Some(value.as_str().is_some_and(|s| re.is_match(s)))
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex must compile")
    })
}

fn url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*://\S+$").expect("url regex must compile"))
}

fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])$").expect("date regex must compile")
    })
}

fn alpha_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z]+$").expect("alpha regex must compile"))
}

fn alphanumeric_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z0-9]+$").expect("alphanumeric regex must compile"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_strings_count_as_numbers() {
        assert!(is_numeric(&json!("12.5")));
        assert!(is_numeric(&json!(3)));
        assert!(!is_numeric(&json!("twelve")));
        assert!(!is_numeric(&json!(true)));
    }

    #[test]
    fn integer_type_rejects_fractions() {
        assert!(matches_type(&json!(3), "integer"));
        assert!(!matches_type(&json!(3.5), "integer"));
    }

    #[test]
    fn patterns_are_compiled_once() {
        let schema = ValidationSchema::object()
            .with_property("code", PropertySchema::new().pattern("^[A-Z]{3}$"))
            .with_property("ref", PropertySchema::new().pattern("^[A-Z]{3}$"));
        let aliases = crate::AliasMap::new();
        let catalog = crate::MessageCatalog::new();
        let options = EvaluationOptions {
            single_error: false,
            messages: MessageFormatter::new(&aliases, &catalog),
        };
        let evaluator = RuleEvaluator::new();

        let first = evaluator.evaluate(&json!({"code": "abc", "ref": "XYZ"}), &schema, &options);
        let second = evaluator.evaluate(&json!({"code": "ABC", "ref": "xyz"}), &schema, &options);

        assert_eq!(evaluator.cached_patterns(), 1);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].field, crate::FieldRef::from("code"));
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].field, crate::FieldRef::from("ref"));
    }

    #[test]
    fn invalid_pattern_is_not_enforced() {
        let schema = ValidationSchema::object().with_property("code", PropertySchema::new().pattern("("));
        let aliases = crate::AliasMap::new();
        let catalog = crate::MessageCatalog::new();
        let options = EvaluationOptions {
            single_error: false,
            messages: MessageFormatter::new(&aliases, &catalog),
        };
        let evaluator = RuleEvaluator::new();
        assert!(evaluator.evaluate(&json!({"code": "x"}), &schema, &options).is_empty());
        assert!(evaluator.evaluate(&json!({"code": "y"}), &schema, &options).is_empty());
        assert_eq!(evaluator.cached_patterns(), 1);
    }

    #[test]
    fn known_formats() {
        assert_eq!(matches_format(&json!("a@b.io"), "email"), Some(true));
        assert_eq!(matches_format(&json!("nope"), "email"), Some(false));
        assert_eq!(matches_format(&json!("2024-02-30"), "date"), Some(true));
        assert_eq!(matches_format(&json!("2024-13-01"), "date"), Some(false));
        assert_eq!(matches_format(&json!("x"), "ipv9"), None);
    }
}
