//! Raw rule violations reported by a schema evaluator.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The kind of rule a value violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleKind {
    Required,
    /// Value declared with `format = "number"` is not numeric.
    Number,
    MinLength,
    MaxLength,
    Length,
    Pattern,
    Format,
    Type,
    Minimum,
    Maximum,
    Enum,
}

impl RuleKind {
    /// Every rule kind, in catalog order.
    pub const ALL: [RuleKind; 11] = [
        RuleKind::Required,
        RuleKind::Number,
        RuleKind::MinLength,
        RuleKind::MaxLength,
        RuleKind::Length,
        RuleKind::Pattern,
        RuleKind::Format,
        RuleKind::Type,
        RuleKind::Minimum,
        RuleKind::Maximum,
        RuleKind::Enum,
    ];

    /// The rule's name as it appears in schemas and message catalogs.
    pub const fn name(self) -> &'static str {
        match self {
            RuleKind::Required => "required",
            RuleKind::Number => "number",
            RuleKind::MinLength => "minLength",
            RuleKind::MaxLength => "maxLength",
            RuleKind::Length => "length",
            RuleKind::Pattern => "pattern",
            RuleKind::Format => "format",
            RuleKind::Type => "type",
            RuleKind::Minimum => "minimum",
            RuleKind::Maximum => "maximum",
            RuleKind::Enum => "enum",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The field (or fields) a violation is about.
///
/// Composite rules, such as uniqueness over several columns, reference an
/// ordered list of fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldRef {
    Single(String),
    Composite(Vec<String>),
}

impl FieldRef {
    /// Field names in order.
    pub fn names(&self) -> Vec<&str> {
        match self {
            FieldRef::Single(name) => vec![name.as_str()],
            FieldRef::Composite(names) => names.iter().map(String::as_str).collect(),
        }
    }

    /// Whether `field` is one of the referenced fields.
    pub fn refers_to(&self, field: &str) -> bool {
        match self {
            FieldRef::Single(name) => name == field,
            FieldRef::Composite(names) => names.iter().any(|n| n == field),
        }
    }
}

impl From<&str> for FieldRef {
    fn from(name: &str) -> Self {
        FieldRef::Single(name.to_string())
    }
}

impl From<String> for FieldRef {
    fn from(name: String) -> Self {
        FieldRef::Single(name)
    }
}

impl From<Vec<String>> for FieldRef {
    fn from(names: Vec<String>) -> Self {
        FieldRef::Composite(names)
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names().join(" "))
    }
}

/// One rule violation, before message synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawViolation {
    pub rule: RuleKind,
    pub field: FieldRef,
    /// The offending value (`null` when the field is missing).
    pub value: Value,
    /// The rule's parameter, e.g. `3` for `minLength = 3`.
    pub constraint: Value,
    /// Message already rendered by the evaluator, if it renders its own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RawViolation {
    pub fn new(rule: RuleKind, field: impl Into<FieldRef>, value: Value, constraint: Value) -> Self {
        Self {
            rule,
            field: field.into(),
            value,
            constraint,
            message: None,
        }
    }
}
