//! Schema-driven validation for Backdulake records.
//!
//! Turns a declarative per-field schema into human-readable messages:
//! - [`ValidationSchema`] / [`PropertySchema`]: required fields, types, string
//!   length bounds, patterns and formats, keyed by field name
//! - [`SchemaEvaluator`]: the rule-evaluation capability (pluggable);
//!   [`RuleEvaluator`] is the built-in implementation
//! - [`AliasMap`] / [`MessageCatalog`]: display labels and message templates
//! - [`Validator`]: runs the evaluator and produces a [`ValidationResult`]
//!
//! Validation never fails: violations are returned as data.

mod error;
mod evaluator;
mod messages;
mod schema;
mod validator;
mod violation;

pub use error::{SchemaError, SchemaResult};
pub use evaluator::{EvaluationOptions, RuleEvaluator, SchemaEvaluator};
pub use messages::{indefinite_article, AliasMap, MessageCatalog, MessageFormatter};
pub use schema::{PropertySchema, ValidationSchema};
pub use validator::{FieldError, ValidationResult, Validator};
pub use violation::{FieldRef, RawViolation, RuleKind};
