//! The validator: runs an evaluator over a record and names each problem.

use crate::{
    AliasMap, EvaluationOptions, FieldRef, MessageCatalog, MessageFormatter, RuleEvaluator, RuleKind,
    SchemaEvaluator, ValidationSchema,
};
use backdulake_types::Record;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// One human-readable validation problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: FieldRef,
    pub rule: RuleKind,
    pub message: String,
}

/// Ordered list of validation problems. Never empty when returned by
/// [`Validator::validate`]; a valid record yields `None` instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationResult(Vec<FieldError>);

impl ValidationResult {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self(errors)
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All messages, in order.
    pub fn messages(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.message.as_str()).collect()
    }

    /// Problems that mention `field`, including composite ones.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldError> + 'a {
        self.0.iter().filter(move |e| e.field.refers_to(field))
    }

    /// Whether any problem of kind `rule` was reported for `field`.
    pub fn has(&self, field: &str, rule: RuleKind) -> bool {
        self.for_field(field).any(|e| e.rule == rule)
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().join(" "))
    }
}

impl<'a> IntoIterator for &'a ValidationResult {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Validates records against a schema and renders alias-aware messages.
#[derive(Clone)]
pub struct Validator {
    schema: ValidationSchema,
    aliases: AliasMap,
    catalog: MessageCatalog,
    evaluator: Arc<dyn SchemaEvaluator>,
}

impl Validator {
    /// Creates a validator using the built-in [`RuleEvaluator`].
    pub fn new(schema: ValidationSchema, aliases: AliasMap, catalog: MessageCatalog) -> Self {
        Self {
            schema,
            aliases,
            catalog,
            evaluator: Arc::new(RuleEvaluator::new()),
        }
    }

    /// Swaps in a different evaluation capability.
    #[must_use]
    pub fn with_evaluator(mut self, evaluator: Arc<dyn SchemaEvaluator>) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn schema(&self) -> &ValidationSchema {
        &self.schema
    }

    pub fn aliases(&self) -> &AliasMap {
        &self.aliases
    }

    pub fn catalog(&self) -> &MessageCatalog {
        &self.catalog
    }

    /// Validates `record` against `schema`, or the configured schema.
    ///
    /// Every violation is collected, not just the first per field.
    /// Returns `None` when the record is valid.
    pub fn validate(&self, record: &Record, schema: Option<&ValidationSchema>) -> Option<ValidationResult> {
        let schema = schema.unwrap_or(&self.schema);
        let formatter = MessageFormatter::new(&self.aliases, &self.catalog);
        let options = EvaluationOptions {
            single_error: false,
            messages: formatter,
        };

        let value = record.clone().into_value();
        let errors: Vec<FieldError> = self
            .evaluator
            .evaluate(&value, schema, &options)
            .into_iter()
            .map(|violation| {
                let message = match violation.message {
                    Some(ref rendered) => rendered.clone(),
                    None => formatter.format(&violation),
                };
                FieldError {
                    field: violation.field,
                    rule: violation.rule,
                    message,
                }
            })
            .collect();

        if errors.is_empty() {
            return None;
        }
        debug!("Validation found {} problem(s)", errors.len());
        Some(ValidationResult(errors))
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationSchema::default(), AliasMap::default(), MessageCatalog::default())
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("schema", &self.schema)
            .field("aliases", &self.aliases)
            .field("catalog", &self.catalog)
            .finish_non_exhaustive()
    }
}
