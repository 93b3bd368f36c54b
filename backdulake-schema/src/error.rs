//! Error types for schema loading.

use thiserror::Error;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur while loading or checking a schema.
///
/// Evaluating a schema against a record never produces one of these;
/// violations are data, see [`ValidationResult`](crate::ValidationResult).
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A property's `pattern` is not a valid regular expression.
    #[error("invalid pattern for field {field}: {source}")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex_lite::Error,
    },

    /// The schema root is not an object schema.
    #[error("unsupported schema type: {0}")]
    UnsupportedType(String),

    /// JSON (de)serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parse error.
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
