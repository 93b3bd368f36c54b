//! Error types for the store.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors reported by store operations and configuration loading.
///
/// Lifecycle handlers never panic. When one of them hits a usage error it
/// logs it, clears `loading`, leaves the collection and model alone, and
/// hands the error back so the caller can inspect it if it wants to.
#[derive(Debug, Error)]
pub enum StoreError {
    /// `validate` was called without a record.
    #[error("validate needs a record; it does not fall back to the selected model")]
    MissingRecord,

    /// A save acknowledgement carried nothing.
    #[error("the response is empty")]
    EmptyResponse,

    /// A response record lacks the configured identity field.
    #[error("no `{field}` present on the response, changes not applied to the store")]
    MissingIdentity { field: String },

    /// A response did not match any accepted shape.
    #[error("unrecognized response shape: {0}")]
    UnrecognizedResponse(String),

    /// Configuration is inconsistent.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Schema failed to load.
    #[error("schema error: {0}")]
    Schema(#[from] backdulake_schema::SchemaError),

    /// I/O error while reading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parse error.
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl StoreError {
    /// Whether this error came from a misuse of a lifecycle handler rather
    /// than from loading configuration.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            StoreError::MissingRecord
                | StoreError::EmptyResponse
                | StoreError::MissingIdentity { .. }
                | StoreError::UnrecognizedResponse(_)
        )
    }
}
