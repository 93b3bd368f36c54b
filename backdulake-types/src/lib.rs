//! Core type definitions for Backdulake stores.
//!
//! This crate defines the resource-agnostic types every store builds on:
//! - [`Record`]: an open field-name → JSON value mapping
//! - [`IdentityValue`]: a record's key, compared with loose equality
//! - [`IdentityResolver`]: reads, writes and compares the configured key field
//!
//! Nothing here knows what a record means; that belongs to the resource
//! a concrete store represents.

mod identity;
mod record;

pub use identity::{IdentityResolver, IdentityValue, DEFAULT_IDENTITY_FIELD};
pub use record::Record;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("invalid identity value: {0}")]
    InvalidIdentity(String),
}

/// Short name of a JSON value's kind, for diagnostics.
pub fn json_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
