//! Store configuration.
//!
//! Configuration is fixed at construction and survives `reset`. It can be
//! built in code or read from a TOML/JSON file:
//!
//! ```toml
//! display_name = "ContactStore"
//! identity_field = "_id"
//! fetch_target = "parent"
//!
//! [default_model]
//! name = ""
//! active = true
//!
//! [aliases]
//! pc = "Postal Code"
//!
//! [schema.properties.name]
//! required = true
//! type = "string"
//! ```

use crate::{StoreError, StoreResult};
use backdulake_schema::{AliasMap, MessageCatalog, ValidationSchema};
use backdulake_types::{Record, DEFAULT_IDENTITY_FIELD};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// What the optional argument of `fetch` identifies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchTarget {
    /// The owner of the collection; stored as `parent_id`.
    #[default]
    Parent,
    /// A single resource; stored as `pending_id`.
    Resource,
}

/// Construction-time settings of a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Name used to prefix diagnostics.
    pub display_name: String,
    /// Field holding a record's identity.
    pub identity_field: String,
    /// Template copied into the model by `create`.
    pub default_model: Record,
    /// Schema used by `validate` when none is passed.
    pub schema: ValidationSchema,
    /// Display labels for validation messages.
    pub aliases: AliasMap,
    /// Per-rule message overrides.
    pub messages: MessageCatalog,
    pub fetch_target: FetchTarget,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            display_name: "Store".to_string(),
            identity_field: DEFAULT_IDENTITY_FIELD.to_string(),
            default_model: Record::new(),
            schema: ValidationSchema::default(),
            aliases: AliasMap::default(),
            messages: MessageCatalog::default(),
            fetch_target: FetchTarget::Parent,
        }
    }
}

impl StoreConfig {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_identity_field(mut self, field: impl Into<String>) -> Self {
        self.identity_field = field.into();
        self
    }

    #[must_use]
    pub fn with_default_model(mut self, model: Record) -> Self {
        self.default_model = model;
        self
    }

    #[must_use]
    pub fn with_schema(mut self, schema: ValidationSchema) -> Self {
        self.schema = schema;
        self
    }

    #[must_use]
    pub fn with_aliases(mut self, aliases: AliasMap) -> Self {
        self.aliases = aliases;
        self
    }

    #[must_use]
    pub fn with_messages(mut self, messages: MessageCatalog) -> Self {
        self.messages = messages;
        self
    }

    #[must_use]
    pub fn with_fetch_target(mut self, target: FetchTarget) -> Self {
        self.fetch_target = target;
        self
    }

    /// Parses and checks a TOML configuration.
    pub fn from_toml_str(text: &str) -> StoreResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.check()?;
        Ok(config)
    }

    /// Parses and checks a JSON configuration.
    pub fn from_json_str(json: &str) -> StoreResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.check()?;
        Ok(config)
    }

    /// Reads a configuration file. `.json` files are parsed as JSON,
    /// anything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text),
            _ => Self::from_toml_str(&text),
        }
    }

    /// Checks internal consistency.
    ///
    /// Unknown message-catalog keys are only warned about; they are harmless.
    pub fn check(&self) -> StoreResult<()> {
        if self.identity_field.trim().is_empty() {
            return Err(StoreError::Config("identity_field must not be empty".into()));
        }
        self.schema.check()?;
        for key in self.messages.unknown_rules() {
            warn!("{}: message override for unknown rule {:?} is ignored", self.display_name, key);
        }
        Ok(())
    }
}
