//! Serializable lifecycle actions.
//!
//! A dispatcher that receives actions as JSON (from a worker, a socket, a
//! test fixture) can decode them into [`StoreAction`] and route them through
//! [`Store::dispatch`] instead of matching on names itself.

use crate::{Store, StoreResult};
use backdulake_types::{IdentityValue, Record};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// One call to a store lifecycle handler.
///
/// Encoded as `{"action": "saved", "payload": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "payload", rename_all = "snake_case")]
pub enum StoreAction {
    Reset,
    Create,
    Save(Record),
    ValidateAndSave(Record),
    Saved(Value),
    Edit(IdentityValue),
    Fetch(Option<Value>),
    Fetched(Value),
    Remove(Record),
    Removed(Record),
    Failed(String),
}

impl StoreAction {
    /// The handler name, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            StoreAction::Reset => "reset",
            StoreAction::Create => "create",
            StoreAction::Save(_) => "save",
            StoreAction::ValidateAndSave(_) => "validate_and_save",
            StoreAction::Saved(_) => "saved",
            StoreAction::Edit(_) => "edit",
            StoreAction::Fetch(_) => "fetch",
            StoreAction::Fetched(_) => "fetched",
            StoreAction::Remove(_) => "remove",
            StoreAction::Removed(_) => "removed",
            StoreAction::Failed(_) => "failed",
        }
    }
}

impl Store {
    /// Routes an action to its handler.
    ///
    /// Only `saved`, `fetched` and `removed` can report a usage error.
    pub fn dispatch(&mut self, action: StoreAction) -> StoreResult<()> {
        debug!("{}: dispatching {}", self.config().display_name, action.name());
        match action {
            StoreAction::Reset => self.reset(),
            StoreAction::Create => self.create(),
            StoreAction::Save(record) => self.save(record),
            StoreAction::ValidateAndSave(record) => {
                self.validate_and_save(record);
            }
            StoreAction::Saved(response) => return self.saved(response),
            StoreAction::Edit(id) => self.edit(id),
            StoreAction::Fetch(target) => self.fetch(target),
            StoreAction::Fetched(response) => return self.fetched(response),
            StoreAction::Remove(record) => self.remove(&record),
            StoreAction::Removed(record) => return self.removed(&record),
            StoreAction::Failed(reason) => self.failed(reason),
        }
        Ok(())
    }
}
