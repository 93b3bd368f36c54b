//! The state a store exposes to its views.

use backdulake_schema::ValidationResult;
use backdulake_types::{IdentityValue, Record};
use serde::Serialize;
use serde_json::Value;

/// Everything a store knows about its remote collection.
///
/// Owned by a single [`Store`](crate::Store); views get a shared reference
/// and every mutation goes through the store's lifecycle handlers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreState {
    /// Records belonging to `parent_id`, in fetched/merged order.
    pub(crate) collection: Vec<Record>,
    /// The selected or edited record. `None` means nothing is selected;
    /// a model without identity is a new, unsaved record.
    pub(crate) model: Option<Record>,
    /// Identity of the record being saved, edited or fetched.
    pub(crate) pending_id: Option<IdentityValue>,
    /// Owner of the collection, opaque to the store.
    pub(crate) parent_id: Option<Value>,
    /// True between issuing a request and its terminal response.
    pub(crate) loading: bool,
    /// Result of the last validate-and-save.
    pub(crate) errors: Option<ValidationResult>,
    /// Server-reported size of the whole collection.
    pub(crate) total: Option<u64>,
    /// Whether more pages are available.
    pub(crate) has_more: bool,
}

impl StoreState {
    /// The initial, empty state.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collection(&self) -> &[Record] {
        &self.collection
    }

    pub fn model(&self) -> Option<&Record> {
        self.model.as_ref()
    }

    pub fn pending_id(&self) -> Option<&IdentityValue> {
        self.pending_id.as_ref()
    }

    pub fn parent_id(&self) -> Option<&Value> {
        self.parent_id.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn errors(&self) -> Option<&ValidationResult> {
        self.errors.as_ref()
    }

    pub fn total(&self) -> Option<u64> {
        self.total
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Serializes the state for a view layer.
    pub fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}
