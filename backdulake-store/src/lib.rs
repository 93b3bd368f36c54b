//! Client-side collection store for Backdulake.
//!
//! A [`Store`] holds the in-memory copy of one remote collection and
//! reconciles it against asynchronous create/update/fetch/delete responses.
//!
//! # Architecture
//!
//! - **Config**: identity field, default model, schema, aliases ([`StoreConfig`])
//! - **State**: collection, selected model, pending id, pagination ([`StoreState`])
//! - **Reconciler**: lifecycle handlers on [`Store`] that mutate the state and
//!   notify a [`ChangeSink`]
//! - **Actions**: a serializable form of every handler call ([`StoreAction`])
//!
//! ## Request lifecycle
//!
//! 1. The dispatcher calls a request handler (`save`, `edit`, `fetch`,
//!    `remove`); `loading` turns on
//! 2. The transport performs the request
//! 3. The dispatcher calls the terminal handler (`saved`, `fetched`,
//!    `removed`, or `failed`); `loading` turns off and the response is merged
//! 4. The store notifies its change sink
//!
//! # Example
//!
//! ```
//! use backdulake_store::{Store, StoreConfig};
//! use serde_json::json;
//!
//! let mut store = Store::new(StoreConfig::new("ContactStore"), || {});
//! store.fetch(Some(json!("account-7")));
//! store.fetched(json!({"collection": [{"id": 1}, {"id": 2}], "total": 5})).unwrap();
//!
//! assert_eq!(store.state().collection().len(), 2);
//! assert!(store.state().has_more());
//! assert!(!store.state().is_loading());
//! ```

mod action;
mod config;
mod error;
mod response;
mod sink;
mod state;
mod store;

pub use action::StoreAction;
pub use config::{FetchTarget, StoreConfig};
pub use error::{StoreError, StoreResult};
pub use sink::{ChangeSink, NoopSink};
pub use state::StoreState;
pub use store::Store;

pub use backdulake_schema::{AliasMap, MessageCatalog, PropertySchema, RuleKind, ValidationResult, ValidationSchema};
pub use backdulake_types::{IdentityResolver, IdentityValue, Record};
