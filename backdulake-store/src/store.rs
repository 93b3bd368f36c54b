//! The reconciler: lifecycle handlers that fold server responses into
//! the store's state.
//!
//! Request-issuing handlers (`save`, `edit`, `fetch`, `remove`) only flip
//! `loading` on and record what is in flight. Their terminal counterparts
//! (`saved`, `fetched`, `removed`, `failed`) flip it off and reconcile.
//! Requests are not serialized: if several are in flight, whichever
//! terminal handler runs last wins.

use crate::response::{self, Fetched};
use crate::{ChangeSink, FetchTarget, StoreConfig, StoreError, StoreResult, StoreState};
use backdulake_schema::{SchemaEvaluator, ValidationResult, ValidationSchema, Validator};
use backdulake_types::{IdentityResolver, IdentityValue, Record};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// A client-side store for one remote collection.
pub struct Store {
    config: StoreConfig,
    resolver: IdentityResolver,
    validator: Validator,
    state: StoreState,
    sink: Box<dyn ChangeSink>,
}

impl Store {
    /// Creates a store in its initial empty state.
    pub fn new(config: StoreConfig, sink: impl ChangeSink + 'static) -> Self {
        let resolver = IdentityResolver::new(config.identity_field.clone());
        let validator = Validator::new(
            config.schema.clone(),
            config.aliases.clone(),
            config.messages.clone(),
        );
        Self {
            config,
            resolver,
            validator,
            state: StoreState::new(),
            sink: Box::new(sink),
        }
    }

    /// Replaces the built-in schema evaluator.
    #[must_use]
    pub fn with_evaluator(mut self, evaluator: Arc<dyn SchemaEvaluator>) -> Self {
        self.validator = self.validator.with_evaluator(evaluator);
        self
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn resolver(&self) -> &IdentityResolver {
        &self.resolver
    }

    /// First record in the collection whose identity loosely equals `id`.
    pub fn find(&self, id: &IdentityValue) -> Option<&Record> {
        self.resolver.find(&self.state.collection, id)
    }

    /// Validates `record` against `schema`, or the configured schema.
    ///
    /// There is no fallback to the selected model: a missing record is a
    /// usage error. `Ok(None)` means the record is valid.
    pub fn validate(
        &self,
        record: Option<&Record>,
        schema: Option<&ValidationSchema>,
    ) -> StoreResult<Option<ValidationResult>> {
        let Some(record) = record else {
            error!("{}.validate: {}", self.config.display_name, StoreError::MissingRecord);
            return Err(StoreError::MissingRecord);
        };
        Ok(self.validator.validate(record, schema))
    }

    // ── Lifecycle handlers ───────────────────────────────────────

    /// Clears all state. Configuration is kept.
    pub fn reset(&mut self) {
        self.state = StoreState::new();
        debug!("{}: reset", self.config.display_name);
        self.emit_change();
    }

    /// Starts a new record from the default model.
    pub fn create(&mut self) {
        self.state.model = Some(self.config.default_model.clone());
        self.state.pending_id = None;
        self.state.loading = false;
        self.emit_change();
    }

    /// Records an outgoing save. The collection is only touched once the
    /// server acknowledges it in [`saved`](Self::saved).
    pub fn save(&mut self, record: Record) {
        if let Some(id) = self.resolver.identity_of(&record) {
            self.state.pending_id = Some(id);
        }
        self.state.model = Some(record);
        self.state.loading = true;
    }

    /// Validates `record`, keeps the outcome in `errors`, then saves it.
    /// Returns whether the record was valid. Saving happens either way;
    /// whether to send an invalid record is the caller's call.
    pub fn validate_and_save(&mut self, record: Record) -> bool {
        debug!("{}: validating record before save", self.config.display_name);
        self.state.errors = self.validator.validate(&record, None);
        let valid = self.state.errors.is_none();
        self.save(record);
        valid
    }

    /// Reconciles a save acknowledgement.
    ///
    /// The response (or its `data` field) is merged over the local model,
    /// server fields winning, then upserted into the collection.
    pub fn saved(&mut self, response: Value) -> StoreResult<()> {
        self.state.loading = false;

        let record = match response::save_ack(response) {
            Ok(record) => record,
            Err(e) => return self.usage_error("saved", e),
        };
        let Some(id) = self.resolver.identity_of(&record) else {
            let field = self.resolver.field().to_string();
            return self.usage_error("saved", StoreError::MissingIdentity { field });
        };

        let merged = match self.state.model.take() {
            Some(model) if !model.is_empty() => model.merged(&record),
            _ => {
                warn!(
                    "{}.saved: the model prior to the server response is empty, adopting the response",
                    self.config.display_name
                );
                record
            }
        };

        if let Some(pending) = &self.state.pending_id {
            if *pending != id {
                warn!(
                    "{}.saved: response {} = {} does not match pending {}; was save routed through this store?",
                    self.config.display_name,
                    self.resolver.field(),
                    id,
                    pending
                );
            }
        }

        match self.resolver.position(&self.state.collection, &id) {
            Some(index) => {
                self.state.collection[index] = merged.clone();
                if self.state.pending_id.is_none() {
                    self.state.pending_id = Some(id);
                }
            }
            None => {
                self.state.collection.push(merged.clone());
                self.state.pending_id = Some(id);
            }
        }
        self.state.model = Some(merged);
        self.emit_change();
        Ok(())
    }

    /// Selects a record for editing. If the collection has not been
    /// fetched yet the model stays `None` until [`fetched`](Self::fetched)
    /// resolves it.
    pub fn edit(&mut self, id: IdentityValue) {
        self.state.model = self.find(&id).cloned();
        self.state.pending_id = Some(id);
        self.state.loading = true;
    }

    /// Records an outgoing fetch. `target` is the parent id, or the
    /// resource id when the store is configured for [`FetchTarget::Resource`].
    pub fn fetch(&mut self, target: Option<Value>) {
        self.state.loading = true;
        let Some(target) = target else {
            return;
        };
        match self.config.fetch_target {
            FetchTarget::Parent => self.state.parent_id = Some(target),
            FetchTarget::Resource => match IdentityValue::from_value(target) {
                Ok(id) => self.state.pending_id = Some(id),
                Err(e) => warn!("{}.fetch: ignoring resource id: {}", self.config.display_name, e),
            },
        }
    }

    /// Reconciles a fetch response.
    ///
    /// A bare list replaces the collection. A `{collection, total}` page is
    /// appended and deduplicated, keeping the first record per identity, so
    /// fetching the same page twice is harmless. A single record becomes
    /// the model.
    pub fn fetched(&mut self, response: Value) -> StoreResult<()> {
        self.state.loading = false;

        let shape = match Fetched::classify(response, &self.resolver) {
            Ok(shape) => shape,
            Err(e) => return self.usage_error("fetched", e),
        };

        match shape {
            Fetched::Flat(records) => {
                self.state.total = Some(records.len() as u64);
                self.state.collection = records;
                self.state.has_more = false;
                self.select_pending();
            }
            Fetched::Page { records, total } => {
                let mut combined = std::mem::take(&mut self.state.collection);
                combined.extend(records);
                self.state.collection = response::dedupe(combined, &self.resolver);
                self.state.total = total.or(self.state.total);
                let len = self.state.collection.len() as u64;
                self.state.has_more = self.state.total.is_some_and(|total| total > len);
                self.select_pending();
            }
            Fetched::Single(record) => {
                self.state.model = Some(record);
            }
        }

        debug!(
            "{}: fetched, {} record(s) held",
            self.config.display_name,
            self.state.collection.len()
        );
        self.emit_change();
        Ok(())
    }

    /// Records an outgoing delete. Nothing is removed until
    /// [`removed`](Self::removed).
    pub fn remove(&mut self, record: &Record) {
        self.state.loading = true;
        debug!(
            "{}: removing {:?}",
            self.config.display_name,
            self.resolver.identity_of(record).map(|id| id.to_string())
        );
    }

    /// Drops a deleted record from the collection, clearing the selection
    /// if it was the selected one.
    pub fn removed(&mut self, record: &Record) -> StoreResult<()> {
        self.state.loading = false;

        let Some(id) = self.resolver.identity_of(record) else {
            let field = self.resolver.field().to_string();
            return self.usage_error("removed", StoreError::MissingIdentity { field });
        };

        let resolver = &self.resolver;
        self.state.collection.retain(|r| !resolver.matches(r, &id));

        let selected = self
            .state
            .model
            .as_ref()
            .is_some_and(|model| resolver.matches(model, &id));
        if selected {
            self.state.model = None;
            self.state.pending_id = None;
        }
        self.emit_change();
        Ok(())
    }

    /// Terminal handler for a failed request. Only clears `loading`; the
    /// failure itself is reported through whatever channel delivered it.
    pub fn failed(&mut self, reason: impl fmt::Display) {
        self.state.loading = false;
        warn!("{}: request failed: {}", self.config.display_name, reason);
    }

    // ── Internals ────────────────────────────────────────────────

    fn select_pending(&mut self) {
        if let Some(id) = &self.state.pending_id {
            self.state.model = self.resolver.find(&self.state.collection, id).cloned();
        }
    }

    fn usage_error(&self, handler: &str, e: StoreError) -> StoreResult<()> {
        error!("{}.{}: {}", self.config.display_name, handler, e);
        Err(e)
    }

    fn emit_change(&self) {
        self.sink.emit_change();
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("config", &self.config)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
