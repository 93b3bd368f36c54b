//! Shapes of server responses the store consumes.

use crate::{StoreError, StoreResult};
use backdulake_types::{json_kind, IdentityResolver, IdentityValue, Record};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::warn;

/// Unwraps a save acknowledgement: `{ "data": record }` or a bare record.
pub(crate) fn save_ack(response: Value) -> StoreResult<Record> {
    let body = match response {
        Value::Object(mut map) if map.get("data").is_some_and(|d| !d.is_null()) => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };

    match body {
        Value::Null => Err(StoreError::EmptyResponse),
        Value::Object(map) if map.is_empty() => Err(StoreError::EmptyResponse),
        Value::Array(items) if items.is_empty() => Err(StoreError::EmptyResponse),
        Value::Object(map) => Ok(Record::from(map)),
        other => Err(StoreError::UnrecognizedResponse(format!(
            "expected a record, got {}",
            json_kind(&other)
        ))),
    }
}

/// A fetch response, classified.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Fetched {
    /// A bare list replacing the collection.
    Flat(Vec<Record>),
    /// One page to accumulate into the collection.
    Page { records: Vec<Record>, total: Option<u64> },
    /// A single resource.
    Single(Record),
}

impl Fetched {
    /// Tries, in order: bare list, `{collection, total?}` page, single record.
    pub(crate) fn classify(response: Value, resolver: &IdentityResolver) -> StoreResult<Self> {
        match response {
            Value::Array(items) => Ok(Fetched::Flat(records_of(items))),
            Value::Object(map) if map.get("collection").is_some_and(Value::is_array) => {
                Ok(Self::page(map))
            }
            Value::Object(map) => {
                let record = Record::from(map);
                if resolver.has_identity(&record) {
                    Ok(Fetched::Single(record))
                } else {
                    Err(StoreError::UnrecognizedResponse(format!(
                        "object has neither a collection nor a `{}`",
                        resolver.field()
                    )))
                }
            }
            other => Err(StoreError::UnrecognizedResponse(format!(
                "expected a list or an object, got {}",
                json_kind(&other)
            ))),
        }
    }

    fn page(mut map: Map<String, Value>) -> Self {
        let items = match map.remove("collection") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        };
        let total = match map.get("total") {
            None | Some(Value::Null) => None,
            Some(v) => {
                let total = v.as_u64();
                if total.is_none() {
                    warn!("Ignoring non-integer page total: {}", v);
                }
                total
            }
        };
        Fetched::Page {
            records: records_of(items),
            total,
        }
    }
}

fn records_of(items: Vec<Value>) -> Vec<Record> {
    items
        .into_iter()
        .filter_map(|item| match Record::from_value(item) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping collection entry: {}", e);
                None
            }
        })
        .collect()
}

/// Keeps the first record per identity, preserving order. Records without
/// an identity cannot collide and are all kept.
pub(crate) fn dedupe(records: Vec<Record>, resolver: &IdentityResolver) -> Vec<Record> {
    let mut seen: HashSet<IdentityValue> = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| match resolver.identity_of(record) {
            Some(id) => seen.insert(id),
            None => true,
        })
        .collect()
}
