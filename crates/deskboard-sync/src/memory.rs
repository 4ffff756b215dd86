//! In-process collection store for development and testing.
//!
//! `MemoryBackend` keeps each collection as a list of JSON rows and fans
//! change notifications out to subscribers after every successful
//! mutation, the way a hosted database with realtime channels would.
//! Fetch and mutation failures can be switched on to exercise the
//! degraded paths of the controller.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering as AtomicOrdering};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deskboard_models::OrderBy;
use serde_json::{Map, Value};
use tracing::{debug, trace};
use uuid::Uuid;

use crate::client::{ChangeCallback, ChangeKind, CollectionClient, Mutation, SubscriptionHandle};
use crate::error::CollectionError;

struct Subscriber {
    collection: String,
    on_change: ChangeCallback,
}

/// In-memory [`CollectionClient`].
pub struct MemoryBackend {
    /// Rows by collection name.
    tables: RwLock<HashMap<String, Vec<Value>>>,
    /// Active subscriptions by handle id.
    subscribers: RwLock<HashMap<u64, Subscriber>>,
    next_subscription: AtomicU64,
    fail_fetches: AtomicBool,
    fail_mutations: AtomicBool,
    fetches: AtomicUsize,
}

impl MemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            subscribers: RwLock::new(HashMap::new()),
            next_subscription: AtomicU64::new(1),
            fail_fetches: AtomicBool::new(false),
            fail_mutations: AtomicBool::new(false),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Appends rows to a collection without notifying anyone.
    pub fn seed<I>(&self, collection: &str, rows: I)
    where
        I: IntoIterator<Item = Value>,
    {
        if let Ok(mut tables) = self.tables.write() {
            tables
                .entry(collection.to_string())
                .or_default()
                .extend(rows);
        }
    }

    /// Every stored row of a collection, active or not, in insertion order.
    pub fn rows(&self, collection: &str) -> Vec<Value> {
        self.tables
            .read()
            .ok()
            .and_then(|tables| tables.get(collection).cloned())
            .unwrap_or_default()
    }

    /// Delivers a change notification to every subscriber of `collection`.
    ///
    /// Returns the number of callbacks invoked.
    pub fn notify(&self, collection: &str, kind: ChangeKind) -> usize {
        // Callbacks run outside the lock so they may call back into the backend.
        let callbacks: Vec<ChangeCallback> = match self.subscribers.read() {
            Ok(subs) => subs
                .values()
                .filter(|sub| sub.collection == collection)
                .map(|sub| sub.on_change.clone())
                .collect(),
            Err(_) => return 0,
        };

        trace!(collection, ?kind, subscribers = callbacks.len(), "notifying");
        for callback in &callbacks {
            callback(kind);
        }
        callbacks.len()
    }

    /// Number of live subscriptions across all collections.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().map(|subs| subs.len()).unwrap_or(0)
    }

    /// Makes every subsequent fetch fail (or succeed again).
    pub fn set_fetch_failure(&self, fail: bool) {
        self.fail_fetches.store(fail, AtomicOrdering::SeqCst);
    }

    /// Makes every subsequent mutation fail (or succeed again).
    pub fn set_mutation_failure(&self, fail: bool) {
        self.fail_mutations.store(fail, AtomicOrdering::SeqCst);
    }

    /// Number of fetches attempted so far, failed ones included.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(AtomicOrdering::SeqCst)
    }

    fn apply(&self, collection: &str, mutation: Mutation) -> Result<(), CollectionError> {
        let mut tables = self
            .tables
            .write()
            .map_err(|e| CollectionError::Unreachable(format!("lock poisoned: {}", e)))?;
        let rows = tables.entry(collection.to_string()).or_default();

        match mutation {
            Mutation::Insert { payload } => {
                let mut row = into_object(payload)?;
                row.entry("id")
                    .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
                row.entry("created_at")
                    .or_insert_with(|| Value::String(Utc::now().to_rfc3339()));
                rows.push(Value::Object(row));
            }
            Mutation::Update { id, changes } => {
                let changes = into_object(changes)?;
                let row = rows
                    .iter_mut()
                    .find(|row| row_id(row) == Some(id.as_str()))
                    .and_then(Value::as_object_mut)
                    .ok_or_else(|| CollectionError::Rejected(format!("no row with id {}", id)))?;
                for (key, value) in changes {
                    row.insert(key, value);
                }
            }
            Mutation::Delete { id } => {
                let before = rows.len();
                rows.retain(|row| row_id(row) != Some(id.as_str()));
                if rows.len() == before {
                    return Err(CollectionError::Rejected(format!("no row with id {}", id)));
                }
            }
        }
        Ok(())
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CollectionClient for MemoryBackend {
    async fn fetch_active(
        &self,
        collection: &str,
        order_by: &OrderBy,
    ) -> Result<Vec<Value>, CollectionError> {
        self.fetches.fetch_add(1, AtomicOrdering::SeqCst);
        if self.fail_fetches.load(AtomicOrdering::SeqCst) {
            return Err(CollectionError::Unreachable(format!(
                "{} is not reachable",
                collection
            )));
        }

        let tables = self
            .tables
            .read()
            .map_err(|e| CollectionError::Unreachable(format!("lock poisoned: {}", e)))?;

        let mut rows: Vec<Value> = tables
            .get(collection)
            .map(|rows| rows.iter().filter(|row| is_active(row)).cloned().collect())
            .unwrap_or_default();

        rows.sort_by(|a, b| compare_rows(a, b, order_by));
        Ok(rows)
    }

    async fn mutate(&self, collection: &str, mutation: Mutation) -> Result<(), CollectionError> {
        if self.fail_mutations.load(AtomicOrdering::SeqCst) {
            return Err(CollectionError::Rejected(format!(
                "writes to {} are disabled",
                collection
            )));
        }

        let kind = mutation.kind();
        self.apply(collection, mutation)?;
        debug!(collection, ?kind, "mutation applied");

        self.notify(collection, kind);
        Ok(())
    }

    fn subscribe(
        &self,
        collection: &str,
        on_change: ChangeCallback,
    ) -> Result<SubscriptionHandle, CollectionError> {
        let id = self.next_subscription.fetch_add(1, AtomicOrdering::SeqCst);
        let mut subs = self
            .subscribers
            .write()
            .map_err(|e| CollectionError::Unreachable(format!("lock poisoned: {}", e)))?;
        subs.insert(
            id,
            Subscriber {
                collection: collection.to_string(),
                on_change,
            },
        );
        Ok(SubscriptionHandle::new(id))
    }

    fn unsubscribe(&self, handle: SubscriptionHandle) {
        if let Ok(mut subs) = self.subscribers.write() {
            subs.remove(&handle.id());
        }
    }
}

fn into_object(value: Value) -> Result<Map<String, Value>, CollectionError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(CollectionError::Rejected(format!(
            "expected an object, got {}",
            other
        ))),
    }
}

fn row_id(row: &Value) -> Option<&str> {
    row.get("id").and_then(Value::as_str)
}

/// Rows without an `is_active` column (or with a null one) count as active.
fn is_active(row: &Value) -> bool {
    row.get("is_active").and_then(Value::as_bool).unwrap_or(true)
}

/// Orders two rows by `order_by.column`. Missing and null values sort
/// last in either direction.
fn compare_rows(a: &Value, b: &Value, order_by: &OrderBy) -> Ordering {
    let a = a.get(&order_by.column).filter(|v| !v.is_null());
    let b = b.get(&order_by.column).filter(|v| !v.is_null());

    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) if order_by.ascending => compare_values(a, b),
        (Some(a), Some(b)) => compare_values(b, a),
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => {
            let a = a.as_f64().unwrap_or_default();
            let b = b.as_f64().unwrap_or_default();
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Value::String(a), Value::String(b)) => {
            // Timestamps compare as instants; "Z", offsets and fractions mix freely.
            match (
                DateTime::parse_from_rfc3339(a),
                DateTime::parse_from_rfc3339(b),
            ) {
                (Ok(a), Ok(b)) => a.cmp(&b),
                _ => a.cmp(b),
            }
        }
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}
