//! Contract of the external collection store.
//!
//! The store owns every record. Deskboard only reads active rows, submits
//! mutations, and listens for change notifications; it never patches its
//! own copy.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use deskboard_models::OrderBy;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CollectionError;

/// Kind of change a notification reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// A write submitted to the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Create a row from `payload`.
    Insert { payload: Value },
    /// Merge `changes` into the row with id `id`.
    Update { id: String, changes: Value },
    /// Remove the row with id `id`.
    Delete { id: String },
}

impl Mutation {
    /// The change notification this mutation produces.
    pub fn kind(&self) -> ChangeKind {
        match self {
            Mutation::Insert { .. } => ChangeKind::Insert,
            Mutation::Update { .. } => ChangeKind::Update,
            Mutation::Delete { .. } => ChangeKind::Delete,
        }
    }
}

/// Callback invoked once per change notification.
pub type ChangeCallback = Arc<dyn Fn(ChangeKind) + Send + Sync>;

/// Opaque handle identifying one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

impl SubscriptionHandle {
    /// Wraps a store-assigned subscription number.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Store-assigned subscription number.
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Trait for collection stores.
///
/// Fetches and mutations are async and may take arbitrarily long; timeouts
/// belong to the implementation, which reports them as ordinary failures.
/// Notifications are delivered at least once per successful mutation and
/// carry no ordering guarantee across collections.
#[async_trait]
pub trait CollectionClient: Send + Sync {
    /// Returns every active row of `collection` (all rows if the collection
    /// has no `is_active` column), sorted by `order_by`.
    async fn fetch_active(
        &self,
        collection: &str,
        order_by: &OrderBy,
    ) -> Result<Vec<Value>, CollectionError>;

    /// Applies an insert, update or delete.
    async fn mutate(&self, collection: &str, mutation: Mutation) -> Result<(), CollectionError>;

    /// Registers `on_change` for every change to `collection`.
    fn subscribe(
        &self,
        collection: &str,
        on_change: ChangeCallback,
    ) -> Result<SubscriptionHandle, CollectionError>;

    /// Releases a subscription. Unknown handles are ignored.
    fn unsubscribe(&self, handle: SubscriptionHandle);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mutation_kind() {
        let insert = Mutation::Insert {
            payload: json!({ "name": "Orion" }),
        };
        let delete = Mutation::Delete { id: "r-1".into() };

        assert_eq!(insert.kind(), ChangeKind::Insert);
        assert_eq!(delete.kind(), ChangeKind::Delete);
    }

    #[test]
    fn test_change_kind_serialization() {
        assert_eq!(serde_json::to_string(&ChangeKind::Update).unwrap(), "\"update\"");
    }

    #[test]
    fn test_handle_display() {
        assert_eq!(SubscriptionHandle::new(7).to_string(), "sub-7");
    }
}
