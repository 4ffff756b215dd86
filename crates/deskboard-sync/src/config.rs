//! Sync configuration.

use deskboard_models::{OrderBy, Record};

/// Prefix of the environment variables that rename collections.
///
/// `DESKBOARD_TASKS_COLLECTION` overrides the `tasks` collection name,
/// `DESKBOARD_MEETING_ROOMS_COLLECTION` the `meeting_rooms` one.
pub const COLLECTION_ENV_PREFIX: &str = "DESKBOARD_";

/// Configuration for one [`DataSyncController`](crate::DataSyncController).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Collection to fetch and subscribe to.
    pub collection: String,
    /// Stable sort key for every fetch.
    pub order_by: OrderBy,
}

impl SyncConfig {
    /// Creates a config for an explicit collection and order.
    pub fn new(collection: impl Into<String>, order_by: OrderBy) -> Self {
        Self {
            collection: collection.into(),
            order_by,
        }
    }

    /// Uses the record type's collection name and default order.
    pub fn for_record<R: Record>() -> Self {
        Self::new(R::COLLECTION, R::default_order())
    }

    /// Like [`for_record`](Self::for_record), but honours the collection
    /// override variable if it is set and non-empty.
    pub fn from_env<R: Record>() -> Self {
        let config = Self::for_record::<R>();
        match std::env::var(Self::env_var::<R>()) {
            Ok(name) if !name.trim().is_empty() => config.with_collection(name.trim()),
            _ => config,
        }
    }

    /// Name of the variable overriding the collection for `R`.
    pub fn env_var<R: Record>() -> String {
        format!(
            "{}{}_COLLECTION",
            COLLECTION_ENV_PREFIX,
            R::COLLECTION.to_uppercase()
        )
    }

    /// Sets the collection name.
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Sets the sort key.
    pub fn with_order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = order_by;
        self
    }
}
