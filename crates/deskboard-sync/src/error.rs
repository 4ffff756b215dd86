//! Error types for collection synchronization.

use deskboard_models::ValidationError;
use thiserror::Error;

/// Failures reported by a [`CollectionClient`](crate::CollectionClient).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    /// The store could not be reached.
    #[error("collection unreachable: {0}")]
    Unreachable(String),

    /// The store refused the request.
    #[error("request rejected: {0}")]
    Rejected(String),
}

/// Errors that can occur while syncing or mutating a collection.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Fetching the collection failed. The previous snapshot is kept.
    #[error("failed to fetch {collection}: {source}")]
    Fetch {
        collection: String,
        #[source]
        source: CollectionError,
    },

    /// A fetched row did not match the record schema. Nothing was installed.
    #[error("invalid row in {collection}: {source}")]
    Decode {
        collection: String,
        #[source]
        source: ValidationError,
    },

    /// Insert, update or delete was rejected.
    #[error("failed to mutate {collection}: {source}")]
    Mutation {
        collection: String,
        #[source]
        source: CollectionError,
    },

    /// Subscribing to change notifications failed.
    #[error("failed to subscribe to {collection}: {source}")]
    Subscribe {
        collection: String,
        #[source]
        source: CollectionError,
    },

    /// Payload rejected before reaching the store.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Controller is already subscribed.
    #[error("controller already active")]
    AlreadyActive,

    /// Controller has no subscription.
    #[error("controller not active")]
    NotActive,

    /// Lock poisoned (thread panicked while holding lock).
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

impl SyncError {
    /// Returns true for failures that leave a stale but consistent snapshot.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, SyncError::Fetch { .. } | SyncError::Decode { .. })
    }
}

/// Result type alias for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;
