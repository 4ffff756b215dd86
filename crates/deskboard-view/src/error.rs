//! Error types for view state operations.

use deskboard_filter::CriteriaError;
use deskboard_sync::SyncError;
use thiserror::Error;

/// Errors surfaced by a [`ViewState`](crate::ViewState).
#[derive(Error, Debug)]
pub enum ViewError {
    /// Fetching, subscribing or mutating failed.
    #[error(transparent)]
    Sync(#[from] SyncError),

    /// A criterion could not be applied. The criteria are unchanged.
    #[error(transparent)]
    Criteria(#[from] CriteriaError),
}

impl ViewError {
    /// Returns true if the view still shows its previous snapshot.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, ViewError::Sync(e) if e.is_fetch_failure())
    }
}

/// Result type alias for view operations.
pub type Result<T> = std::result::Result<T, ViewError>;
