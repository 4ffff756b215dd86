//! Error types for filter criteria.

use thiserror::Error;

/// Errors raised while changing filter criteria.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CriteriaError {
    /// No dimension with this name exists for the view.
    #[error("unknown filter dimension: {0}")]
    UnknownDimension(String),

    /// The value is not selectable for the dimension.
    #[error("invalid value for {dimension}: {value:?}")]
    InvalidValue {
        dimension: &'static str,
        value: String,
    },
}

/// Result type alias for criteria operations.
pub type Result<T> = std::result::Result<T, CriteriaError>;
