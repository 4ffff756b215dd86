//! Error types for record validation.

use thiserror::Error;

/// Errors raised when a record or draft fails validation.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A required text field is empty or blank.
    #[error("{0} is required")]
    EmptyField(&'static str),

    /// Capacity must be a positive number of people.
    #[error("capacity must be positive, got {0}")]
    InvalidCapacity(u32),

    /// A field holds a value outside its enumeration.
    #[error("invalid {field}: {value}")]
    InvalidValue { field: &'static str, value: String },

    /// The row could not be decoded into the record shape.
    #[error("failed to decode record: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result type alias for validation.
pub type Result<T> = std::result::Result<T, ValidationError>;
