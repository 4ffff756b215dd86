//! Traits tying record shapes to their collections.

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::order::OrderBy;

/// A typed record stored in a remote collection.
///
/// Rows arrive as JSON values and are converted with [`Record::from_row`],
/// which rejects anything that does not decode into the schema (for
/// example an unknown status) or that fails [`Record::validate`].
pub trait Record: Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static {
    /// Draft used to create a record.
    type Draft: Payload;
    /// Partial update applied to an existing record.
    type Patch: Payload;

    /// Name of the collection holding these records.
    const COLLECTION: &'static str;

    /// Stable sort key snapshots are fetched by.
    fn default_order() -> OrderBy;

    /// Identity of this record as stored.
    fn id(&self) -> &str;

    /// Checks record invariants that the type system does not cover.
    fn validate(&self) -> Result<()>;

    /// Whether the record belongs in a snapshot at all.
    fn is_active(&self) -> bool {
        true
    }

    /// Decodes and validates a raw row.
    fn from_row(row: Value) -> Result<Self> {
        let record: Self = serde_json::from_value(row)?;
        record.validate()?;
        Ok(record)
    }
}

/// A record that falls into exactly one of a fixed set of categories.
pub trait Categorized {
    /// Category enumeration.
    type Category: Copy + Eq + Debug + Serialize + Send + Sync + 'static;

    /// Canonical display order of every category.
    fn category_order() -> Vec<Self::Category>;

    /// The category this record belongs to.
    fn category(&self) -> Self::Category;
}

/// Body of a create or update request.
pub trait Payload: Serialize + Debug + Clone + Send + Sync {
    /// Rejects the payload before it is sent anywhere.
    fn validate(&self) -> Result<()>;

    /// Serializes the payload into a row fragment.
    fn to_payload(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Fails with [`ValidationError::EmptyField`](crate::ValidationError::EmptyField)
/// when `value` is empty after trimming.
pub(crate) fn require_text(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(crate::ValidationError::EmptyField(field));
    }
    Ok(())
}
