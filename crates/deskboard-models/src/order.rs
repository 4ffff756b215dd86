//! Sort keys for collection fetches.

use serde::{Deserialize, Serialize};

/// Stable sort key a collection is fetched by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    /// Column (row field) to sort on.
    pub column: String,
    /// Ascending when true, descending otherwise.
    pub ascending: bool,
}

impl OrderBy {
    /// Ascending order on `column`.
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: true,
        }
    }

    /// Descending order on `column`.
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: false,
        }
    }
}
