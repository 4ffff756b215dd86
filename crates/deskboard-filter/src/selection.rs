//! Selector values and their sentinels.

use std::fmt;

use deskboard_models::UserId;
use serde::{Serialize, Serializer};

/// Sentinel disabling a dimension.
pub const ALL: &str = "all";

/// Sentinel matching records without an assignee.
pub const UNASSIGNED: &str = "unassigned";

/// A dimension that is either disabled or pinned to one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    /// Dimension disabled; every record passes.
    All,
    /// Only records with this value pass.
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T> Selection<T> {
    /// Parses a selector value, mapping [`ALL`] to [`Selection::All`].
    pub fn parse_with<E>(
        value: &str,
        parse: impl FnOnce(&str) -> std::result::Result<T, E>,
    ) -> std::result::Result<Self, E> {
        if value == ALL {
            return Ok(Selection::All);
        }
        parse(value).map(Selection::Only)
    }

    /// Returns true if the dimension is disabled.
    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    /// Applies `pred` to the selected value; disabled always passes.
    pub fn matches_by(&self, pred: impl FnOnce(&T) -> bool) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(selected) => pred(selected),
        }
    }
}

impl<T: PartialEq> Selection<T> {
    /// Returns true if disabled or equal to `value`.
    pub fn matches(&self, value: &T) -> bool {
        self.matches_by(|selected| selected == value)
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str(ALL),
            Selection::Only(value) => write!(f, "{}", value),
        }
    }
}

impl<T: fmt::Display> Serialize for Selection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Assignee selector: disabled, unassigned only, or one user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AssigneeSelection {
    #[default]
    All,
    Unassigned,
    User(UserId),
}

impl AssigneeSelection {
    /// Parses `"all"`, `"unassigned"`, or a user id. Empty is `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "" => None,
            ALL => Some(AssigneeSelection::All),
            UNASSIGNED => Some(AssigneeSelection::Unassigned),
            id => Some(AssigneeSelection::User(UserId::from_string(id))),
        }
    }

    /// Returns true if the dimension is disabled.
    pub fn is_all(&self) -> bool {
        matches!(self, AssigneeSelection::All)
    }

    /// Returns true if a record with `assignee` passes.
    pub fn matches(&self, assignee: Option<&UserId>) -> bool {
        match self {
            AssigneeSelection::All => true,
            AssigneeSelection::Unassigned => assignee.is_none(),
            AssigneeSelection::User(selected) => assignee == Some(selected),
        }
    }
}

impl fmt::Display for AssigneeSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssigneeSelection::All => f.write_str(ALL),
            AssigneeSelection::Unassigned => f.write_str(UNASSIGNED),
            AssigneeSelection::User(id) => write!(f, "{}", id),
        }
    }
}

impl Serialize for AssigneeSelection {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
