//! Filter criteria for task and room views.
//!
//! A criteria value holds one selection per dimension. Records pass when
//! they pass every enabled dimension; a disabled dimension always passes.

use std::fmt;
use std::str::FromStr;

use deskboard_models::{CapacityBucket, Record, Room, Task, TaskPriority, TaskStatus};
use serde::Serialize;

use crate::error::{CriteriaError, Result};
use crate::predicate::{contains_label, text_matches};
use crate::selection::{AssigneeSelection, Selection};

/// A view's filter state.
pub trait Criteria: Clone + Default + fmt::Debug + Send + Sync {
    /// Record type being filtered.
    type Record: Record;
    /// Dimension names accepted by [`set`](Criteria::set).
    type Dimension: Copy + fmt::Debug + fmt::Display + FromStr<Err = CriteriaError>;

    /// Replaces one dimension's value.
    ///
    /// `"all"` (or `""` for the text query) disables the dimension.
    fn set(&mut self, dimension: Self::Dimension, value: &str) -> Result<()>;

    /// Current value of a dimension, as a selector would show it.
    fn value(&self, dimension: Self::Dimension) -> String;

    /// Returns true if `record` passes every enabled dimension.
    fn matches(&self, record: &Self::Record) -> bool;

    /// Returns true if any dimension is enabled.
    fn has_active_filters(&self) -> bool;

    /// Disables every dimension.
    fn clear(&mut self) {
        *self = Self::default();
    }
}

fn invalid(dimension: &'static str, value: &str) -> CriteriaError {
    CriteriaError::InvalidValue {
        dimension,
        value: value.to_string(),
    }
}

/// Dimensions of the task view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskDimension {
    /// Free text over title and description.
    Query,
    Status,
    Priority,
    /// Assignee id, or `"unassigned"`.
    Assignee,
}

impl TaskDimension {
    pub const ALL: [TaskDimension; 4] = [
        TaskDimension::Query,
        TaskDimension::Status,
        TaskDimension::Priority,
        TaskDimension::Assignee,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskDimension::Query => "query",
            TaskDimension::Status => "status",
            TaskDimension::Priority => "priority",
            TaskDimension::Assignee => "assignee",
        }
    }
}

impl fmt::Display for TaskDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskDimension {
    type Err = CriteriaError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "query" | "search" => Ok(TaskDimension::Query),
            "status" => Ok(TaskDimension::Status),
            "priority" => Ok(TaskDimension::Priority),
            "assignee" => Ok(TaskDimension::Assignee),
            other => Err(CriteriaError::UnknownDimension(other.to_string())),
        }
    }
}

/// Filter state of the task view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskCriteria {
    pub query: String,
    pub status: Selection<TaskStatus>,
    pub priority: Selection<TaskPriority>,
    pub assignee: AssigneeSelection,
}

impl Criteria for TaskCriteria {
    type Record = Task;
    type Dimension = TaskDimension;

    fn set(&mut self, dimension: TaskDimension, value: &str) -> Result<()> {
        match dimension {
            TaskDimension::Query => self.query = value.to_string(),
            TaskDimension::Status => {
                self.status =
                    Selection::parse_with(value, str::parse).map_err(|_| invalid("status", value))?
            }
            TaskDimension::Priority => {
                self.priority = Selection::parse_with(value, str::parse)
                    .map_err(|_| invalid("priority", value))?
            }
            TaskDimension::Assignee => {
                self.assignee =
                    AssigneeSelection::parse(value).ok_or_else(|| invalid("assignee", value))?
            }
        }
        Ok(())
    }

    fn value(&self, dimension: TaskDimension) -> String {
        match dimension {
            TaskDimension::Query => self.query.clone(),
            TaskDimension::Status => self.status.to_string(),
            TaskDimension::Priority => self.priority.to_string(),
            TaskDimension::Assignee => self.assignee.to_string(),
        }
    }

    fn matches(&self, task: &Task) -> bool {
        text_matches(&self.query, &[Some(task.title.as_str()), task.description.as_deref()])
            && self.status.matches(&task.status)
            && self.priority.matches(&task.priority)
            && self.assignee.matches(task.assignee_id.as_ref())
    }

    fn has_active_filters(&self) -> bool {
        !self.query.is_empty()
            || !self.status.is_all()
            || !self.priority.is_all()
            || !self.assignee.is_all()
    }
}

/// Dimensions of the room view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomDimension {
    /// Free text over name and location.
    Query,
    /// Capacity bucket label, e.g. `"6-10"`.
    Capacity,
    /// One equipment label.
    Equipment,
}

impl RoomDimension {
    pub const ALL: [RoomDimension; 3] = [
        RoomDimension::Query,
        RoomDimension::Capacity,
        RoomDimension::Equipment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoomDimension::Query => "query",
            RoomDimension::Capacity => "capacity",
            RoomDimension::Equipment => "equipment",
        }
    }
}

impl fmt::Display for RoomDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomDimension {
    type Err = CriteriaError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "query" | "search" => Ok(RoomDimension::Query),
            "capacity" => Ok(RoomDimension::Capacity),
            "equipment" => Ok(RoomDimension::Equipment),
            other => Err(CriteriaError::UnknownDimension(other.to_string())),
        }
    }
}

/// Filter state of the room view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoomCriteria {
    pub query: String,
    pub capacity: Selection<CapacityBucket>,
    pub equipment: Selection<String>,
}

impl Criteria for RoomCriteria {
    type Record = Room;
    type Dimension = RoomDimension;

    fn set(&mut self, dimension: RoomDimension, value: &str) -> Result<()> {
        match dimension {
            RoomDimension::Query => self.query = value.to_string(),
            RoomDimension::Capacity => {
                self.capacity = Selection::parse_with(value, str::parse)
                    .map_err(|_| invalid("capacity", value))?
            }
            RoomDimension::Equipment => {
                self.equipment = Selection::parse_with(value, |label| {
                    if label.is_empty() {
                        Err(invalid("equipment", label))
                    } else {
                        Ok(label.to_string())
                    }
                })?
            }
        }
        Ok(())
    }

    fn value(&self, dimension: RoomDimension) -> String {
        match dimension {
            RoomDimension::Query => self.query.clone(),
            RoomDimension::Capacity => self.capacity.to_string(),
            RoomDimension::Equipment => self.equipment.to_string(),
        }
    }

    fn matches(&self, room: &Room) -> bool {
        text_matches(&self.query, &[Some(room.name.as_str()), room.location.as_deref()])
            && self.capacity.matches_by(|bucket| bucket.contains(room.capacity))
            && self
                .equipment
                .matches_by(|label| contains_label(&room.equipment, label))
    }

    fn has_active_filters(&self) -> bool {
        !self.query.is_empty() || !self.capacity.is_all() || !self.equipment.is_all()
    }
}
