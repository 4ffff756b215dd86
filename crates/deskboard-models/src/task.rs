//! Task (work item) records.
//!
//! Tasks move through a fixed workflow (`todo` → `in_progress` → `review`
//! → `done`) and are shown on the board grouped by that status.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::ids::{TaskId, UserId};
use crate::order::OrderBy;
use crate::record::{require_text, Categorized, Payload, Record};

/// Workflow status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started.
    #[default]
    Todo,
    /// Being worked on.
    InProgress,
    /// Waiting for review.
    Review,
    /// Finished.
    Done,
}

impl TaskStatus {
    /// Every status in board order.
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::Review,
        TaskStatus::Done,
    ];

    /// Wire name, as stored in the collection.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Review => "review",
            TaskStatus::Done => "done",
        }
    }

    /// Column heading shown on the board.
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Review => "Review",
            TaskStatus::Done => "Done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "status",
                value: s.to_string(),
            })
    }
}

/// Priority of a task. Ordered `Low < Medium < High < Urgent`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    /// Every priority, lowest first.
    pub const ALL: [TaskPriority; 4] = [
        TaskPriority::Low,
        TaskPriority::Medium,
        TaskPriority::High,
        TaskPriority::Urgent,
    ];

    /// Wire name, as stored in the collection.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
            TaskPriority::Urgent => "urgent",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self> {
        TaskPriority::ALL
            .into_iter()
            .find(|priority| priority.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "priority",
                value: s.to_string(),
            })
    }
}

/// A unit of work tracked on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier.
    pub id: TaskId,

    /// Short title, never empty.
    pub title: String,

    /// Longer free-text description.
    #[serde(default)]
    pub description: Option<String>,

    /// Workflow status.
    pub status: TaskStatus,

    /// Priority.
    pub priority: TaskPriority,

    /// Due date, if any.
    #[serde(default)]
    pub deadline: Option<NaiveDate>,

    /// User the task is assigned to; `None` means unassigned.
    #[serde(default)]
    pub assignee_id: Option<UserId>,

    /// User who created the task.
    pub creator_id: UserId,

    /// When the task was created.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Creates a `todo`, medium-priority task created now.
    pub fn new(title: impl Into<String>, creator_id: impl Into<UserId>) -> Self {
        Self {
            id: TaskId::generate(),
            title: title.into(),
            description: None,
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
            deadline: None,
            assignee_id: None,
            creator_id: creator_id.into(),
            created_at: Utc::now(),
        }
    }

    /// Returns true if nobody is assigned.
    pub fn is_unassigned(&self) -> bool {
        self.assignee_id.is_none()
    }

    /// Returns true if the task is finished.
    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }
}

impl Record for Task {
    type Draft = NewTask;
    type Patch = TaskPatch;

    const COLLECTION: &'static str = "tasks";

    fn default_order() -> OrderBy {
        OrderBy::desc("created_at")
    }

    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn validate(&self) -> Result<()> {
        require_text("title", &self.title)?;
        require_text("creator_id", self.creator_id.as_str())
    }
}

impl Categorized for Task {
    type Category = TaskStatus;

    fn category_order() -> Vec<TaskStatus> {
        TaskStatus::ALL.to_vec()
    }

    fn category(&self) -> TaskStatus {
        self.status
    }
}

/// Draft for creating a task.
#[derive(Debug, Clone, Serialize)]
pub struct NewTask {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    pub assignee_id: Option<UserId>,
    pub creator_id: UserId,
}

impl NewTask {
    /// Creates a `todo`, medium-priority draft.
    pub fn new(title: impl Into<String>, creator_id: impl Into<UserId>) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
            deadline: None,
            assignee_id: None,
            creator_id: creator_id.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_assignee(mut self, assignee_id: impl Into<UserId>) -> Self {
        self.assignee_id = Some(assignee_id.into());
        self
    }
}

impl Payload for NewTask {
    fn validate(&self) -> Result<()> {
        require_text("title", &self.title)?;
        require_text("creator_id", self.creator_id.as_str())
    }
}

/// Partial update of a task. `None` leaves a field untouched; for
/// nullable fields `Some(None)` clears the value.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<Option<UserId>>,
}

impl TaskPatch {
    /// Patch that only moves the task to another status column.
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Patch that reassigns the task (`None` unassigns it).
    pub fn assignee(assignee_id: Option<UserId>) -> Self {
        Self {
            assignee_id: Some(assignee_id),
            ..Self::default()
        }
    }

    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.deadline.is_none()
            && self.assignee_id.is_none()
    }
}

impl Payload for TaskPatch {
    fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(ValidationError::EmptyField("changes"));
        }
        if let Some(title) = &self.title {
            require_text("title", title)?;
        }
        Ok(())
    }
}
