//! Completion counts for dashboard cards.

use deskboard_models::{Task, UserId};
use serde::Serialize;

/// Task totals with a rounded completion percentage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskSummary {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Percent of tasks done, rounded half up; 0 when there are no tasks.
    pub completion_rate: u8,
}

impl TaskSummary {
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let (total, completed) = tasks.into_iter().fold((0, 0), |(total, done), task| {
            (total + 1, done + usize::from(task.is_done()))
        });

        let completion_rate = if total == 0 {
            0
        } else {
            ((completed * 200 + total) / (total * 2)) as u8
        };

        Self {
            total,
            completed,
            pending: total - completed,
            completion_rate,
        }
    }

    /// Summary of the tasks assigned to one user.
    pub fn for_assignee(tasks: &[Task], user: &UserId) -> Self {
        Self::from_tasks(
            tasks
                .iter()
                .filter(|task| task.assignee_id.as_ref() == Some(user)),
        )
    }
}
