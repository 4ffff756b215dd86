//! Core data models for Deskboard.
//!
//! This crate provides the record shapes shared by every Deskboard
//! component: work items (tasks), bookable meeting rooms, their
//! enumerations, and the drafts used to create or change them.
//!
//! Records reach Deskboard as loosely-typed JSON rows. The [`Record`]
//! trait decodes and validates a row at that boundary, so everything
//! downstream works with well-formed values only.

pub mod bucket;
pub mod error;
pub mod ids;
pub mod order;
pub mod record;
pub mod room;
pub mod task;

// Re-export main types
pub use bucket::CapacityBucket;
pub use error::{Result, ValidationError};
pub use ids::{RoomId, TaskId, UserId};
pub use order::OrderBy;
pub use record::{Categorized, Payload, Record};
pub use room::{NewRoom, Room, RoomPatch};
pub use task::{NewTask, Task, TaskPatch, TaskPriority, TaskStatus};
