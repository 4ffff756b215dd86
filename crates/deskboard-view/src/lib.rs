//! View state for Deskboard.
//!
//! A [`ViewState`] ties one synced collection to one set of filter
//! criteria and keeps the filtered list and its grouping up to date:
//!
//! ```no_run
//! use std::sync::Arc;
//! use deskboard_filter::TaskDimension;
//! use deskboard_models::TaskStatus;
//! use deskboard_sync::MemoryBackend;
//! use deskboard_view::TaskView;
//!
//! # async fn example() -> deskboard_view::Result<()> {
//! let backend = Arc::new(MemoryBackend::new());
//! let mut board = TaskView::from_env(backend);
//! board.activate().await?;
//!
//! board.set_criterion(TaskDimension::Assignee, "unassigned")?;
//! for group in board.grouping().groups() {
//!     println!("{}: {}", group.category.label(), group.count());
//! }
//!
//! // Apply changes made elsewhere as they arrive
//! while let Some(result) = board.next_change().await {
//!     result?;
//!     println!("{} open", board.grouping().count(TaskStatus::Todo));
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod view;

pub use error::{Result, ViewError};
pub use view::{RoomView, TaskView, ViewState};
