//! Filtering and grouping for Deskboard views.
//!
//! Everything here is synchronous and pure:
//! - [`Criteria`] - a per-view set of filter dimensions, each either
//!   disabled (`"all"`, or an empty query) or set to one value
//! - [`apply`] - keeps the records passing every enabled dimension
//! - [`distinct_values`] - option lists for multi-valued attributes
//! - [`GroupingProjector`] - stable partition into fixed, ordered categories
//! - [`TaskSummary`] - completion counts for dashboard cards
//!
//! # Example
//!
//! ```
//! use deskboard_filter::{apply, Criteria, RoomCriteria, RoomDimension};
//! use deskboard_models::Room;
//!
//! let rooms = vec![
//!     Room::new("Nook", 5),
//!     Room::new("Atlas", 10).with_equipment(["TV"]),
//!     Room::new("Hall", 25).with_equipment(["TV"]),
//! ];
//!
//! let mut criteria = RoomCriteria::default();
//! criteria.set(RoomDimension::Capacity, "6-10").unwrap();
//! criteria.set(RoomDimension::Equipment, "TV").unwrap();
//!
//! let matching = apply(&rooms, &criteria);
//! assert_eq!(matching.len(), 1);
//! assert_eq!(matching[0].name, "Atlas");
//! ```

pub mod criteria;
pub mod engine;
pub mod error;
pub mod grouping;
pub mod predicate;
pub mod selection;
pub mod summary;

pub use criteria::{Criteria, RoomCriteria, RoomDimension, TaskCriteria, TaskDimension};
pub use engine::{apply, available_equipment, distinct_values};
pub use error::{CriteriaError, Result};
pub use grouping::{Group, Grouping, GroupingProjector};
pub use selection::{AssigneeSelection, Selection, ALL, UNASSIGNED};
pub use summary::TaskSummary;
