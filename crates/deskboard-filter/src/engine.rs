//! Applying criteria to record slices.

use std::collections::BTreeSet;

use deskboard_models::Room;

use crate::criteria::Criteria;

/// Returns the records passing `criteria`, in their original order.
pub fn apply<C: Criteria>(records: &[C::Record], criteria: &C) -> Vec<C::Record> {
    if !criteria.has_active_filters() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|record| criteria.matches(record))
        .cloned()
        .collect()
}

/// Sorted, de-duplicated union of a multi-valued attribute.
pub fn distinct_values<R, F>(records: &[R], values: F) -> Vec<String>
where
    F: Fn(&R) -> &[String],
{
    records
        .iter()
        .flat_map(|record| values(record).iter())
        .map(String::as_str)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Equipment labels offered by the room equipment selector.
pub fn available_equipment(rooms: &[Room]) -> Vec<String> {
    distinct_values(rooms, |room| room.equipment.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::{RoomCriteria, RoomDimension, TaskCriteria, TaskDimension};
    use deskboard_models::{Task, TaskPriority, TaskStatus, UserId};
    use proptest::prelude::*;

    fn rooms() -> Vec<Room> {
        vec![
            Room::new("Nook", 5),
            Room::new("Atlas", 10).with_equipment(["TV", "Mic"]),
            Room::new("Hall", 25).with_equipment(["TV"]),
        ]
    }

    fn names(rooms: &[Room]) -> Vec<&str> {
        rooms.iter().map(|room| room.name.as_str()).collect()
    }

    #[test]
    fn test_inactive_criteria_is_identity() {
        let rooms = rooms();
        assert_eq!(apply(&rooms, &RoomCriteria::default()), rooms);
    }

    #[test]
    fn test_capacity_and_equipment_filters() {
        let rooms = rooms();

        let mut criteria = RoomCriteria::default();
        criteria.set(RoomDimension::Capacity, "6-10").unwrap();
        assert_eq!(names(&apply(&rooms, &criteria)), ["Atlas"]);

        criteria.clear();
        criteria.set(RoomDimension::Equipment, "TV").unwrap();
        assert_eq!(names(&apply(&rooms, &criteria)), ["Atlas", "Hall"]);

        criteria.set(RoomDimension::Equipment, "Mic").unwrap();
        assert_eq!(names(&apply(&rooms, &criteria)), ["Atlas"]);
    }

    #[test]
    fn test_no_match_yields_empty() {
        let mut criteria = RoomCriteria::default();
        criteria.set(RoomDimension::Query, "basement").unwrap();
        assert!(apply(&rooms(), &criteria).is_empty());
        assert!(apply::<RoomCriteria>(&[], &criteria).is_empty());
    }

    #[test]
    fn test_task_order_preserved() {
        let tasks: Vec<Task> = ["c", "a", "b"]
            .iter()
            .map(|title| {
                let mut task = Task::new(*title, "u-1");
                task.status = TaskStatus::Done;
                task
            })
            .collect();

        let mut criteria = TaskCriteria::default();
        criteria.set(TaskDimension::Status, "done").unwrap();
        let titles: Vec<_> = apply(&tasks, &criteria)
            .into_iter()
            .map(|task| task.title)
            .collect();

        assert_eq!(titles, ["c", "a", "b"]);
    }

    #[test]
    fn test_available_equipment_sorted_unique() {
        assert_eq!(available_equipment(&rooms()), ["Mic", "TV"]);
        assert!(available_equipment(&[Room::new("Bare", 2)]).is_empty());
    }

    fn arb_room() -> impl Strategy<Value = Room> {
        (
            "[a-c]{1,4}",
            1u32..40,
            proptest::sample::subsequence(vec!["TV", "Mic", "Projector"], 0..=3),
        )
            .prop_map(|(name, capacity, equipment)| {
                Room::new(name, capacity).with_equipment(equipment)
            })
    }

    fn arb_criteria() -> impl Strategy<Value = RoomCriteria> {
        (
            prop_oneof![Just(""), Just("a"), Just("bc")],
            prop_oneof![Just("all"), Just("1-5"), Just("6-10"), Just("11-20"), Just("20+")],
            prop_oneof![Just("all"), Just("TV"), Just("Mic"), Just("Projector")],
        )
            .prop_map(|(query, capacity, equipment)| {
                let mut criteria = RoomCriteria::default();
                criteria.set(RoomDimension::Query, query).unwrap();
                criteria.set(RoomDimension::Capacity, capacity).unwrap();
                criteria.set(RoomDimension::Equipment, equipment).unwrap();
                criteria
            })
    }

    fn arb_task() -> impl Strategy<Value = Task> {
        (
            "[a-c]{1,4}",
            proptest::sample::select(TaskStatus::ALL.to_vec()),
            proptest::sample::select(TaskPriority::ALL.to_vec()),
            proptest::option::of(prop_oneof![Just("u-alice"), Just("u-bob")]),
        )
            .prop_map(|(title, status, priority, assignee)| {
                let mut task = Task::new(title, "u-admin");
                task.status = status;
                task.priority = priority;
                task.assignee_id = assignee.map(UserId::from_string);
                task
            })
    }

    fn arb_task_criteria() -> impl Strategy<Value = TaskCriteria> {
        (
            prop_oneof![Just(""), Just("a"), Just("bc")],
            prop_oneof![Just("all"), Just("todo"), Just("in_progress"), Just("review"), Just("done")],
            prop_oneof![Just("all"), Just("low"), Just("medium"), Just("high"), Just("urgent")],
            prop_oneof![Just("all"), Just("unassigned"), Just("u-alice"), Just("u-bob")],
        )
            .prop_map(|(query, status, priority, assignee)| {
                let mut criteria = TaskCriteria::default();
                criteria.set(TaskDimension::Query, query).unwrap();
                criteria.set(TaskDimension::Status, status).unwrap();
                criteria.set(TaskDimension::Priority, priority).unwrap();
                criteria.set(TaskDimension::Assignee, assignee).unwrap();
                criteria
            })
    }

    proptest! {
        #[test]
        fn prop_task_filter_is_ordered_subset(
            tasks in proptest::collection::vec(arb_task(), 0..12),
            criteria in arb_task_criteria(),
        ) {
            let filtered = apply(&tasks, &criteria);
            let mut remaining = tasks.iter();
            for task in &filtered {
                prop_assert!(criteria.matches(task));
                prop_assert!(remaining.any(|candidate| candidate == task));
            }
            let expected = tasks.iter().filter(|task| criteria.matches(task)).count();
            prop_assert_eq!(filtered.len(), expected);
        }

        #[test]
        fn prop_unassigned_selects_exactly_null_assignees(
            tasks in proptest::collection::vec(arb_task(), 0..12),
        ) {
            let mut criteria = TaskCriteria::default();
            criteria.set(TaskDimension::Assignee, "unassigned").unwrap();

            let filtered = apply(&tasks, &criteria);
            prop_assert!(filtered.iter().all(Task::is_unassigned));
            prop_assert_eq!(
                filtered.len(),
                tasks.iter().filter(|task| task.is_unassigned()).count()
            );
        }

        #[test]
        fn prop_task_clear_restores_everything(
            tasks in proptest::collection::vec(arb_task(), 0..12),
            mut criteria in arb_task_criteria(),
        ) {
            criteria.clear();
            prop_assert!(!criteria.has_active_filters());
            prop_assert_eq!(apply(&tasks, &criteria), tasks);
        }

        #[test]
        fn prop_filtered_is_ordered_subset(
            rooms in proptest::collection::vec(arb_room(), 0..12),
            criteria in arb_criteria(),
        ) {
            let filtered = apply(&rooms, &criteria);
            let mut remaining = rooms.iter();
            for room in &filtered {
                prop_assert!(criteria.matches(room));
                prop_assert!(remaining.any(|candidate| candidate == room));
            }
            let expected = rooms.iter().filter(|room| criteria.matches(room)).count();
            prop_assert_eq!(filtered.len(), expected);
        }

        #[test]
        fn prop_clear_restores_everything(
            rooms in proptest::collection::vec(arb_room(), 0..12),
            mut criteria in arb_criteria(),
        ) {
            criteria.clear();
            prop_assert!(!criteria.has_active_filters());
            prop_assert_eq!(apply(&rooms, &criteria), rooms);
        }

        #[test]
        fn prop_distinct_values_sorted_unique(
            rooms in proptest::collection::vec(arb_room(), 0..12),
        ) {
            let labels = available_equipment(&rooms);
            prop_assert!(labels.windows(2).all(|pair| pair[0] < pair[1]));
            for room in &rooms {
                for label in &room.equipment {
                    prop_assert!(labels.contains(label));
                }
            }
        }
    }
}
