//! Partitioning records into ordered categories.
//!
//! A projector owns the category order. Projecting yields one group per
//! category in that order, empty groups included, so column layouts stay
//! fixed while records move between them.

use std::fmt::Debug;

use deskboard_models::Categorized;
use serde::Serialize;

/// Records in one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group<K, T> {
    pub category: K,
    pub items: Vec<T>,
}

impl<K, T> Group<K, T> {
    pub fn count(&self) -> usize {
        self.items.len()
    }
}

/// Result of a projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grouping<K, T> {
    groups: Vec<Group<K, T>>,
    /// Items whose category is outside the projector's order.
    unplaced: Vec<T>,
}

impl<K: Copy + Eq, T> Grouping<K, T> {
    /// Groups in category order.
    pub fn groups(&self) -> &[Group<K, T>] {
        &self.groups
    }

    pub fn get(&self, category: K) -> Option<&Group<K, T>> {
        self.groups.iter().find(|group| group.category == category)
    }

    /// Items of one category; empty if the category is not projected.
    pub fn items(&self, category: K) -> &[T] {
        self.get(category)
            .map(|group| group.items.as_slice())
            .unwrap_or(&[])
    }

    pub fn count(&self, category: K) -> usize {
        self.items(category).len()
    }

    /// Per-group counts in category order.
    pub fn counts(&self) -> Vec<(K, usize)> {
        self.groups
            .iter()
            .map(|group| (group.category, group.count()))
            .collect()
    }

    pub fn unplaced(&self) -> &[T] {
        &self.unplaced
    }

    /// Items across all groups plus unplaced ones.
    pub fn total(&self) -> usize {
        self.groups.iter().map(Group::count).sum::<usize>() + self.unplaced.len()
    }
}

/// Stable partition of records by a fixed category order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupingProjector<K> {
    order: Vec<K>,
}

impl<K: Copy + Eq + Debug> GroupingProjector<K> {
    /// Creates a projector; repeated categories keep their first position.
    pub fn new(order: impl IntoIterator<Item = K>) -> Self {
        let mut deduped: Vec<K> = Vec::new();
        for category in order {
            if !deduped.contains(&category) {
                deduped.push(category);
            }
        }
        Self { order: deduped }
    }

    /// Projector using a record type's canonical category order.
    pub fn for_record<R>() -> Self
    where
        R: Categorized<Category = K>,
    {
        Self::new(R::category_order())
    }

    pub fn order(&self) -> &[K] {
        &self.order
    }

    /// Partitions `items` by `category_of`, keeping input order inside
    /// each group.
    pub fn project<T, F>(&self, items: &[T], category_of: F) -> Grouping<K, T>
    where
        T: Clone,
        F: Fn(&T) -> K,
    {
        let mut groups: Vec<Group<K, T>> = self
            .order
            .iter()
            .map(|&category| Group {
                category,
                items: Vec::new(),
            })
            .collect();
        let mut unplaced = Vec::new();

        for item in items {
            let category = category_of(item);
            match groups.iter_mut().find(|group| group.category == category) {
                Some(group) => group.items.push(item.clone()),
                None => unplaced.push(item.clone()),
            }
        }

        Grouping { groups, unplaced }
    }

    /// Partitions records by their own category.
    pub fn project_records<R>(&self, records: &[R]) -> Grouping<K, R>
    where
        R: Categorized<Category = K> + Clone,
    {
        self.project(records, R::category)
    }
}
