//! ViewState - one view's criteria, snapshot and derived output.
//!
//! Every operation that can change the snapshot or the criteria ends by
//! recomputing the filtered list and its grouping in full, so readers
//! never see derived output from an older state.

use std::sync::Arc;

use deskboard_filter::{
    apply, distinct_values, Criteria, Grouping, GroupingProjector, RoomCriteria, TaskCriteria,
    TaskSummary,
};
use deskboard_models::{Categorized, UserId};
use deskboard_sync::{
    CollectionClient, DataSyncController, Operation, Snapshot, SyncConfig, SyncStatus,
};
use tracing::{debug, trace, warn};

use crate::error::Result;

type Category<C> = <<C as Criteria>::Record as Categorized>::Category;

/// View over tasks, grouped into status columns.
pub type TaskView = ViewState<TaskCriteria>;

/// View over meeting rooms, grouped by capacity bucket.
pub type RoomView = ViewState<RoomCriteria>;

/// Owned state of one filtered, grouped view of a collection.
pub struct ViewState<C>
where
    C: Criteria,
    C::Record: Categorized,
{
    sync: DataSyncController<C::Record>,
    criteria: C,
    projector: GroupingProjector<Category<C>>,
    filtered: Vec<C::Record>,
    grouping: Grouping<Category<C>, C::Record>,
    /// Snapshot revision the derived output was computed from.
    revision: u64,
}

impl<C> ViewState<C>
where
    C: Criteria,
    C::Record: Categorized,
{
    /// Creates an inactive view with no filters and the record type's
    /// canonical category order.
    pub fn new(client: Arc<dyn CollectionClient>, config: SyncConfig) -> Self {
        let projector = GroupingProjector::for_record::<C::Record>();
        let grouping = projector.project_records::<C::Record>(&[]);
        Self {
            sync: DataSyncController::new(client, config),
            criteria: C::default(),
            projector,
            filtered: Vec::new(),
            grouping,
            revision: 0,
        }
    }

    /// Like [`new`](Self::new) with [`SyncConfig::from_env`].
    pub fn from_env(client: Arc<dyn CollectionClient>) -> Self {
        Self::new(client, SyncConfig::from_env::<C::Record>())
    }

    /// Replaces the category order used for grouping.
    pub fn with_group_order(mut self, order: impl IntoIterator<Item = Category<C>>) -> Self {
        self.projector = GroupingProjector::new(order);
        self.recompute();
        self
    }

    /// Subscribes to the collection and loads the initial snapshot.
    pub async fn activate(&mut self) -> Result<()> {
        let result = self.sync.activate().await;
        self.recompute();
        result?;
        Ok(())
    }

    /// Releases the subscription. The last snapshot stays visible.
    pub fn deactivate(&mut self) {
        self.sync.deactivate();
    }

    pub fn is_active(&self) -> bool {
        self.sync.is_active()
    }

    /// Sets one dimension and recomputes the derived output.
    ///
    /// An invalid value leaves the criteria untouched.
    pub fn set_criterion(&mut self, dimension: C::Dimension, value: &str) -> Result<()> {
        let mut next = self.criteria.clone();
        next.set(dimension, value)?;
        debug!(%dimension, value, "criterion set");
        self.criteria = next;
        self.recompute();
        Ok(())
    }

    /// Like [`set_criterion`](Self::set_criterion), with the dimension
    /// given by name.
    pub fn set_criterion_named(&mut self, dimension: &str, value: &str) -> Result<()> {
        let dimension = dimension.parse::<C::Dimension>()?;
        self.set_criterion(dimension, value)
    }

    /// Disables every dimension and recomputes.
    pub fn clear_filters(&mut self) {
        debug!("filters cleared");
        self.criteria.clear();
        self.recompute();
    }

    /// Sends an operation to the store.
    ///
    /// Local state is left alone. The change notification the store sends
    /// back is what brings the mutation into the view, via
    /// [`process_changes`](Self::process_changes) or
    /// [`next_change`](Self::next_change).
    pub async fn mutate(&self, operation: Operation<C::Record>) -> Result<()> {
        self.sync.submit(operation).await?;
        Ok(())
    }

    /// Re-fetches the collection now.
    ///
    /// On failure the previous snapshot and derived output stay, and
    /// [`status`](Self::status) reports the view as stale.
    pub async fn resync(&mut self) -> Result<()> {
        let result = self.sync.refresh().await;
        self.recompute();
        result?;
        Ok(())
    }

    /// Resyncs once if change notifications are queued.
    ///
    /// Returns the number of notifications consumed.
    pub async fn process_changes(&mut self) -> Result<usize> {
        let result = self.sync.sync_pending().await;
        self.recompute();
        Ok(result?)
    }

    /// Waits for a change notification, then resyncs.
    ///
    /// Notifications already queued behind the first are folded into the
    /// same re-fetch. Returns `None` once the view is inactive or the
    /// store has dropped the subscription.
    pub async fn next_change(&mut self) -> Option<Result<usize>> {
        let first = self.sync.next_change().await?;
        let consumed = 1 + self.sync.drain_changes().len();
        trace!(kind = ?first, consumed, "resyncing view");
        Some(self.resync().await.map(|()| consumed))
    }

    /// Records passing the current criteria, in snapshot order.
    pub fn filtered(&self) -> &[C::Record] {
        &self.filtered
    }

    /// The filtered records partitioned by category.
    pub fn grouping(&self) -> &Grouping<Category<C>, C::Record> {
        &self.grouping
    }

    pub fn criteria(&self) -> &C {
        &self.criteria
    }

    /// Current value of one dimension.
    pub fn criterion(&self, dimension: C::Dimension) -> String {
        self.criteria.value(dimension)
    }

    pub fn has_active_filters(&self) -> bool {
        self.criteria.has_active_filters()
    }

    /// The full, unfiltered snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot<C::Record>> {
        self.sync.snapshot()
    }

    /// Snapshot revision the derived output reflects.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn status(&self) -> SyncStatus {
        self.sync.status()
    }

    /// Sorted, de-duplicated values of a multi-valued attribute across the
    /// whole snapshot, filters ignored.
    pub fn distinct_values<F>(&self, values: F) -> Vec<String>
    where
        F: Fn(&C::Record) -> &[String],
    {
        distinct_values(self.sync.snapshot().records(), values)
    }

    fn recompute(&mut self) {
        let snapshot = self.sync.snapshot();
        self.filtered = apply(snapshot.records(), &self.criteria);
        self.grouping = self.projector.project_records(&self.filtered);
        self.revision = snapshot.revision();

        if !self.grouping.unplaced().is_empty() {
            warn!(
                unplaced = self.grouping.unplaced().len(),
                "records outside the group order"
            );
        }
        trace!(
            revision = self.revision,
            total = snapshot.len(),
            filtered = self.filtered.len(),
            "derived output recomputed"
        );
    }
}

impl ViewState<TaskCriteria> {
    /// Completion counts over every task in the snapshot.
    pub fn summary(&self) -> TaskSummary {
        TaskSummary::from_tasks(self.sync.snapshot().records())
    }

    /// Completion counts over the tasks assigned to `user`.
    pub fn summary_for(&self, user: &UserId) -> TaskSummary {
        TaskSummary::for_assignee(self.sync.snapshot().records(), user)
    }

    /// Completion counts over the filtered tasks.
    pub fn filtered_summary(&self) -> TaskSummary {
        TaskSummary::from_tasks(&self.filtered)
    }
}

impl ViewState<RoomCriteria> {
    /// Equipment labels across every active room.
    pub fn available_equipment(&self) -> Vec<String> {
        self.distinct_values(|room| room.equipment.as_slice())
    }
}

impl<C> std::fmt::Debug for ViewState<C>
where
    C: Criteria,
    C::Record: Categorized,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewState")
            .field("collection", &self.sync.config().collection)
            .field("criteria", &self.criteria)
            .field("revision", &self.revision)
            .field("filtered", &self.filtered.len())
            .finish()
    }
}
