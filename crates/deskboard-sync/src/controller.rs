//! DataSyncController - one collection's snapshot, kept fresh by
//! notification-driven full re-fetches.
//!
//! The controller is driven from a single task:
//! - `activate` subscribes, then fetches the initial snapshot
//! - each change notification lands in an unbounded channel
//! - `next_change` / `sync_pending` turn notifications into re-fetches
//! - `deactivate` (or drop) releases the subscription
//!
//! `refresh` only needs `&self`, so several fetches can be in flight at
//! once. Nothing cancels an older fetch; each completion installs its
//! result wholesale and the last one to complete wins.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use deskboard_models::{Record, ValidationError};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::client::{ChangeCallback, ChangeKind, CollectionClient, Mutation, SubscriptionHandle};
use crate::config::SyncConfig;
use crate::error::{Result, SyncError};
use crate::operation::Operation;

/// Read-only copy of a collection's active records.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<R> {
    records: Vec<R>,
    revision: u64,
    fetched_at: Option<DateTime<Utc>>,
}

impl<R> Snapshot<R> {
    /// The snapshot before any fetch completed.
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            revision: 0,
            fetched_at: None,
        }
    }

    /// Records in fetch order.
    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Number of installs so far; 0 means never fetched.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// When the installing fetch completed.
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Freshness of the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SyncStatus {
    /// Nothing fetched yet.
    Idle,
    /// The last fetch succeeded.
    Fresh,
    /// Fetching has failed since `since`; the snapshot shown is older.
    Stale {
        since: DateTime<Utc>,
        reason: String,
    },
}

impl SyncStatus {
    /// Returns true if the snapshot may be out of date.
    pub fn is_stale(&self) -> bool {
        matches!(self, SyncStatus::Stale { .. })
    }
}

struct Subscription {
    handle: SubscriptionHandle,
    changes: mpsc::UnboundedReceiver<ChangeKind>,
}

/// Owns the snapshot of one collection.
pub struct DataSyncController<R: Record> {
    client: Arc<dyn CollectionClient>,
    config: SyncConfig,
    snapshot: RwLock<Arc<Snapshot<R>>>,
    status: RwLock<SyncStatus>,
    subscription: Option<Subscription>,
}

impl<R: Record> DataSyncController<R> {
    /// Creates an inactive controller with an empty snapshot.
    pub fn new(client: Arc<dyn CollectionClient>, config: SyncConfig) -> Self {
        Self {
            client,
            config,
            snapshot: RwLock::new(Arc::new(Snapshot::empty())),
            status: RwLock::new(SyncStatus::Idle),
            subscription: None,
        }
    }

    /// Subscribes to change notifications, then fetches the initial snapshot.
    ///
    /// If the initial fetch fails the subscription is released again and
    /// the controller stays inactive.
    pub async fn activate(&mut self) -> Result<Arc<Snapshot<R>>> {
        if self.subscription.is_some() {
            return Err(SyncError::AlreadyActive);
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let on_change: ChangeCallback = Arc::new(move |kind| {
            // A closed receiver means the controller is gone; nothing to do.
            let _ = tx.send(kind);
        });

        let handle = self
            .client
            .subscribe(&self.config.collection, on_change)
            .map_err(|source| SyncError::Subscribe {
                collection: self.config.collection.clone(),
                source,
            })?;
        self.subscription = Some(Subscription {
            handle,
            changes: rx,
        });

        info!(
            collection = %self.config.collection,
            subscription = %handle,
            "activating collection sync"
        );

        match self.refresh().await {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => {
                self.deactivate();
                Err(e)
            }
        }
    }

    /// Releases the subscription. Safe to call more than once.
    ///
    /// The snapshot is kept.
    pub fn deactivate(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            self.client.unsubscribe(subscription.handle);
            info!(
                collection = %self.config.collection,
                subscription = %subscription.handle,
                "collection sync deactivated"
            );
        }
    }

    /// Returns true while subscribed.
    pub fn is_active(&self) -> bool {
        self.subscription.is_some()
    }

    /// Fetches the whole collection and replaces the snapshot.
    ///
    /// On failure the previous snapshot stays installed, the status turns
    /// [`SyncStatus::Stale`], and the error is returned.
    pub async fn refresh(&self) -> Result<Arc<Snapshot<R>>> {
        let collection = &self.config.collection;
        debug!(collection = %collection, "fetching collection");

        let rows = match self
            .client
            .fetch_active(collection, &self.config.order_by)
            .await
        {
            Ok(rows) => rows,
            Err(source) => {
                return Err(self.mark_stale(SyncError::Fetch {
                    collection: collection.clone(),
                    source,
                }))
            }
        };

        let records = match decode_rows::<R>(rows) {
            Ok(records) => records,
            Err(source) => {
                return Err(self.mark_stale(SyncError::Decode {
                    collection: collection.clone(),
                    source,
                }))
            }
        };

        self.install(records)
    }

    /// Waits for the next change notification.
    ///
    /// Returns `None` when inactive or when the store dropped the
    /// subscription.
    pub async fn next_change(&mut self) -> Option<ChangeKind> {
        let subscription = self.subscription.as_mut()?;
        let kind = subscription.changes.recv().await;
        if let Some(kind) = kind {
            debug!(collection = %self.config.collection, ?kind, "change notification received");
        }
        kind
    }

    /// Removes and returns every notification queued so far.
    pub fn drain_changes(&mut self) -> Vec<ChangeKind> {
        let mut drained = Vec::new();
        if let Some(subscription) = self.subscription.as_mut() {
            while let Ok(kind) = subscription.changes.try_recv() {
                drained.push(kind);
            }
        }
        drained
    }

    /// Re-fetches once if any notifications are queued.
    ///
    /// Returns how many notifications were consumed. A single full
    /// re-fetch covers all of them.
    pub async fn sync_pending(&mut self) -> Result<usize> {
        let pending = self.drain_changes();
        if pending.is_empty() {
            return Ok(0);
        }

        debug!(
            collection = %self.config.collection,
            notifications = pending.len(),
            "resyncing after change notifications"
        );
        self.refresh().await?;
        Ok(pending.len())
    }

    /// Re-fetches in response to one notification.
    pub async fn handle_change(&self, kind: ChangeKind) -> Result<Arc<Snapshot<R>>> {
        debug!(collection = %self.config.collection, ?kind, "handling change");
        self.refresh().await
    }

    /// Validates and submits an operation to the store.
    ///
    /// The snapshot is not touched; the store's change notification
    /// drives the resync.
    pub async fn submit(&self, operation: Operation<R>) -> Result<()> {
        let mutation = operation.into_mutation()?;
        self.submit_mutation(mutation).await
    }

    /// Submits a raw mutation to the store.
    pub async fn submit_mutation(&self, mutation: Mutation) -> Result<()> {
        let collection = &self.config.collection;
        let kind = mutation.kind();

        match self.client.mutate(collection, mutation).await {
            Ok(()) => {
                debug!(collection = %collection, ?kind, "mutation accepted");
                Ok(())
            }
            Err(source) => {
                warn!(collection = %collection, ?kind, error = %source, "mutation rejected");
                Err(SyncError::Mutation {
                    collection: collection.clone(),
                    source,
                })
            }
        }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot<R>> {
        match self.snapshot.read() {
            Ok(slot) => Arc::clone(&slot),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Freshness of the current snapshot.
    pub fn status(&self) -> SyncStatus {
        match self.status.read() {
            Ok(status) => status.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    fn install(&self, records: Vec<R>) -> Result<Arc<Snapshot<R>>> {
        let next = {
            let mut slot = self
                .snapshot
                .write()
                .map_err(|e| SyncError::LockPoisoned(e.to_string()))?;
            let next = Arc::new(Snapshot {
                records,
                revision: slot.revision + 1,
                fetched_at: Some(Utc::now()),
            });
            *slot = Arc::clone(&next);
            next
        };

        self.set_status(SyncStatus::Fresh);
        info!(
            collection = %self.config.collection,
            records = next.len(),
            revision = next.revision,
            "snapshot installed"
        );
        Ok(next)
    }

    fn mark_stale(&self, error: SyncError) -> SyncError {
        warn!(
            collection = %self.config.collection,
            error = %error,
            revision = self.snapshot().revision(),
            "fetch failed, keeping previous snapshot"
        );

        let since = match self.status() {
            SyncStatus::Stale { since, .. } => since,
            _ => Utc::now(),
        };
        self.set_status(SyncStatus::Stale {
            since,
            reason: error.to_string(),
        });
        error
    }

    fn set_status(&self, status: SyncStatus) {
        match self.status.write() {
            Ok(mut slot) => *slot = status,
            Err(poisoned) => *poisoned.into_inner() = status,
        }
    }
}

impl<R: Record> Drop for DataSyncController<R> {
    fn drop(&mut self) {
        self.deactivate();
    }
}

/// Decodes every row or none. Inactive records are dropped.
fn decode_rows<R: Record>(
    rows: Vec<serde_json::Value>,
) -> std::result::Result<Vec<R>, ValidationError> {
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let record = R::from_row(row)?;
        if !record.is_active() {
            trace!(id = record.id(), "dropping inactive record");
            continue;
        }
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CollectionError;
    use crate::memory::MemoryBackend;
    use async_trait::async_trait;
    use deskboard_models::{NewRoom, OrderBy, Room, RoomPatch, Task};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    fn room_row(id: &str, name: &str, capacity: u32) -> Value {
        json!({ "id": id, "name": name, "capacity": capacity, "equipment": [], "is_active": true })
    }

    fn backend_with_rooms() -> Arc<MemoryBackend> {
        let backend = Arc::new(MemoryBackend::new());
        backend.seed(
            "meeting_rooms",
            vec![room_row("r-1", "Vega", 4), room_row("r-2", "Atlas", 12)],
        );
        backend
    }

    fn rooms(backend: &Arc<MemoryBackend>) -> DataSyncController<Room> {
        DataSyncController::new(backend.clone(), SyncConfig::for_record::<Room>())
    }

    fn names(snapshot: &Snapshot<Room>) -> Vec<&str> {
        snapshot.records().iter().map(|r| r.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_activate_fetches_and_subscribes() {
        let backend = backend_with_rooms();
        let mut controller = rooms(&backend);
        assert_eq!(controller.status(), SyncStatus::Idle);

        let snapshot = controller.activate().await.unwrap();

        assert_eq!(names(&snapshot), vec!["Atlas", "Vega"]);
        assert_eq!(snapshot.revision(), 1);
        assert!(snapshot.fetched_at().is_some());
        assert_eq!(controller.status(), SyncStatus::Fresh);
        assert!(controller.is_active());
        assert_eq!(backend.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn test_activate_twice_fails() {
        let backend = backend_with_rooms();
        let mut controller = rooms(&backend);
        controller.activate().await.unwrap();

        assert!(matches!(
            controller.activate().await,
            Err(SyncError::AlreadyActive)
        ));
        assert_eq!(backend.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_activation_releases_subscription() {
        let backend = backend_with_rooms();
        backend.set_fetch_failure(true);
        let mut controller = rooms(&backend);

        let err = controller.activate().await.unwrap_err();

        assert!(err.is_fetch_failure());
        assert!(!controller.is_active());
        assert_eq!(backend.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_change_notification_triggers_full_refetch() {
        let backend = backend_with_rooms();
        let mut controller = rooms(&backend);
        controller.activate().await.unwrap();

        backend
            .mutate(
                "meeting_rooms",
                Mutation::Insert {
                    payload: json!({ "name": "Boreal", "capacity": 6, "is_active": true }),
                },
            )
            .await
            .unwrap();

        assert_eq!(controller.sync_pending().await.unwrap(), 1);
        let snapshot = controller.snapshot();
        assert_eq!(names(&snapshot), vec!["Atlas", "Boreal", "Vega"]);
        assert_eq!(snapshot.revision(), 2);
        assert_eq!(backend.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_queued_notifications_share_one_refetch() {
        let backend = backend_with_rooms();
        let mut controller = rooms(&backend);
        controller.activate().await.unwrap();

        backend.notify("meeting_rooms", ChangeKind::Update);
        backend.notify("meeting_rooms", ChangeKind::Delete);

        assert_eq!(controller.sync_pending().await.unwrap(), 2);
        assert_eq!(controller.sync_pending().await.unwrap(), 0);
        assert_eq!(backend.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_next_change_reports_kind() {
        let backend = backend_with_rooms();
        let mut controller = rooms(&backend);
        controller.activate().await.unwrap();

        backend
            .mutate(
                "meeting_rooms",
                Mutation::Update {
                    id: "r-1".into(),
                    changes: json!({ "capacity": 5 }),
                },
            )
            .await
            .unwrap();

        let kind = controller.next_change().await.unwrap();
        assert_eq!(kind, ChangeKind::Update);

        let snapshot = controller.handle_change(kind).await.unwrap();
        let vega = snapshot.records().iter().find(|r| r.name == "Vega").unwrap();
        assert_eq!(vega.capacity, 5);
    }

    #[tokio::test]
    async fn test_next_change_inactive_is_none() {
        let backend = backend_with_rooms();
        let mut controller = rooms(&backend);
        assert_eq!(controller.next_change().await, None);
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_snapshot_and_marks_stale() {
        let backend = backend_with_rooms();
        let mut controller = rooms(&backend);
        controller.activate().await.unwrap();

        backend.set_fetch_failure(true);
        backend.notify("meeting_rooms", ChangeKind::Insert);
        let err = controller.sync_pending().await.unwrap_err();

        assert!(matches!(err, SyncError::Fetch { .. }));
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.revision(), 1);
        assert!(controller.status().is_stale());

        backend.set_fetch_failure(false);
        controller.refresh().await.unwrap();
        assert_eq!(controller.status(), SyncStatus::Fresh);
        assert_eq!(controller.snapshot().revision(), 2);
    }

    #[tokio::test]
    async fn test_stale_since_survives_repeated_failures() {
        let backend = backend_with_rooms();
        let controller = rooms(&backend);
        backend.set_fetch_failure(true);

        assert!(controller.refresh().await.is_err());
        let first = match controller.status() {
            SyncStatus::Stale { since, .. } => since,
            other => panic!("expected stale, got {:?}", other),
        };
        assert!(controller.refresh().await.is_err());

        match controller.status() {
            SyncStatus::Stale { since, reason } => {
                assert_eq!(since, first);
                assert!(reason.contains("meeting_rooms"));
            }
            other => panic!("expected stale, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_row_fails_whole_fetch() {
        let backend = Arc::new(MemoryBackend::new());
        backend.seed(
            "tasks",
            vec![json!({
                "id": "t-1",
                "title": "Valid",
                "status": "todo",
                "priority": "low",
                "creator_id": "u-1",
                "created_at": "2026-10-01T00:00:00Z"
            })],
        );
        let mut controller: DataSyncController<Task> =
            DataSyncController::new(backend.clone(), SyncConfig::for_record::<Task>());
        controller.activate().await.unwrap();

        backend.seed(
            "tasks",
            vec![json!({
                "id": "t-2",
                "title": "Broken",
                "status": "archived",
                "priority": "low",
                "creator_id": "u-1",
                "created_at": "2026-10-02T00:00:00Z"
            })],
        );
        let err = controller.refresh().await.unwrap_err();

        assert!(matches!(err, SyncError::Decode { .. }));
        assert!(err.is_fetch_failure());
        assert_eq!(controller.snapshot().len(), 1);
    }

    #[test]
    fn test_decode_drops_inactive_rows() {
        let mut retired = room_row("r-9", "Retired", 3);
        retired["is_active"] = json!(false);

        let records = decode_rows::<Room>(vec![room_row("r-1", "Vega", 4), retired]).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Vega");
    }

    #[tokio::test]
    async fn test_deactivate_releases_subscription() {
        let backend = backend_with_rooms();
        let mut controller = rooms(&backend);
        controller.activate().await.unwrap();

        controller.deactivate();
        controller.deactivate();

        assert!(!controller.is_active());
        assert_eq!(backend.subscriber_count(), 0);
        assert_eq!(controller.snapshot().len(), 2);
    }

    #[tokio::test]
    async fn test_drop_releases_subscription() {
        let backend = backend_with_rooms();
        {
            let mut controller = rooms(&backend);
            controller.activate().await.unwrap();
            assert_eq!(backend.subscriber_count(), 1);
        }
        assert_eq!(backend.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_submit_does_not_patch_snapshot() {
        let backend = backend_with_rooms();
        let mut controller = rooms(&backend);
        controller.activate().await.unwrap();

        controller
            .submit(Operation::Create(NewRoom::new("Nova", 8)))
            .await
            .unwrap();

        assert_eq!(controller.snapshot().len(), 2);
        assert_eq!(controller.sync_pending().await.unwrap(), 1);
        assert_eq!(controller.snapshot().len(), 3);
    }

    #[tokio::test]
    async fn test_deactivated_room_leaves_snapshot() {
        let backend = backend_with_rooms();
        let mut controller = rooms(&backend);
        controller.activate().await.unwrap();

        controller
            .submit(Operation::update("r-1", RoomPatch::deactivate()))
            .await
            .unwrap();
        controller.sync_pending().await.unwrap();

        assert_eq!(names(&controller.snapshot()), vec!["Atlas"]);
    }

    #[tokio::test]
    async fn test_rejected_mutation_reported() {
        let backend = backend_with_rooms();
        let mut controller = rooms(&backend);
        controller.activate().await.unwrap();
        backend.set_mutation_failure(true);

        let err = controller
            .submit(Operation::delete("r-1"))
            .await
            .unwrap_err();

        assert!(matches!(err, SyncError::Mutation { .. }));
        assert!(controller.drain_changes().is_empty());
    }

    #[tokio::test]
    async fn test_validation_failure_never_reaches_store() {
        let backend = backend_with_rooms();
        let controller = rooms(&backend);

        let err = controller
            .submit(Operation::Create(NewRoom::new("", 8)))
            .await
            .unwrap_err();

        assert!(matches!(err, SyncError::Validation(_)));
        assert_eq!(backend.rows("meeting_rooms").len(), 2);
    }

    /// Holds the first fetch until the second one has completed.
    struct GatedClient {
        calls: AtomicUsize,
        gate: Notify,
    }

    #[async_trait]
    impl CollectionClient for GatedClient {
        async fn fetch_active(
            &self,
            _collection: &str,
            _order_by: &OrderBy,
        ) -> std::result::Result<Vec<Value>, CollectionError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                self.gate.notified().await;
                Ok(vec![room_row("r-1", "Slow", 4)])
            } else {
                Ok(vec![room_row("r-2", "Fast", 4)])
            }
        }

        async fn mutate(
            &self,
            _collection: &str,
            _mutation: Mutation,
        ) -> std::result::Result<(), CollectionError> {
            Ok(())
        }

        fn subscribe(
            &self,
            _collection: &str,
            _on_change: ChangeCallback,
        ) -> std::result::Result<SubscriptionHandle, CollectionError> {
            Ok(SubscriptionHandle::new(1))
        }

        fn unsubscribe(&self, _handle: SubscriptionHandle) {}
    }

    #[tokio::test]
    async fn test_last_completed_fetch_wins() {
        let client = Arc::new(GatedClient {
            calls: AtomicUsize::new(0),
            gate: Notify::new(),
        });
        let controller: DataSyncController<Room> =
            DataSyncController::new(client.clone(), SyncConfig::for_record::<Room>());

        let (slow, fast) = tokio::join!(controller.refresh(), async {
            let result = controller.refresh().await;
            client.gate.notify_one();
            result
        });

        assert_eq!(fast.unwrap().revision(), 1);
        assert_eq!(slow.unwrap().revision(), 2);
        let snapshot = controller.snapshot();
        assert_eq!(names(&snapshot), vec!["Slow"]);
    }
}
