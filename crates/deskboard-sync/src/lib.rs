//! Collection synchronization for Deskboard.
//!
//! This crate keeps an in-memory snapshot of one remote collection fresh
//! while other users change it:
//! - [`CollectionClient`] - the contract of the external store (fetch,
//!   mutate, subscribe to change notifications)
//! - [`DataSyncController`] - owns a snapshot and re-fetches the whole
//!   collection on every change notification
//! - [`MemoryBackend`] - an in-process `CollectionClient` for tests and demos
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use deskboard_models::Room;
//! use deskboard_sync::{DataSyncController, MemoryBackend, SyncConfig};
//!
//! # async fn example() -> deskboard_sync::Result<()> {
//! let backend = Arc::new(MemoryBackend::new());
//! let mut rooms = DataSyncController::<Room>::new(backend, SyncConfig::for_record::<Room>());
//!
//! // Initial fetch + subscription
//! rooms.activate().await?;
//!
//! // Somebody else changed the collection: re-fetch everything
//! while let Some(kind) = rooms.next_change().await {
//!     println!("{:?}: {} rooms", kind, rooms.snapshot().len());
//!     rooms.sync_pending().await?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Resync Policy
//!
//! Notifications carry no payload the controller relies on. Any insert,
//! update or delete triggers a full re-fetch that replaces the snapshot
//! wholesale. Overlapping fetches are not cancelled; whichever completes
//! last is installed last.

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod memory;
pub mod operation;

pub use client::{ChangeCallback, ChangeKind, CollectionClient, Mutation, SubscriptionHandle};
pub use config::SyncConfig;
pub use controller::{DataSyncController, Snapshot, SyncStatus};
pub use error::{CollectionError, Result, SyncError};
pub use memory::MemoryBackend;
pub use operation::Operation;
