//! Shared fixtures for view integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use deskboard_sync::MemoryBackend;
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

/// Installs a test-writer subscriber once. `RUST_LOG` controls verbosity.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_test_writer()
        .try_init();
}

pub fn room(id: &str, name: &str, capacity: u32, equipment: &[&str]) -> Value {
    json!({
        "id": id,
        "name": name,
        "location": "HQ",
        "capacity": capacity,
        "equipment": equipment,
        "is_active": true,
    })
}

pub fn task(id: &str, title: &str, status: &str, assignee: Option<&str>) -> Value {
    json!({
        "id": id,
        "title": title,
        "status": status,
        "priority": "high",
        "assignee_id": assignee,
        "creator_id": "u-admin",
        "created_at": "2026-03-01T12:00:00Z",
    })
}

pub fn backend() -> Arc<MemoryBackend> {
    init_tracing();
    Arc::new(MemoryBackend::new())
}
