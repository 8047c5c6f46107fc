//! Shared application state for the server.

use airtree_core::RouteStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Airport and route storage
    pub store: Arc<dyn RouteStore>,
    /// Human-readable storage location for status reporting
    pub storage_label: String,
    /// Schema version of the backing database, when it has one
    pub schema_version: Option<String>,
    /// Server start time for uptime calculation
    pub start_time: Instant,
    /// Wall-clock start time
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Create state around a store.
    pub fn new(store: Arc<dyn RouteStore>, storage_label: impl Into<String>) -> Self {
        Self {
            store,
            storage_label: storage_label.into(),
            schema_version: None,
            start_time: Instant::now(),
            started_at: Utc::now(),
        }
    }

    /// Record the backing schema version.
    pub fn with_schema_version(mut self, version: Option<String>) -> Self {
        self.schema_version = version;
        self
    }

    /// Get server uptime in seconds.
    pub fn uptime_seconds(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }
}
