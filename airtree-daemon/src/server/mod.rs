//! HTTP server for the airtree daemon.
//!
//! Provides REST API for:
//! - Status and health checks
//! - Airport and route creation, listing, and deletion
//! - Traversal and longest/shortest route queries

mod http;
pub mod state;

pub use http::create_router;
pub use state::AppState;
