//! Storage layer for the airtree daemon.
//!
//! Provides DuckDB-based storage for airports and routes with:
//! - Schema management
//! - Transactional airport and route writes
//! - Indexed extremal and listing queries

mod routebase;
mod schema;

pub use routebase::{AccessMode, RouteBase, RouteStats};
pub use schema::SCHEMA_VERSION;
