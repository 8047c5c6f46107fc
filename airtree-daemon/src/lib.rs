//! airtree daemon library - persistent storage and HTTP API.
//!
//! This library provides:
//! - Storage layer (DuckDB-based airport and route database)
//! - HTTP router over any [`airtree_core::RouteStore`]
//! - Configuration loading from `.airtree.toml`

pub mod config;
pub mod server;
pub mod storage;
