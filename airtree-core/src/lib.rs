//! airtree core - airports, directed Left/Right routes, and the queries over them.
//!
//! This crate provides:
//! - Data model ([`Airport`], [`Route`], [`Direction`])
//! - Error taxonomy ([`AirtreeError`])
//! - The [`RouteStore`] abstraction and an in-memory implementation
//! - Traversal and extremal-duration queries
//!
//! # Usage
//!
//! ```
//! use airtree_core::{query, Direction, MemoryStore, NewRoute, RouteStore};
//!
//! let store = MemoryStore::new();
//! let jfk = store.create_airport("JFK").unwrap();
//! let lax = store.create_airport("LAX").unwrap();
//! store
//!     .create_route(&NewRoute::new(jfk.id, lax.id, Direction::Left, 330))
//!     .unwrap();
//!
//! let walk = query::traverse(&store, jfk.id, Direction::Left).unwrap();
//! assert_eq!(walk.final_airport.name, "LAX");
//! ```

pub mod error;
pub mod memory;
pub mod query;
pub mod store;
pub mod types;

pub use error::{AirtreeError, ErrorKind, Result};
pub use memory::MemoryStore;
pub use store::RouteStore;
pub use types::{
    Airport, AirportId, Direction, Extremum, NewRoute, Route, RouteDetail, RouteId, Traversal,
};
