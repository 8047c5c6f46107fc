//! CLI command implementations.

pub mod airport;
pub mod completions;
pub mod query;
pub mod route;
pub mod status;

use airtree_core::{AirportId, Direction};
use anyhow::{bail, Result};

use crate::client::DaemonClient;

/// Resolve a command-line airport reference.
///
/// An exact name match wins; otherwise a numeric key is taken as an id.
pub async fn resolve_airport(client: &DaemonClient, key: &str) -> Result<AirportId> {
    let key = key.trim();
    let matches = client.list_airports(Some(key)).await?;
    if let Some(airport) = matches.into_iter().find(|a| a.name == key) {
        return Ok(airport.id);
    }

    match key.parse::<AirportId>() {
        Ok(id) => Ok(id),
        Err(_) => bail!("No airport named '{}'", key),
    }
}

/// Map command-line direction spellings (`L`, `r`, `left`, `Right`, ...) to a
/// [`Direction`]. The daemon itself only accepts the exact symbols.
pub fn parse_direction(input: &str) -> Result<Direction> {
    match input.trim().to_lowercase().as_str() {
        "l" | "left" => Ok(Direction::Left),
        "r" | "right" => Ok(Direction::Right),
        _ => bail!("Invalid direction '{}': expected L, R, left or right", input),
    }
}
