//! Data models for airports and the routes between them.
//!
//! Airports are named nodes. Routes are directed edges from a parent airport
//! to a child airport, labeled Left or Right and carrying a duration. Each
//! parent has at most one route per direction, so the routes form a
//! binary-tree-like structure (cycles and shared children are not excluded).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{AirtreeError, Result};

/// Maximum airport name length, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// Largest accepted route duration.
pub const MAX_DURATION: i64 = i32::MAX as i64;

/// Stable airport identifier assigned on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AirportId(pub i64);

impl fmt::Display for AirportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AirportId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse().map(AirportId)
    }
}

/// Stable route identifier. Ascending ids follow creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteId(pub i64);

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Route direction out of a parent airport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "L")]
    Left,
    #[serde(rename = "R")]
    Right,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Left, Direction::Right];

    /// Stored symbol ("L" or "R").
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Left => "L",
            Direction::Right => "R",
        }
    }

    /// Human-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Left => "Left",
            Direction::Right => "Right",
        }
    }

    /// Parse a direction symbol. Only the exact stored symbols "L" and "R"
    /// are accepted.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "L" => Ok(Direction::Left),
            "R" => Ok(Direction::Right),
            _ => Err(AirtreeError::InvalidDirection {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Direction {
    type Err = AirtreeError;

    fn from_str(s: &str) -> Result<Self> {
        Direction::parse(s)
    }
}

/// Which end of the duration ordering an extremal query looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extremum {
    Max,
    Min,
}

/// A named airport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airport {
    pub id: AirportId,
    pub name: String,
}

/// A directed route from a parent airport to a child airport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub id: RouteId,
    pub parent_id: AirportId,
    pub child_id: AirportId,
    pub direction: Direction,
    /// Time taken to reach the child, in minutes.
    pub duration: u32,
}

/// A route creation request that has not been validated yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoute {
    pub parent_id: AirportId,
    pub child_id: AirportId,
    pub direction: Direction,
    pub duration: i64,
}

impl NewRoute {
    pub fn new(
        parent_id: AirportId,
        child_id: AirportId,
        direction: Direction,
        duration: i64,
    ) -> Self {
        Self {
            parent_id,
            child_id,
            direction,
            duration,
        }
    }

    /// Check the request-local rules and return the validated duration.
    ///
    /// Store-dependent rules (airports exist, position free) are checked by
    /// the store inside its write section.
    pub fn validate(&self) -> Result<u32> {
        let duration = validate_duration(self.duration)?;
        if self.parent_id == self.child_id {
            return Err(AirtreeError::SelfReferencingRoute {
                airport: self.parent_id,
            });
        }
        Ok(duration)
    }
}

/// Validate a duration and narrow it to the stored width.
pub fn validate_duration(duration: i64) -> Result<u32> {
    if duration <= 0 || duration > MAX_DURATION {
        return Err(AirtreeError::InvalidDuration { duration });
    }
    Ok(duration as u32)
}

/// Normalize an airport name, rejecting empty and overlong names.
pub fn normalize_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AirtreeError::InvalidName {
            reason: "name must not be empty".to_string(),
        });
    }
    let len = trimmed.chars().count();
    if len > MAX_NAME_LEN {
        return Err(AirtreeError::InvalidName {
            reason: format!(
                "name is {} characters long, maximum is {}",
                len, MAX_NAME_LEN
            ),
        });
    }
    Ok(trimmed.to_string())
}

/// A route with both of its airports resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDetail {
    pub route: Route,
    pub parent: Airport,
    pub child: Airport,
}

impl RouteDetail {
    /// Display label, e.g. "JFK → LAX".
    pub fn label(&self) -> String {
        format!("{} → {}", self.parent.name, self.child.name)
    }
}

/// Outcome of walking from a start airport in one direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Traversal {
    pub start: Airport,
    pub direction: Direction,
    /// Last airport reached.
    pub final_airport: Airport,
    /// Every airport visited, start first and final last.
    pub path: Vec<Airport>,
}

impl Traversal {
    pub fn hops(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    pub fn path_names(&self) -> Vec<String> {
        self.path.iter().map(|a| a.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parse() {
        assert_eq!(Direction::parse("L").unwrap(), Direction::Left);
        assert_eq!(Direction::parse("R").unwrap(), Direction::Right);
        assert_eq!("R".parse::<Direction>().unwrap(), Direction::Right);

        let err = Direction::parse("up").unwrap_err();
        assert_eq!(
            err,
            AirtreeError::InvalidDirection {
                value: "up".to_string()
            }
        );
    }

    #[test]
    fn test_direction_rejects_anything_but_symbols() {
        for input in ["left", "l", " L ", "LEFT", "Right", "r", ""] {
            assert!(
                matches!(
                    Direction::parse(input),
                    Err(AirtreeError::InvalidDirection { .. })
                ),
                "{:?} should be rejected",
                input
            );
        }
    }

    #[test]
    fn test_direction_serde_uses_symbols() {
        assert_eq!(serde_json::to_string(&Direction::Left).unwrap(), "\"L\"");
        let parsed: Direction = serde_json::from_str("\"R\"").unwrap();
        assert_eq!(parsed, Direction::Right);
        assert!(serde_json::from_str::<Direction>("\"X\"").is_err());
    }

    #[test]
    fn test_validate_duration_bounds() {
        assert_eq!(validate_duration(1).unwrap(), 1);
        assert_eq!(validate_duration(MAX_DURATION).unwrap(), i32::MAX as u32);
        assert!(validate_duration(0).is_err());
        assert!(validate_duration(-10).is_err());
        assert!(validate_duration(MAX_DURATION + 1).is_err());
    }

    #[test]
    fn test_new_route_rejects_self_reference() {
        let req = NewRoute::new(AirportId(3), AirportId(3), Direction::Left, 10);
        assert_eq!(
            req.validate().unwrap_err(),
            AirtreeError::SelfReferencingRoute {
                airport: AirportId(3)
            }
        );
    }

    #[test]
    fn test_new_route_checks_duration_first() {
        let req = NewRoute::new(AirportId(3), AirportId(3), Direction::Left, 0);
        assert!(matches!(
            req.validate(),
            Err(AirtreeError::InvalidDuration { duration: 0 })
        ));
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  JFK ").unwrap(), "JFK");
        assert!(normalize_name("   ").is_err());
        assert!(normalize_name(&"x".repeat(MAX_NAME_LEN)).is_ok());
        assert!(normalize_name(&"x".repeat(MAX_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn test_route_detail_label() {
        let detail = RouteDetail {
            route: Route {
                id: RouteId(1),
                parent_id: AirportId(1),
                child_id: AirportId(2),
                direction: Direction::Right,
                duration: 90,
            },
            parent: Airport {
                id: AirportId(1),
                name: "JFK".to_string(),
            },
            child: Airport {
                id: AirportId(2),
                name: "LAX".to_string(),
            },
        };
        assert_eq!(detail.label(), "JFK → LAX");
    }
}
