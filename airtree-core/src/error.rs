//! Error types for airtree operations.

use thiserror::Error;

use crate::types::{AirportId, Direction};

/// Result type alias for airtree operations.
pub type Result<T> = std::result::Result<T, AirtreeError>;

/// Errors that can occur while storing or querying airports and routes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AirtreeError {
    /// Another airport already uses this name.
    #[error("Airport with name '{name}' already exists")]
    DuplicateName {
        /// The rejected name.
        name: String,
    },

    /// Airport name is empty or too long.
    #[error("Invalid airport name: {reason}")]
    InvalidName {
        /// Why the name was rejected.
        reason: String,
    },

    /// The parent airport already has a route in this direction.
    #[error("A route already exists for {parent_name} in the {} direction", .direction.label())]
    DuplicatePosition {
        /// Parent airport of the existing route.
        parent: AirportId,
        /// Name of the parent airport, for display.
        parent_name: String,
        /// Direction that is already taken.
        direction: Direction,
    },

    /// Duration is not a positive integer in range.
    #[error("Invalid duration {duration}: must be a positive integer")]
    InvalidDuration {
        /// The rejected duration.
        duration: i64,
    },

    /// Direction symbol is not one of the two recognized values.
    #[error("Invalid direction '{value}': must be 'L' (Left) or 'R' (Right)")]
    InvalidDirection {
        /// The rejected input.
        value: String,
    },

    /// Parent and child of a route are the same airport.
    #[error("Parent and Child airports cannot be the same (airport {airport})")]
    SelfReferencingRoute {
        /// The airport used on both ends.
        airport: AirportId,
    },

    /// A referenced entity does not exist.
    #[error("{entity} not found: {key}")]
    NotFound {
        /// Kind of entity that was looked up.
        entity: &'static str,
        /// Lookup key, for display.
        key: String,
    },

    /// Traversal revisited an airport.
    #[error("Cycle detected: airport {airport} revisited after {} hops", .path.len())]
    CycleDetected {
        /// The airport reached a second time.
        airport: AirportId,
        /// Airports visited before the cycle closed, starting airport first.
        path: Vec<AirportId>,
    },

    /// Underlying storage failed.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage failure.
        message: String,
    },
}

/// Coarse classification of [`AirtreeError`] used by transports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected input; nothing was written.
    Validation,
    /// A referenced airport or route does not exist.
    NotFound,
    /// Traversal safety bound tripped.
    Cycle,
    /// Storage failure.
    Internal,
}

impl AirtreeError {
    /// Airport lookup failure.
    pub fn airport_not_found(id: AirportId) -> Self {
        AirtreeError::NotFound {
            entity: "Airport",
            key: id.to_string(),
        }
    }

    /// Route lookup failure for a parent and direction.
    pub fn route_not_found(parent: AirportId, direction: Direction) -> Self {
        AirtreeError::NotFound {
            entity: "Route",
            key: format!("{} ({})", parent, direction.label()),
        }
    }

    /// Extremal query over an empty route set.
    pub fn no_routes() -> Self {
        AirtreeError::NotFound {
            entity: "Route",
            key: "no routes found".to_string(),
        }
    }

    /// Wrap a storage failure with context.
    pub fn storage(context: impl std::fmt::Display, err: impl std::fmt::Display) -> Self {
        AirtreeError::Storage {
            message: format!("{}: {}", context, err),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AirtreeError::DuplicateName { .. }
            | AirtreeError::InvalidName { .. }
            | AirtreeError::DuplicatePosition { .. }
            | AirtreeError::InvalidDuration { .. }
            | AirtreeError::InvalidDirection { .. }
            | AirtreeError::SelfReferencingRoute { .. } => ErrorKind::Validation,
            AirtreeError::NotFound { .. } => ErrorKind::NotFound,
            AirtreeError::CycleDetected { .. } => ErrorKind::Cycle,
            AirtreeError::Storage { .. } => ErrorKind::Internal,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AirtreeError::DuplicatePosition {
            parent: AirportId(1),
            parent_name: "JFK".to_string(),
            direction: Direction::Left,
        };
        assert_eq!(
            err.to_string(),
            "A route already exists for JFK in the Left direction"
        );

        let err = AirtreeError::InvalidDuration { duration: -5 };
        assert!(err.to_string().contains("-5"));

        let err = AirtreeError::airport_not_found(AirportId(42));
        assert_eq!(err.to_string(), "Airport not found: 42");
    }

    #[test]
    fn test_cycle_display_counts_hops() {
        let err = AirtreeError::CycleDetected {
            airport: AirportId(1),
            path: vec![AirportId(1), AirportId(2)],
        };
        assert!(err.to_string().contains("after 2 hops"));
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(
            AirtreeError::InvalidDirection {
                value: "X".to_string()
            }
            .kind(),
            ErrorKind::Validation
        );
        assert!(AirtreeError::no_routes().is_not_found());
        assert_eq!(
            AirtreeError::storage("open", "disk full").kind(),
            ErrorKind::Internal
        );
    }
}
