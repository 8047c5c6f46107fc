//! Read-only queries over a route store.
//!
//! - [`traverse`]: follow routes in one direction until a dead end.
//! - [`find_extremal`]: the route with the globally longest or shortest duration.
//!
//! Neither query writes to the store.

use std::collections::HashSet;

use crate::error::{AirtreeError, Result};
use crate::store::RouteStore;
use crate::types::{AirportId, Direction, Extremum, Route, RouteDetail, Traversal};

/// Walk from `start` following the route in `direction` at each airport.
///
/// Stops at the first airport with no route in that direction and returns
/// it together with every airport visited. Routes may form cycles, so the
/// walk keeps a visited set and fails with `CycleDetected` as soon as an
/// airport would be entered a second time.
///
/// Fails with `NotFound` if `start` does not exist.
pub fn traverse<S: RouteStore + ?Sized>(
    store: &S,
    start: AirportId,
    direction: Direction,
) -> Result<Traversal> {
    let start_airport = store.require_airport(start)?;

    let mut visited: HashSet<AirportId> = HashSet::new();
    visited.insert(start);
    let mut path = vec![start_airport.clone()];
    let mut current = start;

    while let Some(route) = store.find_route(current, direction)? {
        let next = route.child_id;
        if !visited.insert(next) {
            tracing::warn!(
                "Traversal from {} ({}) revisits airport {}",
                start,
                direction.label(),
                next
            );
            return Err(AirtreeError::CycleDetected {
                airport: next,
                path: path.iter().map(|a| a.id).collect(),
            });
        }
        path.push(store.require_airport(next)?);
        current = next;
    }

    let final_airport = path.last().cloned().unwrap_or_else(|| start_airport.clone());
    tracing::debug!(
        "Traversal from {} ({}) ended at {} after {} hops",
        start_airport.name,
        direction.label(),
        final_airport.name,
        path.len() - 1
    );

    Ok(Traversal {
        start: start_airport,
        direction,
        final_airport,
        path,
    })
}

/// The route with the maximum or minimum duration, with its airports resolved.
///
/// Ties go to the earliest created route. Fails with `NotFound` when no
/// routes exist.
pub fn find_extremal<S: RouteStore + ?Sized>(store: &S, kind: Extremum) -> Result<RouteDetail> {
    let route = store
        .extremal_route(kind)?
        .ok_or_else(AirtreeError::no_routes)?;
    describe_route(store, route)
}

/// Resolve both airports of a route.
pub fn describe_route<S: RouteStore + ?Sized>(store: &S, route: Route) -> Result<RouteDetail> {
    let parent = store.require_airport(route.parent_id)?;
    let child = store.require_airport(route.child_id)?;
    Ok(RouteDetail {
        route,
        parent,
        child,
    })
}
