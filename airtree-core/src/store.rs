//! Storage abstraction for airports and routes.
//!
//! Implementations must make each mutation atomic with respect to the
//! uniqueness rules: two concurrent `create_route` calls for the same
//! (parent, direction) cannot both succeed, and no failed call leaves a
//! partial write behind.

use crate::error::{AirtreeError, Result};
use crate::types::{Airport, AirportId, Direction, Extremum, NewRoute, Route};

/// Keyed storage of airports and routes.
pub trait RouteStore: Send + Sync {
    /// Create an airport. Fails with `DuplicateName` or `InvalidName`.
    fn create_airport(&self, name: &str) -> Result<Airport>;

    fn get_airport(&self, id: AirportId) -> Result<Option<Airport>>;

    /// All airports ordered by name.
    fn list_airports(&self) -> Result<Vec<Airport>>;

    /// Airports whose name contains `fragment`, case-insensitive, ordered by name.
    fn search_airports(&self, fragment: &str) -> Result<Vec<Airport>> {
        let needle = fragment.trim().to_lowercase();
        Ok(self
            .list_airports()?
            .into_iter()
            .filter(|a| a.name.to_lowercase().contains(&needle))
            .collect())
    }

    /// Delete an airport and every route that references it.
    ///
    /// Returns the number of routes removed with it.
    fn delete_airport(&self, id: AirportId) -> Result<usize>;

    /// Create a route after validating it.
    ///
    /// Checks, in order: duration and self reference, parent exists,
    /// child exists, (parent, direction) is free.
    fn create_route(&self, route: &NewRoute) -> Result<Route>;

    /// Route leaving `parent` in `direction`, if any.
    fn find_route(&self, parent: AirportId, direction: Direction) -> Result<Option<Route>>;

    /// All routes in creation order.
    fn list_routes(&self) -> Result<Vec<Route>>;

    fn airport_count(&self) -> Result<usize> {
        Ok(self.list_airports()?.len())
    }

    fn route_count(&self) -> Result<usize> {
        Ok(self.list_routes()?.len())
    }

    /// Like [`find_route`](Self::find_route) but absence is `NotFound`.
    fn get_route(&self, parent: AirportId, direction: Direction) -> Result<Route> {
        self.find_route(parent, direction)?
            .ok_or_else(|| AirtreeError::route_not_found(parent, direction))
    }

    /// Airport lookup where absence is `NotFound`.
    fn require_airport(&self, id: AirportId) -> Result<Airport> {
        self.get_airport(id)?
            .ok_or_else(|| AirtreeError::airport_not_found(id))
    }

    /// Routes ordered by parent name, then direction.
    fn list_routes_by_parent(&self) -> Result<Vec<Route>> {
        let names: std::collections::HashMap<AirportId, String> = self
            .list_airports()?
            .into_iter()
            .map(|a| (a.id, a.name))
            .collect();
        let mut routes = self.list_routes()?;
        routes.sort_by(|a, b| {
            names
                .get(&a.parent_id)
                .cmp(&names.get(&b.parent_id))
                .then(a.direction.cmp(&b.direction))
        });
        Ok(routes)
    }

    /// The `limit` most recently created routes, newest first.
    fn recent_routes(&self, limit: usize) -> Result<Vec<Route>> {
        let mut routes = self.list_routes()?;
        routes.reverse();
        routes.truncate(limit);
        Ok(routes)
    }

    /// Route with the maximum or minimum duration.
    ///
    /// Ties go to the earliest created route. `None` when there are no routes.
    fn extremal_route(&self, kind: Extremum) -> Result<Option<Route>> {
        Ok(scan_extremal(self.list_routes()?, kind))
    }
}

/// Linear scan over routes in creation order; only a strictly better
/// duration replaces the current pick.
pub fn scan_extremal(routes: impl IntoIterator<Item = Route>, kind: Extremum) -> Option<Route> {
    let mut best: Option<Route> = None;
    for route in routes {
        let better = match &best {
            None => true,
            Some(current) => match kind {
                Extremum::Max => route.duration > current.duration,
                Extremum::Min => route.duration < current.duration,
            },
        };
        if better {
            best = Some(route);
        }
    }
    best
}
