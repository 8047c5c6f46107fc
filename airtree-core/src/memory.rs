//! In-memory route store.

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{AirtreeError, Result};
use crate::store::RouteStore;
use crate::types::{
    normalize_name, Airport, AirportId, Direction, NewRoute, Route, RouteId,
};

#[derive(Default)]
struct Inner {
    airports: BTreeMap<AirportId, Airport>,
    names: HashMap<String, AirportId>,
    routes: BTreeMap<RouteId, Route>,
    positions: HashMap<(AirportId, Direction), RouteId>,
    last_airport_id: i64,
    last_route_id: i64,
}

/// Route store held entirely in memory.
///
/// A single `RwLock` covers all maps, so every mutation sees and updates the
/// uniqueness indexes atomically.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Writes validate before mutating, so a poisoned lock still guards consistent maps.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        match self.inner.read() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::warn!("Recovering from poisoned store lock");
                poisoned.into_inner()
            }
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::warn!("Recovering from poisoned store lock");
                poisoned.into_inner()
            }
        }
    }
}

impl RouteStore for MemoryStore {
    fn create_airport(&self, name: &str) -> Result<Airport> {
        let name = normalize_name(name)?;
        let mut inner = self.write();

        if inner.names.contains_key(&name) {
            return Err(AirtreeError::DuplicateName { name });
        }

        inner.last_airport_id += 1;
        let airport = Airport {
            id: AirportId(inner.last_airport_id),
            name,
        };
        inner.names.insert(airport.name.clone(), airport.id);
        inner.airports.insert(airport.id, airport.clone());
        tracing::debug!("Created airport {} ({})", airport.name, airport.id);
        Ok(airport)
    }

    fn get_airport(&self, id: AirportId) -> Result<Option<Airport>> {
        Ok(self.read().airports.get(&id).cloned())
    }

    fn list_airports(&self) -> Result<Vec<Airport>> {
        let mut airports: Vec<Airport> = self.read().airports.values().cloned().collect();
        airports.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(airports)
    }

    fn delete_airport(&self, id: AirportId) -> Result<usize> {
        let mut inner = self.write();

        let airport = inner
            .airports
            .remove(&id)
            .ok_or_else(|| AirtreeError::airport_not_found(id))?;
        inner.names.remove(&airport.name);

        let doomed: Vec<RouteId> = inner
            .routes
            .values()
            .filter(|r| r.parent_id == id || r.child_id == id)
            .map(|r| r.id)
            .collect();
        for route_id in &doomed {
            if let Some(route) = inner.routes.remove(route_id) {
                inner.positions.remove(&(route.parent_id, route.direction));
            }
        }

        tracing::debug!(
            "Deleted airport {} ({}) and {} routes",
            airport.name,
            id,
            doomed.len()
        );
        Ok(doomed.len())
    }

    fn create_route(&self, request: &NewRoute) -> Result<Route> {
        let duration = request.validate()?;
        let mut inner = self.write();

        let parent = inner
            .airports
            .get(&request.parent_id)
            .ok_or_else(|| AirtreeError::airport_not_found(request.parent_id))?;
        if !inner.airports.contains_key(&request.child_id) {
            return Err(AirtreeError::airport_not_found(request.child_id));
        }
        if inner
            .positions
            .contains_key(&(request.parent_id, request.direction))
        {
            return Err(AirtreeError::DuplicatePosition {
                parent: request.parent_id,
                parent_name: parent.name.clone(),
                direction: request.direction,
            });
        }

        inner.last_route_id += 1;
        let route = Route {
            id: RouteId(inner.last_route_id),
            parent_id: request.parent_id,
            child_id: request.child_id,
            direction: request.direction,
            duration,
        };
        inner
            .positions
            .insert((route.parent_id, route.direction), route.id);
        inner.routes.insert(route.id, route.clone());
        Ok(route)
    }

    fn find_route(&self, parent: AirportId, direction: Direction) -> Result<Option<Route>> {
        let inner = self.read();
        Ok(inner
            .positions
            .get(&(parent, direction))
            .and_then(|id| inner.routes.get(id))
            .cloned())
    }

    fn list_routes(&self) -> Result<Vec<Route>> {
        Ok(self.read().routes.values().cloned().collect())
    }

    fn airport_count(&self) -> Result<usize> {
        Ok(self.read().airports.len())
    }

    fn route_count(&self) -> Result<usize> {
        Ok(self.read().routes.len())
    }
}
