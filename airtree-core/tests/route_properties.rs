//! Behavioral properties of the route store and queries.
//!
//! Exercised against the in-memory store: position uniqueness under
//! concurrent writers, traversal termination, extremal tie-breaks, and
//! cascading deletes.

use airtree_core::query::{find_extremal, traverse};
use airtree_core::{
    AirportId, AirtreeError, Direction, Extremum, MemoryStore, NewRoute, RouteStore,
};
use std::sync::{Arc, Barrier};
use std::thread;

fn airports(store: &MemoryStore, count: usize) -> Vec<AirportId> {
    (0..count)
        .map(|i| store.create_airport(&format!("APT-{}", i)).unwrap().id)
        .collect()
}

#[test]
fn test_concurrent_route_creation_single_winner() {
    let store = Arc::new(MemoryStore::new());
    let ids = airports(&store, 9);
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (1..9)
        .map(|i| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            let parent = ids[0];
            let child = ids[i];
            thread::spawn(move || {
                barrier.wait();
                store.create_route(&NewRoute::new(parent, child, Direction::Left, 10))
            })
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("writer thread panicked"))
        .collect();

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "exactly one writer should claim the position");
    for result in results.iter().filter(|r| r.is_err()) {
        assert!(matches!(
            result,
            Err(AirtreeError::DuplicatePosition { .. })
        ));
    }
    assert_eq!(store.route_count().unwrap(), 1);
}

#[test]
fn test_traversal_path_length_matches_hops() {
    let store = MemoryStore::new();
    let ids = airports(&store, 6);
    for pair in ids.windows(2) {
        store
            .create_route(&NewRoute::new(pair[0], pair[1], Direction::Right, 5))
            .unwrap();
    }

    for (offset, start) in ids.iter().enumerate() {
        let walk = traverse(&store, *start, Direction::Right).unwrap();
        let expected_hops = ids.len() - 1 - offset;
        assert_eq!(walk.hops(), expected_hops);
        assert_eq!(walk.path.len(), expected_hops + 1);
        assert_eq!(walk.final_airport.id, ids[ids.len() - 1]);
    }

    let dead_end = traverse(&store, ids[2], Direction::Left).unwrap();
    assert_eq!(dead_end.path.len(), 1);
    assert_eq!(dead_end.path[0].id, ids[2]);
}

#[test]
fn test_two_node_cycle_terminates() {
    let store = MemoryStore::new();
    let ids = airports(&store, 2);
    store
        .create_route(&NewRoute::new(ids[0], ids[1], Direction::Left, 10))
        .unwrap();
    store
        .create_route(&NewRoute::new(ids[1], ids[0], Direction::Left, 10))
        .unwrap();

    assert!(matches!(
        traverse(&store, ids[0], Direction::Left),
        Err(AirtreeError::CycleDetected { .. })
    ));
    assert!(matches!(
        traverse(&store, ids[1], Direction::Left),
        Err(AirtreeError::CycleDetected { .. })
    ));
}

#[test]
fn test_extremal_bounds_every_route() {
    let store = MemoryStore::new();
    let ids = airports(&store, 8);
    let durations = [42, 7, 300, 15, 300, 7, 99];
    for (i, duration) in durations.iter().enumerate() {
        let direction = if i % 2 == 0 {
            Direction::Left
        } else {
            Direction::Right
        };
        store
            .create_route(&NewRoute::new(ids[i / 2], ids[i + 1], direction, *duration))
            .unwrap();
    }

    let routes = store.list_routes().unwrap();
    let longest = find_extremal(&store, Extremum::Max).unwrap();
    let shortest = find_extremal(&store, Extremum::Min).unwrap();
    assert!(routes
        .iter()
        .all(|r| longest.route.duration >= r.duration));
    assert!(routes
        .iter()
        .all(|r| shortest.route.duration <= r.duration));

    // Ties resolve to the earliest created route.
    assert_eq!(longest.route.id, routes[2].id);
    assert_eq!(shortest.route.id, routes[1].id);
}

#[test]
fn test_cascade_delete_hides_airport_from_queries() {
    let store = MemoryStore::new();
    let ids = airports(&store, 3);
    store
        .create_route(&NewRoute::new(ids[0], ids[1], Direction::Left, 500))
        .unwrap();
    store
        .create_route(&NewRoute::new(ids[1], ids[2], Direction::Left, 20))
        .unwrap();
    store
        .create_route(&NewRoute::new(ids[0], ids[2], Direction::Right, 60))
        .unwrap();

    assert_eq!(store.delete_airport(ids[1]).unwrap(), 2);

    for route in store.list_routes().unwrap() {
        assert_ne!(route.parent_id, ids[1]);
        assert_ne!(route.child_id, ids[1]);
    }

    let walk = traverse(&store, ids[0], Direction::Left).unwrap();
    assert_eq!(walk.path.len(), 1);

    let longest = find_extremal(&store, Extremum::Max).unwrap();
    assert_eq!(longest.route.duration, 60);
    assert_ne!(longest.child.id, ids[1]);

    assert!(traverse(&store, ids[1], Direction::Left)
        .unwrap_err()
        .is_not_found());
}
