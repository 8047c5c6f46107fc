//! HTTP API integration tests.
//!
//! Drives the axum router directly with `tower::ServiceExt::oneshot`, backed
//! by the in-memory store.

use airtree_core::{MemoryStore, RouteStore};
use airtree_daemon::server::{create_router, AppState};
use airtree_daemon::storage::RouteBase;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> Router {
    let store: Arc<dyn RouteStore> = Arc::new(MemoryStore::new());
    create_router(AppState::new(store, "memory"))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

async fn airport(app: &Router, name: &str) -> i64 {
    let (status, body) = post(app, "/api/airport/", json!({ "name": name })).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["data"]["id"].as_i64().unwrap()
}

async fn route(app: &Router, parent: i64, child: i64, position: &str, duration: i64) -> Value {
    let (status, body) = post(
        app,
        "/api/route/",
        json!({ "parent": parent, "child": child, "position": position, "duration": duration }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body
}

#[tokio::test]
async fn test_health_and_status() {
    let app = app();

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    airport(&app, "JFK").await;
    let (status, body) = get(&app, "/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["airport_count"], 1);
    assert_eq!(body["data"]["route_count"], 0);
    assert_eq!(body["data"]["storage"], "memory");
}

#[tokio::test]
async fn test_create_airport_rules() {
    let app = app();
    airport(&app, "JFK").await;

    let (status, body) = post(&app, "/api/airport", json!({ "name": "JFK" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("already exists"));

    let (status, _) = post(&app, "/api/airport", json!({ "name": "   " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post(&app, "/api/airport", json!({ "title": "LAX" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_airport_lookup_search_and_delete() {
    let app = app();
    let heathrow = airport(&app, "London Heathrow").await;
    let city = airport(&app, "London City").await;
    airport(&app, "Paris CDG").await;
    route(&app, heathrow, city, "L", 55).await;

    let (status, body) = get(&app, "/api/airports?search=london").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["London City", "London Heathrow"]);

    let (status, body) = get(&app, &format!("/api/airports/{}", heathrow)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "London Heathrow");

    let (status, _) = get(&app, "/api/airports/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = get(&app, "/api/airports/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let uri = format!("/api/airports/{}", city);
    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["removed_routes"], 1);

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = get(&app, "/api/routes").await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_route_rules() {
    let app = app();
    let a = airport(&app, "A").await;
    let b = airport(&app, "B").await;
    let c = airport(&app, "C").await;

    let body = route(&app, a, b, "L", 10).await;
    assert_eq!(body["data"]["position"], "L");
    assert_eq!(body["data"]["parent_name"], "A");
    assert_eq!(body["data"]["child_name"], "B");

    let payload_for = |parent: i64, child: i64, position: &str, duration: i64| {
        json!({ "parent": parent, "child": child, "position": position, "duration": duration })
    };
    let cases = [
        (payload_for(a, c, "L", 10), StatusCode::BAD_REQUEST),
        (payload_for(a, c, "X", 10), StatusCode::BAD_REQUEST),
        (payload_for(a, c, "right", 10), StatusCode::BAD_REQUEST),
        (payload_for(a, c, "r", 10), StatusCode::BAD_REQUEST),
        (payload_for(a, c, "R", 0), StatusCode::BAD_REQUEST),
        (payload_for(c, c, "R", 5), StatusCode::BAD_REQUEST),
        (payload_for(a, 404, "R", 5), StatusCode::NOT_FOUND),
        (json!({ "parent": a, "child": c, "position": "R" }), StatusCode::BAD_REQUEST),
    ];
    for (payload, expected) in cases {
        let (status, body) = post(&app, "/api/route", payload.clone()).await;
        assert_eq!(status, expected, "payload {} -> {}", payload, body);
        assert_eq!(body["success"], false);
    }

    let (_, body) = post(
        &app,
        "/api/route",
        json!({ "parent": a, "child": c, "position": "L", "duration": 10 }),
    )
    .await;
    assert_eq!(
        body["error"],
        "A route already exists for A in the Left direction"
    );

    let body = route(&app, a, c, "R", 20).await;
    assert_eq!(body["data"]["position"], "R");
}

#[tokio::test]
async fn test_route_listing() {
    let app = app();
    let zurich = airport(&app, "Zurich").await;
    let athens = airport(&app, "Athens").await;
    let berlin = airport(&app, "Berlin").await;
    route(&app, zurich, athens, "R", 10).await;
    route(&app, athens, berlin, "R", 20).await;
    route(&app, athens, zurich, "L", 30).await;

    let (status, body) = get(&app, "/api/routes").await;
    assert_eq!(status, StatusCode::OK);
    let durations: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["duration"].as_i64().unwrap())
        .collect();
    assert_eq!(durations, vec![30, 20, 10]);

    let (_, body) = get(&app, "/api/routes?recent=1").await;
    assert_eq!(body["data"][0]["duration"], 30);
    assert_eq!(body["data"][0]["label"], "Athens → Zurich");

    let (status, _) = get(&app, "/api/routes?recent=many").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_traverse() {
    let app = app();
    let a = airport(&app, "A").await;
    let b = airport(&app, "B").await;
    let c = airport(&app, "C").await;
    route(&app, a, b, "L", 10).await;
    route(&app, b, c, "L", 10).await;

    let (status, body) = get(&app, &format!("/api/traverse?airport={}&direction=L", a)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["last_reachable_airport"], "C");
    assert_eq!(body["data"]["airport_id"], c);
    assert_eq!(body["data"]["hops"], 2);
    assert_eq!(body["data"]["path"].as_array().unwrap().len(), 3);

    let (_, body) = get(&app, &format!("/api/traverse/?airport={}&direction=R", a)).await;
    assert_eq!(body["data"]["last_reachable_airport"], "A");
    assert_eq!(body["data"]["hops"], 0);

    let (status, body) = get(&app, "/api/traverse?airport=1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "airport and direction parameters are required");

    let (status, _) = get(&app, "/api/traverse?airport=999&direction=L").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = get(&app, &format!("/api/traverse?airport={}&direction=Q", a)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = get(&app, "/api/traverse?airport=first&direction=L").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Only the exact symbols are directions.
    for direction in ["left", "l", "Right", "%20L%20"] {
        let uri = format!("/api/traverse?airport={}&direction={}", a, direction);
        let (status, body) = get(&app, &uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "direction {}", direction);
        assert!(body["error"].as_str().unwrap().contains("direction"), "{}", body);
    }

    // Close the loop; the walk must fail instead of spinning.
    route(&app, c, a, "L", 10).await;
    let (status, body) = get(&app, &format!("/api/traverse?airport={}&direction=L", a)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("Cycle detected"));
}

#[tokio::test]
async fn test_longest_and_shortest() {
    let app = app();

    let (status, body) = get(&app, "/api/longest").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    let (status, _) = get(&app, "/api/shortest/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let a = airport(&app, "A").await;
    let b = airport(&app, "B").await;
    let c = airport(&app, "C").await;
    route(&app, a, b, "L", 120).await;
    route(&app, a, c, "R", 45).await;
    route(&app, b, c, "L", 120).await;

    let (status, body) = get(&app, "/api/longest/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["airport"], "B");
    assert_eq!(body["data"]["airport_id"], b);
    assert_eq!(body["data"]["duration"], 120);
    assert_eq!(body["data"]["route"], "A → B");

    let (_, body) = get(&app, "/api/shortest").await;
    assert_eq!(body["data"]["airport"], "C");
    assert_eq!(body["data"]["duration"], 45);
    assert_eq!(body["data"]["route"], "A → C");
}

#[tokio::test]
async fn test_router_over_duckdb() {
    let routebase = RouteBase::open_in_memory().unwrap();
    let version = routebase.schema_version().unwrap();
    let store: Arc<dyn RouteStore> = Arc::new(routebase);
    let app = create_router(AppState::new(store, ":memory:").with_schema_version(version));

    let a = airport(&app, "A").await;
    let b = airport(&app, "B").await;
    route(&app, a, b, "R", 75).await;

    let (_, body) = get(&app, "/status").await;
    assert_eq!(body["data"]["schema_version"], "1.0.0");
    assert_eq!(body["data"]["route_count"], 1);

    let (_, body) = get(&app, &format!("/api/traverse?airport={}&direction=R", a)).await;
    assert_eq!(body["data"]["last_reachable_airport"], "B");
}
