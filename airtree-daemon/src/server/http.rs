//! HTTP routes and handlers for the airtree daemon API.

use airtree_core::{
    query, Airport, AirportId, AirtreeError, Direction, ErrorKind, Extremum, NewRoute,
    RouteDetail,
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::state::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health and status
        .route("/health", get(health))
        .route("/status", get(status))
        // Airports
        .route("/api/airport", post(create_airport))
        .route("/api/airport/", post(create_airport))
        .route("/api/airports", get(list_airports))
        .route("/api/airports/:id", get(get_airport).delete(delete_airport))
        // Routes
        .route("/api/route", post(create_route))
        .route("/api/route/", post(create_route))
        .route("/api/routes", get(list_routes))
        // Queries
        .route("/api/traverse", get(traverse))
        .route("/api/traverse/", get(traverse))
        .route("/api/longest", get(longest))
        .route("/api/longest/", get(longest))
        .route("/api/shortest", get(shortest))
        .route("/api/shortest/", get(shortest))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

// =============================================================================
// Response Types
// =============================================================================

#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
    duration_ms: u64,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T, duration_ms: u64) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
            duration_ms,
        })
    }

    fn err(error: impl ToString, duration_ms: u64) -> Json<Self> {
        Json(Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
            duration_ms,
        })
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

/// HTTP status for a store or query error.
fn status_for(err: &AirtreeError) -> StatusCode {
    match err.kind() {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Cycle => StatusCode::CONFLICT,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Wrap a result in the response envelope with the matching status code.
fn reply<T: Serialize>(
    result: airtree_core::Result<T>,
    success: StatusCode,
    start: Instant,
) -> Response {
    match result {
        Ok(data) => (success, ApiResponse::ok(data, elapsed_ms(start))).into_response(),
        Err(e) => {
            let status = status_for(&e);
            if status == StatusCode::INTERNAL_SERVER_ERROR {
                tracing::error!("Request failed: {}", e);
            } else {
                tracing::debug!("Request rejected: {}", e);
            }
            (status, ApiResponse::<()>::err(e, elapsed_ms(start))).into_response()
        }
    }
}

fn bad_request(message: impl ToString, start: Instant) -> Response {
    (
        StatusCode::BAD_REQUEST,
        ApiResponse::<()>::err(message, elapsed_ms(start)),
    )
        .into_response()
}

/// Route as exposed over HTTP, with airport names resolved.
#[derive(Debug, Serialize)]
struct RouteView {
    id: i64,
    parent: i64,
    parent_name: String,
    child: i64,
    child_name: String,
    position: Direction,
    duration: u32,
    label: String,
}

impl From<RouteDetail> for RouteView {
    fn from(detail: RouteDetail) -> Self {
        let label = detail.label();
        Self {
            id: detail.route.id.0,
            parent: detail.parent.id.0,
            parent_name: detail.parent.name,
            child: detail.child.id.0,
            child_name: detail.child.name,
            position: detail.route.direction,
            duration: detail.route.duration,
            label,
        }
    }
}

// =============================================================================
// Health & Status
// =============================================================================

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "airtree-daemon"
    }))
}

#[derive(Serialize)]
struct StatusResponse {
    status: String,
    airport_count: usize,
    route_count: usize,
    storage: String,
    schema_version: Option<String>,
    uptime_seconds: f64,
    started_at: String,
}

async fn status(State(state): State<Arc<AppState>>) -> Response {
    let start = Instant::now();
    reply(collect_status(&state), StatusCode::OK, start)
}

fn collect_status(state: &AppState) -> airtree_core::Result<StatusResponse> {
    Ok(StatusResponse {
        status: "running".to_string(),
        airport_count: state.store.airport_count()?,
        route_count: state.store.route_count()?,
        storage: state.storage_label.clone(),
        schema_version: state.schema_version.clone(),
        uptime_seconds: state.uptime_seconds(),
        started_at: state.started_at.to_rfc3339(),
    })
}

// =============================================================================
// Airports
// =============================================================================

#[derive(Deserialize)]
struct CreateAirportRequest {
    name: String,
}

async fn create_airport(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateAirportRequest>, JsonRejection>,
) -> Response {
    let start = Instant::now();
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_request(rejection.body_text(), start),
    };

    reply(
        state.store.create_airport(&req.name),
        StatusCode::CREATED,
        start,
    )
}

#[derive(Deserialize)]
struct AirportListParams {
    search: Option<String>,
}

async fn list_airports(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AirportListParams>,
) -> Response {
    let start = Instant::now();
    let result = match params.search.as_deref().map(str::trim) {
        Some(fragment) if !fragment.is_empty() => state.store.search_airports(fragment),
        _ => state.store.list_airports(),
    };
    reply(result, StatusCode::OK, start)
}

async fn get_airport(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Response {
    let start = Instant::now();
    let Path(id) = match id {
        Ok(id) => id,
        Err(rejection) => return bad_request(rejection.body_text(), start),
    };

    reply(
        state.store.require_airport(AirportId(id)),
        StatusCode::OK,
        start,
    )
}

#[derive(Serialize)]
struct DeleteAirportResponse {
    airport: Airport,
    removed_routes: usize,
}

async fn delete_airport(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Response {
    let start = Instant::now();
    let Path(id) = match id {
        Ok(id) => id,
        Err(rejection) => return bad_request(rejection.body_text(), start),
    };

    let id = AirportId(id);
    let result = state.store.require_airport(id).and_then(|airport| {
        let removed_routes = state.store.delete_airport(id)?;
        Ok(DeleteAirportResponse {
            airport,
            removed_routes,
        })
    });

    reply(result, StatusCode::OK, start)
}

// =============================================================================
// Routes
// =============================================================================

#[derive(Deserialize)]
struct CreateRouteRequest {
    parent: i64,
    child: i64,
    position: String,
    duration: i64,
}

async fn create_route(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateRouteRequest>, JsonRejection>,
) -> Response {
    let start = Instant::now();
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_request(rejection.body_text(), start),
    };

    let result = Direction::parse(&req.position).and_then(|direction| {
        let request = NewRoute::new(
            AirportId(req.parent),
            AirportId(req.child),
            direction,
            req.duration,
        );
        let route = state.store.create_route(&request)?;
        query::describe_route(state.store.as_ref(), route).map(RouteView::from)
    });

    reply(result, StatusCode::CREATED, start)
}

#[derive(Deserialize)]
struct RouteListParams {
    /// Return only the N most recently created routes, newest first.
    recent: Option<usize>,
}

async fn list_routes(
    State(state): State<Arc<AppState>>,
    params: Result<Query<RouteListParams>, QueryRejection>,
) -> Response {
    let start = Instant::now();
    let Query(params) = match params {
        Ok(params) => params,
        Err(rejection) => return bad_request(rejection.body_text(), start),
    };

    let result = match params.recent {
        Some(limit) => state.store.recent_routes(limit),
        None => state.store.list_routes_by_parent(),
    }
    .and_then(|routes| {
        routes
            .into_iter()
            .map(|route| query::describe_route(state.store.as_ref(), route).map(RouteView::from))
            .collect::<airtree_core::Result<Vec<_>>>()
    });

    reply(result, StatusCode::OK, start)
}

// =============================================================================
// Queries
// =============================================================================

#[derive(Deserialize)]
struct TraverseParams {
    airport: Option<String>,
    direction: Option<String>,
}

#[derive(Serialize)]
struct TraverseResponse {
    last_reachable_airport: String,
    airport_id: AirportId,
    direction: Direction,
    hops: usize,
    path: Vec<Airport>,
}

async fn traverse(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TraverseParams>,
) -> Response {
    let start = Instant::now();

    let (airport, direction) = match (params.airport, params.direction) {
        (Some(airport), Some(direction))
            if !airport.trim().is_empty() && !direction.trim().is_empty() =>
        {
            (airport, direction)
        }
        _ => return bad_request("airport and direction parameters are required", start),
    };

    let airport: AirportId = match airport.parse() {
        Ok(id) => id,
        Err(_) => return bad_request(format!("Invalid airport id '{}'", airport), start),
    };

    // Unknown airports are reported before malformed directions.
    let result = state
        .store
        .require_airport(airport)
        .and_then(|_| Direction::parse(&direction))
        .and_then(|direction| query::traverse(state.store.as_ref(), airport, direction))
        .map(|walk| TraverseResponse {
            last_reachable_airport: walk.final_airport.name.clone(),
            airport_id: walk.final_airport.id,
            direction: walk.direction,
            hops: walk.hops(),
            path: walk.path,
        });

    reply(result, StatusCode::OK, start)
}

#[derive(Serialize)]
struct ExtremalResponse {
    /// Destination airport of the selected route.
    airport: String,
    airport_id: AirportId,
    duration: u32,
    /// `"Parent → Child"` label.
    route: String,
    route_id: i64,
    parent: Airport,
}

fn extremal(state: &AppState, kind: Extremum, start: Instant) -> Response {
    let result = query::find_extremal(state.store.as_ref(), kind).map(|detail| {
        let route = detail.label();
        ExtremalResponse {
            airport: detail.child.name,
            airport_id: detail.child.id,
            duration: detail.route.duration,
            route,
            route_id: detail.route.id.0,
            parent: detail.parent,
        }
    });
    reply(result, StatusCode::OK, start)
}

async fn longest(State(state): State<Arc<AppState>>) -> Response {
    extremal(&state, Extremum::Max, Instant::now())
}

async fn shortest(State(state): State<Arc<AppState>>) -> Response {
    extremal(&state, Extremum::Min, Instant::now())
}
