//! HTTP client for the airtree daemon.
//!
//! Every daemon response is wrapped in a `{ success, data, error, duration_ms }`
//! envelope; [`DaemonClient`] unwraps it and turns `success: false` into
//! [`ClientError::Api`] carrying the server's message.

use airtree_core::{Airport, AirportId, Direction, Extremum};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Daemon address used when neither `--server` nor `AIRTREE_URL` is set.
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:9130";

/// Errors talking to the daemon.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Cannot reach airtree daemon at {url}: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The daemon answered with `success: false`.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response from {url} (HTTP {status}): {source}")]
    Decode {
        url: String,
        status: u16,
        #[source]
        source: reqwest::Error,
    },
}

/// Response envelope shared by every daemon endpoint.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    #[serde(default)]
    pub duration_ms: u64,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the payload, or the server's error message.
    pub fn into_result(self, status: u16) -> Result<T, ClientError> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(ClientError::Api {
                status,
                message: self
                    .error
                    .unwrap_or_else(|| format!("Request failed with HTTP {}", status)),
            }),
        }
    }
}

/// Route with both airport names, as returned by the route endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouteRecord {
    pub id: i64,
    pub parent: i64,
    pub parent_name: String,
    pub child: i64,
    pub child_name: String,
    pub position: Direction,
    pub duration: u32,
    pub label: String,
}

/// Result of a cascading airport delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRecord {
    pub airport: Airport,
    pub removed_routes: usize,
}

/// Result of walking one direction from an airport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraverseRecord {
    pub last_reachable_airport: String,
    pub airport_id: AirportId,
    pub direction: Direction,
    pub hops: usize,
    pub path: Vec<Airport>,
}

/// Longest or shortest route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtremalRecord {
    pub airport: String,
    pub airport_id: AirportId,
    pub duration: u32,
    pub route: String,
    pub route_id: i64,
    pub parent: Airport,
}

/// Daemon status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusRecord {
    pub status: String,
    pub airport_count: usize,
    pub route_count: usize,
    pub storage: String,
    pub schema_version: Option<String>,
    pub uptime_seconds: f64,
    pub started_at: String,
}

/// Thin typed wrapper over the daemon's REST API.
pub struct DaemonClient {
    base_url: String,
    http: Client,
}

impl DaemonClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("{} {}", method, url);

        let mut request = self.http.request(method, &url).query(query);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|source| ClientError::Unreachable {
            url: self.base_url.clone(),
            source,
        })?;

        let status = response.status().as_u16();
        let envelope: ApiEnvelope<T> =
            response
                .json()
                .await
                .map_err(|source| ClientError::Decode {
                    url: url.clone(),
                    status,
                    source,
                })?;
        tracing::debug!("{} answered in {}ms", url, envelope.duration_ms);
        envelope.into_result(status)
    }

    pub async fn status(&self) -> Result<StatusRecord, ClientError> {
        self.request(Method::GET, "/status", &[], None).await
    }

    pub async fn create_airport(&self, name: &str) -> Result<Airport, ClientError> {
        let body = serde_json::json!({ "name": name });
        self.request(Method::POST, "/api/airport/", &[], Some(body))
            .await
    }

    pub async fn list_airports(&self, search: Option<&str>) -> Result<Vec<Airport>, ClientError> {
        let query: Vec<(&str, String)> = search
            .map(|s| vec![("search", s.to_string())])
            .unwrap_or_default();
        self.request(Method::GET, "/api/airports", &query, None)
            .await
    }

    pub async fn get_airport(&self, id: AirportId) -> Result<Airport, ClientError> {
        let path = format!("/api/airports/{}", id);
        self.request(Method::GET, &path, &[], None).await
    }

    pub async fn delete_airport(&self, id: AirportId) -> Result<DeleteRecord, ClientError> {
        let path = format!("/api/airports/{}", id);
        self.request(Method::DELETE, &path, &[], None).await
    }

    pub async fn create_route(
        &self,
        parent: AirportId,
        child: AirportId,
        position: Direction,
        duration: i64,
    ) -> Result<RouteRecord, ClientError> {
        let body = serde_json::json!({
            "parent": parent,
            "child": child,
            "position": position,
            "duration": duration,
        });
        self.request(Method::POST, "/api/route/", &[], Some(body))
            .await
    }

    pub async fn list_routes(
        &self,
        recent: Option<usize>,
    ) -> Result<Vec<RouteRecord>, ClientError> {
        let query: Vec<(&str, String)> = recent
            .map(|n| vec![("recent", n.to_string())])
            .unwrap_or_default();
        self.request(Method::GET, "/api/routes", &query, None).await
    }

    pub async fn traverse(
        &self,
        airport: AirportId,
        direction: Direction,
    ) -> Result<TraverseRecord, ClientError> {
        let query = [
            ("airport", airport.to_string()),
            ("direction", direction.as_str().to_string()),
        ];
        self.request(Method::GET, "/api/traverse", &query, None)
            .await
    }

    pub async fn extremal(&self, kind: Extremum) -> Result<ExtremalRecord, ClientError> {
        let path = match kind {
            Extremum::Max => "/api/longest",
            Extremum::Min => "/api/shortest",
        };
        self.request(Method::GET, path, &[], None).await
    }
}
