//! RouteBase - DuckDB-based storage for airports and routes.

use airtree_core::store::RouteStore;
use airtree_core::types::{normalize_name, validate_duration};
use airtree_core::{
    Airport, AirportId, AirtreeError, Direction, Extremum, NewRoute, Result, Route, RouteId,
};
use duckdb::{params, Config, Connection, OptionalExt, ToSql};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use super::schema::{ROUTE_COLUMNS, SCHEMA_SQL, SCHEMA_VERSION};

/// Database access mode for concurrent access control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessMode {
    /// Read-write mode (exclusive lock, for modifications)
    #[default]
    ReadWrite,
    /// Read-only mode (shared access, for queries)
    ReadOnly,
}

/// Attach context to DuckDB failures while converting them to [`AirtreeError`].
trait StorageContext<T> {
    fn storage(self, context: &str) -> Result<T>;

    fn storage_with<F: FnOnce() -> String>(self, context: F) -> Result<T>;
}

impl<T> StorageContext<T> for std::result::Result<T, duckdb::Error> {
    fn storage(self, context: &str) -> Result<T> {
        self.map_err(|e| AirtreeError::storage(context, e))
    }

    fn storage_with<F: FnOnce() -> String>(self, context: F) -> Result<T> {
        self.map_err(|e| AirtreeError::storage(context(), e))
    }
}

/// Raw route row: id, parent_id, child_id, direction, duration.
type RouteRow = (i64, i64, i64, String, i64);

fn read_route_row(row: &duckdb::Row<'_>) -> duckdb::Result<RouteRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
    ))
}

fn route_from_row((id, parent_id, child_id, direction, duration): RouteRow) -> Result<Route> {
    let direction = Direction::parse(&direction)
        .map_err(|e| AirtreeError::storage(format!("Corrupt route {}", id), e))?;
    let duration = validate_duration(duration)
        .map_err(|e| AirtreeError::storage(format!("Corrupt route {}", id), e))?;
    Ok(Route {
        id: RouteId(id),
        parent_id: AirportId(parent_id),
        child_id: AirportId(child_id),
        direction,
        duration,
    })
}

/// Table counts reported by the status endpoint.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RouteStats {
    pub airport_count: usize,
    pub route_count: usize,
    pub left_routes: usize,
    pub right_routes: usize,
}

/// RouteBase - DuckDB-based storage for airports and routes.
///
/// A single connection sits behind a mutex; every mutation runs in its own
/// transaction while holding it, so uniqueness checks and inserts cannot
/// interleave.
pub struct RouteBase {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl RouteBase {
    /// Open or create a RouteBase database in read-write mode.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_mode(path, AccessMode::ReadWrite)
    }

    /// Open a RouteBase database in read-only mode (for concurrent queries).
    ///
    /// Multiple read-only connections can coexist without blocking.
    pub fn open_read_only(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_mode(path, AccessMode::ReadOnly)
    }

    /// Open a RouteBase database with the specified access mode.
    pub fn open_with_mode(path: impl AsRef<Path>, mode: AccessMode) -> Result<Self> {
        let path = path.as_ref();

        let conn = match mode {
            AccessMode::ReadWrite => Connection::open(path)
                .storage_with(|| format!("Failed to open database: {:?}", path))?,
            AccessMode::ReadOnly => {
                let config = Config::default()
                    .access_mode(duckdb::AccessMode::ReadOnly)
                    .storage("Failed to set read-only mode")?;
                Connection::open_with_flags(path, config).storage_with(|| {
                    format!("Failed to open database in read-only mode: {:?}", path)
                })?
            }
        };

        let routebase = Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        };

        // Only initialize schema in read-write mode
        if mode == AccessMode::ReadWrite {
            routebase.init_schema()?;
        }

        Ok(routebase)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().storage("Failed to open in-memory database")?;
        let routebase = Self {
            conn: Mutex::new(conn),
            path: None,
        };
        routebase.init_schema()?;
        Ok(routebase)
    }

    /// Database file, or `None` for in-memory databases.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Acquire the database connection lock.
    ///
    /// A poisoned mutex is recovered: open transactions roll back on drop,
    /// so the connection itself is still consistent.
    fn acquire_conn(&self) -> MutexGuard<'_, Connection> {
        match self.conn.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::warn!("Recovering from poisoned database mutex");
                poisoned.into_inner()
            }
        }
    }

    /// Initialize the database schema.
    fn init_schema(&self) -> Result<()> {
        let conn = self.acquire_conn();

        conn.execute_batch(SCHEMA_SQL)
            .storage("Failed to initialize schema")?;

        conn.execute(
            "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)",
            params![SCHEMA_VERSION],
        )
        .storage("Failed to set schema version")?;

        Ok(())
    }

    /// Schema version recorded in the metadata table.
    pub fn schema_version(&self) -> Result<Option<String>> {
        let conn = self.acquire_conn();
        conn.query_row(
            "SELECT value FROM metadata WHERE key = 'schema_version'",
            [],
            |row| row.get(0),
        )
        .optional()
        .storage("Failed to read schema version")
    }

    /// Get table statistics.
    pub fn stats(&self) -> Result<RouteStats> {
        let conn = self.acquire_conn();

        let airport_count: usize = conn
            .query_row("SELECT COUNT(*) FROM airports", [], |row| row.get(0))
            .storage("Failed to count airports")?;
        let route_count: usize = conn
            .query_row("SELECT COUNT(*) FROM routes", [], |row| row.get(0))
            .storage("Failed to count routes")?;

        let mut left_routes = 0;
        let mut right_routes = 0;
        let mut stmt = conn
            .prepare("SELECT direction, COUNT(*) FROM routes GROUP BY direction")
            .storage("Failed to prepare direction counts")?;
        let mut rows = stmt.query([]).storage("Failed to count directions")?;
        while let Some(row) = rows.next().storage("Failed to read direction counts")? {
            let direction: String = row.get(0).storage("Failed to read direction")?;
            let count: usize = row.get(1).storage("Failed to read count")?;
            match Direction::parse(&direction) {
                Ok(Direction::Left) => left_routes = count,
                Ok(Direction::Right) => right_routes = count,
                Err(_) => tracing::warn!("Ignoring unknown direction '{}'", direction),
            }
        }

        Ok(RouteStats {
            airport_count,
            route_count,
            left_routes,
            right_routes,
        })
    }

    fn query_airports(&self, sql: &str, params: &[&dyn ToSql]) -> Result<Vec<Airport>> {
        let conn = self.acquire_conn();
        let mut stmt = conn
            .prepare(sql)
            .storage_with(|| format!("Failed to prepare query: {}", sql))?;
        let rows = stmt
            .query_map(params, |row| {
                Ok(Airport {
                    id: AirportId(row.get(0)?),
                    name: row.get(1)?,
                })
            })
            .storage("Failed to query airports")?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .storage("Failed to read airport row")
    }

    fn query_routes(&self, sql: &str, params: &[&dyn ToSql]) -> Result<Vec<Route>> {
        let conn = self.acquire_conn();
        let mut stmt = conn
            .prepare(sql)
            .storage_with(|| format!("Failed to prepare query: {}", sql))?;
        let rows = stmt
            .query_map(params, read_route_row)
            .storage("Failed to query routes")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .storage("Failed to read route row")?;
        rows.into_iter().map(route_from_row).collect()
    }

    fn count(&self, sql: &str) -> Result<usize> {
        let conn = self.acquire_conn();
        conn.query_row(sql, [], |row| row.get(0))
            .storage_with(|| format!("Failed to count: {}", sql))
    }
}

impl RouteStore for RouteBase {
    fn create_airport(&self, name: &str) -> Result<Airport> {
        let name = normalize_name(name)?;

        let mut conn = self.acquire_conn();
        let tx = conn.transaction().storage("Failed to begin transaction")?;

        let existing: Option<i64> = tx
            .query_row(
                "SELECT id FROM airports WHERE name = ?",
                params![name],
                |row| row.get(0),
            )
            .optional()
            .storage("Failed to check airport name")?;
        if existing.is_some() {
            return Err(AirtreeError::DuplicateName { name });
        }

        let id: i64 = tx
            .query_row(
                "INSERT INTO airports (name) VALUES (?) RETURNING id",
                params![name],
                |row| row.get(0),
            )
            .storage_with(|| format!("Failed to insert airport: {}", name))?;
        tx.commit().storage("Failed to commit airport")?;

        tracing::info!("Created airport {} ({})", name, id);
        Ok(Airport {
            id: AirportId(id),
            name,
        })
    }

    fn get_airport(&self, id: AirportId) -> Result<Option<Airport>> {
        let conn = self.acquire_conn();
        conn.query_row(
            "SELECT id, name FROM airports WHERE id = ?",
            params![id.0],
            |row| {
                Ok(Airport {
                    id: AirportId(row.get(0)?),
                    name: row.get(1)?,
                })
            },
        )
        .optional()
        .storage_with(|| format!("Failed to get airport: {}", id))
    }

    fn list_airports(&self) -> Result<Vec<Airport>> {
        self.query_airports("SELECT id, name FROM airports ORDER BY name", &[])
    }

    fn search_airports(&self, fragment: &str) -> Result<Vec<Airport>> {
        let fragment = fragment.trim().to_string();
        self.query_airports(
            "SELECT id, name FROM airports WHERE contains(lower(name), lower(?)) ORDER BY name",
            &[&fragment],
        )
    }

    fn delete_airport(&self, id: AirportId) -> Result<usize> {
        let mut conn = self.acquire_conn();
        let tx = conn.transaction().storage("Failed to begin transaction")?;

        let name: Option<String> = tx
            .query_row(
                "SELECT name FROM airports WHERE id = ?",
                params![id.0],
                |row| row.get(0),
            )
            .optional()
            .storage("Failed to look up airport")?;
        let name = name.ok_or_else(|| AirtreeError::airport_not_found(id))?;

        // Routes first, then the airport they reference.
        let removed = tx
            .execute(
                "DELETE FROM routes WHERE parent_id = ? OR child_id = ?",
                params![id.0, id.0],
            )
            .storage_with(|| format!("Failed to delete routes for airport: {}", id))?;
        tx.execute("DELETE FROM airports WHERE id = ?", params![id.0])
            .storage_with(|| format!("Failed to delete airport: {}", id))?;
        tx.commit().storage("Failed to commit airport deletion")?;

        tracing::info!("Deleted airport {} ({}) and {} routes", name, id, removed);
        Ok(removed)
    }

    fn create_route(&self, request: &NewRoute) -> Result<Route> {
        let duration = request.validate()?;

        let mut conn = self.acquire_conn();
        let tx = conn.transaction().storage("Failed to begin transaction")?;

        let parent_name: Option<String> = tx
            .query_row(
                "SELECT name FROM airports WHERE id = ?",
                params![request.parent_id.0],
                |row| row.get(0),
            )
            .optional()
            .storage("Failed to look up parent airport")?;
        let parent_name =
            parent_name.ok_or_else(|| AirtreeError::airport_not_found(request.parent_id))?;

        let child_count: usize = tx
            .query_row(
                "SELECT COUNT(*) FROM airports WHERE id = ?",
                params![request.child_id.0],
                |row| row.get(0),
            )
            .storage("Failed to look up child airport")?;
        if child_count == 0 {
            return Err(AirtreeError::airport_not_found(request.child_id));
        }

        let taken: Option<i64> = tx
            .query_row(
                "SELECT id FROM routes WHERE parent_id = ? AND direction = ?",
                params![request.parent_id.0, request.direction.as_str()],
                |row| row.get(0),
            )
            .optional()
            .storage("Failed to check route position")?;
        if taken.is_some() {
            return Err(AirtreeError::DuplicatePosition {
                parent: request.parent_id,
                parent_name,
                direction: request.direction,
            });
        }

        let id: i64 = tx
            .query_row(
                "INSERT INTO routes (parent_id, child_id, direction, duration)
                 VALUES (?, ?, ?, ?) RETURNING id",
                params![
                    request.parent_id.0,
                    request.child_id.0,
                    request.direction.as_str(),
                    i64::from(duration),
                ],
                |row| row.get(0),
            )
            .storage("Failed to insert route")?;
        tx.commit().storage("Failed to commit route")?;

        tracing::info!(
            "Created route {}: {} -> {} ({}, {} min)",
            id,
            request.parent_id,
            request.child_id,
            request.direction.label(),
            duration
        );
        Ok(Route {
            id: RouteId(id),
            parent_id: request.parent_id,
            child_id: request.child_id,
            direction: request.direction,
            duration,
        })
    }

    fn find_route(&self, parent: AirportId, direction: Direction) -> Result<Option<Route>> {
        let sql = format!(
            "SELECT {} FROM routes r WHERE r.parent_id = ? AND r.direction = ?",
            ROUTE_COLUMNS
        );
        let direction = direction.as_str();
        Ok(self
            .query_routes(&sql, &[&parent.0, &direction])?
            .into_iter()
            .next())
    }

    fn list_routes(&self) -> Result<Vec<Route>> {
        let sql = format!("SELECT {} FROM routes r ORDER BY r.id", ROUTE_COLUMNS);
        self.query_routes(&sql, &[])
    }

    fn airport_count(&self) -> Result<usize> {
        self.count("SELECT COUNT(*) FROM airports")
    }

    fn route_count(&self) -> Result<usize> {
        self.count("SELECT COUNT(*) FROM routes")
    }

    fn list_routes_by_parent(&self) -> Result<Vec<Route>> {
        let sql = format!(
            "SELECT {} FROM routes r JOIN airports p ON p.id = r.parent_id
             ORDER BY p.name, r.direction",
            ROUTE_COLUMNS
        );
        self.query_routes(&sql, &[])
    }

    fn recent_routes(&self, limit: usize) -> Result<Vec<Route>> {
        let sql = format!(
            "SELECT {} FROM routes r ORDER BY r.id DESC LIMIT ?",
            ROUTE_COLUMNS
        );
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.query_routes(&sql, &[&limit])
    }

    fn extremal_route(&self, kind: Extremum) -> Result<Option<Route>> {
        // Ties resolve to the lowest id, i.e. the earliest created route.
        let order = match kind {
            Extremum::Max => "r.duration DESC, r.id ASC",
            Extremum::Min => "r.duration ASC, r.id ASC",
        };
        let sql = format!(
            "SELECT {} FROM routes r ORDER BY {} LIMIT 1",
            ROUTE_COLUMNS, order
        );
        Ok(self.query_routes(&sql, &[])?.into_iter().next())
    }
}
