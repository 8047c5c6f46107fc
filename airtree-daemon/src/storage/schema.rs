//! Database schema definitions for airtree.
//!
//! Airports and routes live in two tables. Uniqueness of airport names and of
//! (parent, direction) pairs is enforced by table constraints in addition to
//! the checks the store performs inside its write transactions.

/// SQL schema for creating the airtree database tables.
pub const SCHEMA_SQL: &str = r#"
CREATE SEQUENCE IF NOT EXISTS airport_id_seq START 1;
CREATE SEQUENCE IF NOT EXISTS route_id_seq START 1;

-- Airports: named nodes
CREATE TABLE IF NOT EXISTS airports (
    id BIGINT PRIMARY KEY DEFAULT nextval('airport_id_seq'),
    name VARCHAR NOT NULL UNIQUE
);

-- Routes: directed Left/Right edges with a duration in minutes
CREATE TABLE IF NOT EXISTS routes (
    id BIGINT PRIMARY KEY DEFAULT nextval('route_id_seq'),
    parent_id BIGINT NOT NULL,
    child_id BIGINT NOT NULL,
    direction VARCHAR NOT NULL CHECK (direction IN ('L', 'R')),
    duration BIGINT NOT NULL CHECK (duration > 0),
    UNIQUE (parent_id, direction)
);

-- Metadata table: schema version
CREATE TABLE IF NOT EXISTS metadata (
    key VARCHAR PRIMARY KEY,
    value VARCHAR
);

CREATE INDEX IF NOT EXISTS idx_routes_child ON routes(child_id);
"#;

/// Schema version recorded in the metadata table.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Column list shared by every route query, in `RouteRow` order.
pub const ROUTE_COLUMNS: &str = "r.id, r.parent_id, r.child_id, r.direction, r.duration";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_declares_constraints() {
        assert!(SCHEMA_SQL.contains("name VARCHAR NOT NULL UNIQUE"));
        assert!(SCHEMA_SQL.contains("UNIQUE (parent_id, direction)"));
        assert!(SCHEMA_SQL.contains("CHECK (duration > 0)"));
    }
}
