//! Database schema migrations for valuenum.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, Result as SqliteResult};

/// Current schema version.
///
/// Increment this when adding new migrations.
pub const SCHEMA_VERSION: i32 = 2;

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (initial database).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            tracing::warn!("failed to read schema_version: {e}");
        }
        0
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// v1: calculation results.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS calculations (
            id               TEXT PRIMARY KEY,
            caller_id        TEXT,
            calculation_type TEXT NOT NULL,
            inputs           TEXT NOT NULL,
            value_number     REAL NOT NULL,
            recommendation   TEXT NOT NULL,
            explanation      TEXT NOT NULL,
            computed_at      TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_calculations_caller_computed
            ON calculations(caller_id, computed_at);",
    )?;
    set_schema_version(conn, 1)
}

/// v2: status-check log and concepts access leads.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS status_checks (
            id          TEXT PRIMARY KEY,
            client_name TEXT NOT NULL,
            timestamp   TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS concept_access (
            id        TEXT PRIMARY KEY,
            fullname  TEXT NOT NULL,
            email     TEXT NOT NULL,
            zip       TEXT NOT NULL,
            timestamp TEXT NOT NULL
        );",
    )?;
    set_schema_version(conn, 2)
}
