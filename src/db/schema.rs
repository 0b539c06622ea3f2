// Database schema: table creation.
//
// A `schema_version` table records which schema revisions have been
// applied so later column additions can run as guarded migrations.

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Create all tables if they don't exist yet.
///
/// This is idempotent, safe to call on every startup.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- One row per analyzed report; re-analysis updates the row in place
        CREATE TABLE IF NOT EXISTS hazard_reports (
            id TEXT PRIMARY KEY,
            source TEXT NOT NULL,
            description TEXT NOT NULL,
            location TEXT,
            latitude REAL,
            longitude REAL,
            timestamp TEXT NOT NULL,           -- RFC 3339, UTC
            severity TEXT NOT NULL,            -- high / medium / low / unknown
            hazards TEXT NOT NULL,             -- JSON array of hazard kinds
            confidence REAL NOT NULL,          -- 0.0 to 0.99
            priority REAL NOT NULL,            -- 0.0 to 100.0
            alert_level TEXT NOT NULL,
            keywords TEXT NOT NULL,            -- JSON array of keywords
            sentiment TEXT,                    -- positive / negative
            analyzed_at TEXT NOT NULL,
            first_seen TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- One row per refresh of the collection pipeline
        CREATE TABLE IF NOT EXISTS collection_runs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            started_at TEXT NOT NULL,
            finished_at TEXT NOT NULL,
            collected INTEGER NOT NULL,
            hazards INTEGER NOT NULL,
            errors INTEGER NOT NULL,
            error TEXT
        );

        -- Free-form key/value state (last refresh time, cursors)
        CREATE TABLE IF NOT EXISTS scan_state (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_reports_timestamp
            ON hazard_reports(timestamp);

        CREATE INDEX IF NOT EXISTS idx_reports_severity
            ON hazard_reports(severity);
        ",
    )
    .context("Failed to create database tables")?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [1],
    )?;

    Ok(())
}

/// Count the number of tables in the database (useful for init confirmation).
pub fn table_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tables_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        create_tables(&conn).unwrap();

        let versions: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(versions, 1);
    }

    #[test]
    fn test_table_count() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        // schema_version, hazard_reports, collection_runs, scan_state
        assert_eq!(table_count(&conn).unwrap(), 4i64);
    }
}
