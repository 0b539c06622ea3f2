// Database queries: CRUD operations for all tables.
//
// Every database interaction goes through this module. This keeps SQL
// contained in one place and gives the rest of the app clean Rust interfaces.

use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::models::{CollectionRun, ReportCounts, StoredReport};

// --- Scan state ---

/// Get a scan state value by key (e.g., "last_refresh_at").
pub fn get_scan_state(conn: &Connection, key: &str) -> Result<Option<String>> {
    let mut stmt = conn.prepare("SELECT value FROM scan_state WHERE key = ?1")?;
    let result = stmt.query_row(params![key], |row| row.get(0)).optional()?;
    Ok(result)
}

/// Set a scan state value (upsert).
pub fn set_scan_state(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO scan_state (key, value, updated_at)
         VALUES (?1, ?2, datetime('now'))
         ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
        params![key, value],
    )?;
    Ok(())
}

// --- Hazard reports ---

/// Save or update an analyzed report, keyed by report id.
pub fn upsert_report(conn: &Connection, report: &StoredReport) -> Result<()> {
    let hazards_json = serde_json::to_string(&report.hazards)?;
    let keywords_json = serde_json::to_string(&report.keywords)?;
    conn.execute(
        "INSERT INTO hazard_reports (id, source, description, location, latitude, longitude,
                                     timestamp, severity, hazards, confidence, priority,
                                     alert_level, keywords, sentiment, analyzed_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
         ON CONFLICT(id) DO UPDATE SET
            source = ?2,
            description = ?3,
            location = ?4,
            latitude = ?5,
            longitude = ?6,
            timestamp = ?7,
            severity = ?8,
            hazards = ?9,
            confidence = ?10,
            priority = ?11,
            alert_level = ?12,
            keywords = ?13,
            sentiment = ?14,
            analyzed_at = ?15",
        params![
            report.id,
            report.source,
            report.description,
            report.location,
            report.latitude,
            report.longitude,
            report.timestamp,
            report.severity,
            hazards_json,
            report.confidence,
            report.priority,
            report.alert_level,
            keywords_json,
            report.sentiment,
            report.analyzed_at,
        ],
    )?;
    Ok(())
}

/// Upsert a batch of reports in one transaction. Returns the number written.
pub fn upsert_reports(conn: &Connection, reports: &[StoredReport]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    for report in reports {
        upsert_report(&tx, report)?;
    }
    tx.commit()?;
    Ok(reports.len())
}

const REPORT_COLUMNS: &str = "id, source, description, location, latitude, longitude, timestamp,
     severity, hazards, confidence, priority, alert_level, keywords, sentiment, analyzed_at";

fn report_from_row(row: &Row<'_>) -> rusqlite::Result<StoredReport> {
    let hazards_json: String = row.get(8)?;
    let keywords_json: String = row.get(12)?;
    Ok(StoredReport {
        id: row.get(0)?,
        source: row.get(1)?,
        description: row.get(2)?,
        location: row.get(3)?,
        latitude: row.get(4)?,
        longitude: row.get(5)?,
        timestamp: row.get(6)?,
        severity: row.get(7)?,
        hazards: serde_json::from_str(&hazards_json).unwrap_or_default(),
        confidence: row.get(9)?,
        priority: row.get(10)?,
        alert_level: row.get(11)?,
        keywords: serde_json::from_str(&keywords_json).unwrap_or_default(),
        sentiment: row.get(13)?,
        analyzed_at: row.get(14)?,
    })
}

/// Most recent reports first.
pub fn get_recent_reports(conn: &Connection, limit: u32) -> Result<Vec<StoredReport>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {REPORT_COLUMNS}
         FROM hazard_reports
         ORDER BY timestamp DESC, priority DESC
         LIMIT ?1"
    ))?;

    let rows = stmt.query_map(params![limit], report_from_row)?;

    let mut reports = Vec::new();
    for row in rows {
        reports.push(row?);
    }
    Ok(reports)
}

/// Most recent reports of one severity level first.
pub fn get_reports_by_severity(
    conn: &Connection,
    severity: &str,
    limit: u32,
) -> Result<Vec<StoredReport>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {REPORT_COLUMNS}
         FROM hazard_reports
         WHERE severity = ?1
         ORDER BY timestamp DESC, priority DESC
         LIMIT ?2"
    ))?;

    let rows = stmt.query_map(params![severity, limit], report_from_row)?;

    let mut reports = Vec::new();
    for row in rows {
        reports.push(row?);
    }
    Ok(reports)
}

/// Keep only the `keep` newest reports. Returns the number deleted.
pub fn prune_reports(conn: &Connection, keep: u32) -> Result<usize> {
    let deleted = conn.execute(
        "DELETE FROM hazard_reports
         WHERE id NOT IN (
             SELECT id FROM hazard_reports ORDER BY timestamp DESC, priority DESC LIMIT ?1
         )",
        params![keep],
    )?;
    Ok(deleted)
}

/// Stored report counts per severity.
pub fn report_counts(conn: &Connection) -> Result<ReportCounts> {
    let mut stmt = conn.prepare("SELECT severity, COUNT(*) FROM hazard_reports GROUP BY severity")?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?)))?;

    let mut counts = ReportCounts::default();
    for row in rows {
        let (severity, count) = row?;
        match severity.as_str() {
            "high" => counts.high = count,
            "medium" => counts.medium = count,
            "low" => counts.low = count,
            _ => counts.unknown += count,
        }
        counts.total += count;
    }
    Ok(counts)
}

// --- Collection runs ---

/// Record a finished collection run and return its ID.
pub fn record_collection_run(conn: &Connection, run: &CollectionRun) -> Result<i64> {
    conn.execute(
        "INSERT INTO collection_runs (started_at, finished_at, collected, hazards, errors, error)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            run.started_at,
            run.finished_at,
            run.collected,
            run.hazards,
            run.errors,
            run.error,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Most recent collection runs first.
pub fn get_recent_runs(conn: &Connection, limit: u32) -> Result<Vec<CollectionRun>> {
    let mut stmt = conn.prepare(
        "SELECT id, started_at, finished_at, collected, hazards, errors, error
         FROM collection_runs
         ORDER BY id DESC
         LIMIT ?1",
    )?;

    let rows = stmt.query_map(params![limit], |row| {
        Ok(CollectionRun {
            id: row.get(0)?,
            started_at: row.get(1)?,
            finished_at: row.get(2)?,
            collected: row.get(3)?,
            hazards: row.get(4)?,
            errors: row.get(5)?,
            error: row.get(6)?,
        })
    })?;

    let mut runs = Vec::new();
    for row in rows {
        runs.push(row?);
    }
    Ok(runs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::create_tables;

    fn test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        conn
    }

    fn report(id: &str, timestamp: &str, severity: &str, priority: f64) -> StoredReport {
        StoredReport {
            id: id.to_string(),
            source: "citizen_report".to_string(),
            description: format!("report {id}"),
            location: Some("Coastal City".to_string()),
            latitude: Some(40.7128),
            longitude: Some(-74.006),
            timestamp: timestamp.to_string(),
            severity: severity.to_string(),
            hazards: vec!["high_waves".to_string()],
            confidence: 0.65,
            priority,
            alert_level: "warning".to_string(),
            keywords: vec!["wave".to_string(), "beach".to_string()],
            sentiment: Some("negative".to_string()),
            analyzed_at: "2024-06-01T12:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_scan_state_roundtrip() {
        let conn = test_db();
        assert_eq!(get_scan_state(&conn, "last_refresh_at").unwrap(), None);

        set_scan_state(&conn, "last_refresh_at", "2024-06-01T12:00:00Z").unwrap();
        assert_eq!(
            get_scan_state(&conn, "last_refresh_at").unwrap(),
            Some("2024-06-01T12:00:00Z".to_string())
        );

        // Upsert overwrites
        set_scan_state(&conn, "last_refresh_at", "2024-06-01T13:00:00Z").unwrap();
        assert_eq!(
            get_scan_state(&conn, "last_refresh_at").unwrap(),
            Some("2024-06-01T13:00:00Z".to_string())
        );
    }

    #[test]
    fn test_report_upsert_updates_in_place() {
        let conn = test_db();
        upsert_report(&conn, &report("r1", "2024-06-01T10:00:00Z", "medium", 40.0)).unwrap();
        upsert_report(&conn, &report("r1", "2024-06-01T10:00:00Z", "high", 80.0)).unwrap();

        let reports = get_recent_reports(&conn, 10).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].severity, "high");
        assert_eq!(reports[0].priority, 80.0);
        assert_eq!(reports[0].hazards, vec!["high_waves".to_string()]);
        assert_eq!(reports[0].keywords.len(), 2);
    }

    #[test]
    fn test_recent_reports_newest_first_with_limit() {
        let conn = test_db();
        let batch = vec![
            report("old", "2024-06-01T08:00:00Z", "low", 20.0),
            report("new", "2024-06-01T12:00:00Z", "low", 20.0),
            report("mid", "2024-06-01T10:00:00Z", "low", 20.0),
        ];
        assert_eq!(upsert_reports(&conn, &batch).unwrap(), 3);

        let ids: Vec<String> = get_recent_reports(&conn, 2)
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["new".to_string(), "mid".to_string()]);
    }

    #[test]
    fn test_reports_by_severity() {
        let conn = test_db();
        upsert_report(&conn, &report("a", "2024-06-01T08:00:00Z", "high", 90.0)).unwrap();
        upsert_report(&conn, &report("b", "2024-06-01T09:00:00Z", "low", 20.0)).unwrap();
        upsert_report(&conn, &report("c", "2024-06-01T10:00:00Z", "high", 85.0)).unwrap();

        let high = get_reports_by_severity(&conn, "high", 10).unwrap();
        let ids: Vec<&str> = high.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);
    }

    #[test]
    fn test_prune_keeps_newest() {
        let conn = test_db();
        for hour in 0..5 {
            let ts = format!("2024-06-01T0{hour}:00:00Z");
            upsert_report(&conn, &report(&format!("r{hour}"), &ts, "low", 10.0)).unwrap();
        }

        assert_eq!(prune_reports(&conn, 2).unwrap(), 3);
        let ids: Vec<String> = get_recent_reports(&conn, 10)
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["r4".to_string(), "r3".to_string()]);
    }

    #[test]
    fn test_report_counts() {
        let conn = test_db();
        upsert_report(&conn, &report("a", "2024-06-01T08:00:00Z", "high", 90.0)).unwrap();
        upsert_report(&conn, &report("b", "2024-06-01T09:00:00Z", "high", 80.0)).unwrap();
        upsert_report(&conn, &report("c", "2024-06-01T10:00:00Z", "low", 20.0)).unwrap();
        upsert_report(&conn, &report("d", "2024-06-01T11:00:00Z", "unknown", 5.0)).unwrap();

        let counts = report_counts(&conn).unwrap();
        assert_eq!(
            counts,
            ReportCounts {
                total: 4,
                high: 2,
                medium: 0,
                low: 1,
                unknown: 1,
            }
        );
    }

    #[test]
    fn test_collection_runs() {
        let conn = test_db();
        let run = CollectionRun {
            id: 0,
            started_at: "2024-06-01T12:00:00Z".to_string(),
            finished_at: "2024-06-01T12:00:02Z".to_string(),
            collected: 9,
            hazards: 7,
            errors: 1,
            error: Some("social_media: upstream unavailable".to_string()),
        };
        let first = record_collection_run(&conn, &run).unwrap();
        let second = record_collection_run(
            &conn,
            &CollectionRun {
                errors: 0,
                error: None,
                ..run.clone()
            },
        )
        .unwrap();
        assert!(second > first);

        let runs = get_recent_runs(&conn, 10).unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].id, second);
        assert_eq!(runs[0].error, None);
        assert_eq!(runs[1].collected, 9);
        assert_eq!(runs[1].errors, 1);
    }
}
