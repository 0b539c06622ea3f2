// SqliteDatabase: rusqlite backend implementing the Database trait.
//
// The Connection is wrapped in tokio::sync::Mutex because Connection is !Sync.
// Trait methods lock the mutex, do synchronous rusqlite work, and return.
// The lock is never held across other .await points.

use anyhow::Result;
use async_trait::async_trait;
use rusqlite::Connection;
use tokio::sync::Mutex;

use super::models::{CollectionRun, ReportCounts, StoredReport};
use super::traits::Database;

pub struct SqliteDatabase {
    conn: Mutex<Connection>,
}

impl SqliteDatabase {
    /// Wrap an already-opened rusqlite Connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

#[async_trait]
impl Database for SqliteDatabase {
    async fn table_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::schema::table_count(&conn)
    }

    async fn get_scan_state(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().await;
        super::queries::get_scan_state(&conn, key)
    }

    async fn set_scan_state(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().await;
        super::queries::set_scan_state(&conn, key, value)
    }

    async fn upsert_report(&self, report: &StoredReport) -> Result<()> {
        let conn = self.conn.lock().await;
        super::queries::upsert_report(&conn, report)
    }

    async fn upsert_reports(&self, reports: &[StoredReport]) -> Result<usize> {
        let conn = self.conn.lock().await;
        super::queries::upsert_reports(&conn, reports)
    }

    async fn get_recent_reports(&self, limit: u32) -> Result<Vec<StoredReport>> {
        let conn = self.conn.lock().await;
        super::queries::get_recent_reports(&conn, limit)
    }

    async fn get_reports_by_severity(
        &self,
        severity: &str,
        limit: u32,
    ) -> Result<Vec<StoredReport>> {
        let conn = self.conn.lock().await;
        super::queries::get_reports_by_severity(&conn, severity, limit)
    }

    async fn prune_reports(&self, keep: u32) -> Result<usize> {
        let conn = self.conn.lock().await;
        super::queries::prune_reports(&conn, keep)
    }

    async fn report_counts(&self) -> Result<ReportCounts> {
        let conn = self.conn.lock().await;
        super::queries::report_counts(&conn)
    }

    async fn record_collection_run(&self, run: &CollectionRun) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::queries::record_collection_run(&conn, run)
    }

    async fn get_recent_runs(&self, limit: u32) -> Result<Vec<CollectionRun>> {
        let conn = self.conn.lock().await;
        super::queries::get_recent_runs(&conn, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::create_tables;

    async fn test_db() -> SqliteDatabase {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        SqliteDatabase::new(conn)
    }

    fn report(id: &str, severity: &str) -> StoredReport {
        StoredReport {
            id: id.to_string(),
            source: "news".to_string(),
            description: "Storm surge flooding the harbor".to_string(),
            location: None,
            latitude: None,
            longitude: None,
            timestamp: "2024-06-01T12:00:00Z".to_string(),
            severity: severity.to_string(),
            hazards: vec!["storm_surge".to_string(), "flood".to_string()],
            confidence: 0.8,
            priority: 70.0,
            alert_level: "warning".to_string(),
            keywords: vec![],
            sentiment: None,
            analyzed_at: "2024-06-01T12:00:01Z".to_string(),
        }
    }

    #[tokio::test]
    async fn test_trait_scan_state_roundtrip() {
        let db = test_db().await;
        assert_eq!(db.get_scan_state("k").await.unwrap(), None);
        db.set_scan_state("k", "v").await.unwrap();
        assert_eq!(db.get_scan_state("k").await.unwrap(), Some("v".to_string()));
    }

    #[tokio::test]
    async fn test_trait_table_count() {
        let db = test_db().await;
        assert_eq!(db.table_count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_trait_reports_roundtrip() {
        let db = test_db().await;
        db.upsert_reports(&[report("a", "high"), report("b", "medium")])
            .await
            .unwrap();
        db.upsert_report(&report("b", "high")).await.unwrap();

        let counts = db.report_counts().await.unwrap();
        assert_eq!(counts.total, 2);
        assert_eq!(counts.high, 2);

        let high = db.get_reports_by_severity("high", 10).await.unwrap();
        assert_eq!(high.len(), 2);
        assert_eq!(high[0].hazards, vec!["storm_surge", "flood"]);
    }

    #[tokio::test]
    async fn test_trait_collection_runs() {
        let db = test_db().await;
        let run = CollectionRun {
            id: 0,
            started_at: "2024-06-01T12:00:00Z".to_string(),
            finished_at: "2024-06-01T12:00:01Z".to_string(),
            collected: 3,
            hazards: 2,
            errors: 0,
            error: None,
        };
        let id = db.record_collection_run(&run).await.unwrap();
        let runs = db.get_recent_runs(5).await.unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].id, id);
        assert_eq!(runs[0].hazards, 2);
    }
}
