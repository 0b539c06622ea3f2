// Database trait: async interface for all DB operations.
//
// Implemented by SqliteDatabase. Methods are async so the monitor and the
// web handlers can hold an `Arc<dyn Database>` without caring that rusqlite
// itself is synchronous.

use anyhow::Result;
use async_trait::async_trait;

use super::models::{CollectionRun, ReportCounts, StoredReport};

#[async_trait]
pub trait Database: Send + Sync {
    // --- Lifecycle ---

    /// Count the number of user-created tables in the database.
    async fn table_count(&self) -> Result<i64>;

    // --- Scan state ---

    /// Get a scan state value by key (e.g., "last_refresh_at").
    async fn get_scan_state(&self, key: &str) -> Result<Option<String>>;

    /// Set a scan state value (upsert).
    async fn set_scan_state(&self, key: &str, value: &str) -> Result<()>;

    // --- Hazard reports ---

    /// Save or update one analyzed report.
    async fn upsert_report(&self, report: &StoredReport) -> Result<()>;

    /// Save or update a batch of reports in one transaction.
    async fn upsert_reports(&self, reports: &[StoredReport]) -> Result<usize>;

    /// Most recent reports first.
    async fn get_recent_reports(&self, limit: u32) -> Result<Vec<StoredReport>>;

    /// Most recent reports of one severity ("high", "medium", ...) first.
    async fn get_reports_by_severity(&self, severity: &str, limit: u32)
        -> Result<Vec<StoredReport>>;

    /// Delete all but the `keep` newest reports. Returns the number deleted.
    async fn prune_reports(&self, keep: u32) -> Result<usize>;

    /// Stored report counts per severity.
    async fn report_counts(&self) -> Result<ReportCounts>;

    // --- Collection runs ---

    /// Record a finished collection run and return its ID.
    async fn record_collection_run(&self, run: &CollectionRun) -> Result<i64>;

    /// Most recent collection runs first.
    async fn get_recent_runs(&self, limit: u32) -> Result<Vec<CollectionRun>>;
}
