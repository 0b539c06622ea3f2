// Data models: Rust structs that map to database rows.
//
// Kept separate from the queries so the monitor and the CLI can use them
// without depending on rusqlite directly.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::detection::models::AnalyzedReport;
use crate::output::export::CsvRecord;

/// Timestamps are stored as second-precision RFC 3339 in UTC so they sort
/// correctly as text.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// An analyzed hazard report as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredReport {
    pub id: String,
    pub source: String,
    pub description: String,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timestamp: String,
    pub severity: String,
    pub hazards: Vec<String>,
    pub confidence: f64,
    pub priority: f64,
    pub alert_level: String,
    pub keywords: Vec<String>,
    pub sentiment: Option<String>,
    pub analyzed_at: String,
}

impl StoredReport {
    pub fn from_analyzed(analyzed: &AnalyzedReport) -> Self {
        let report = &analyzed.report;
        Self {
            id: report.id.clone(),
            source: report.source.clone(),
            description: report.description().to_string(),
            location: analyzed.primary_location().map(str::to_string),
            latitude: report.latitude,
            longitude: report.longitude,
            timestamp: format_timestamp(report.timestamp),
            severity: analyzed.severity.to_string(),
            hazards: analyzed.hazards.iter().map(|h| h.kind.to_string()).collect(),
            confidence: analyzed.confidence,
            priority: analyzed.priority,
            alert_level: analyzed.alert_level.to_string(),
            keywords: analyzed.keywords.iter().map(|k| k.keyword.clone()).collect(),
            sentiment: Some(format!("{:?}", analyzed.sentiment.label).to_lowercase()),
            analyzed_at: format_timestamp(analyzed.analyzed_at),
        }
    }
}

impl CsvRecord for StoredReport {
    fn headers() -> &'static [&'static str] {
        &[
            "id",
            "source",
            "timestamp",
            "severity",
            "hazards",
            "priority",
            "alert_level",
            "confidence",
            "location",
            "latitude",
            "longitude",
            "description",
        ]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.source.clone(),
            self.timestamp.clone(),
            self.severity.clone(),
            self.hazards.join("; "),
            format!("{:.1}", self.priority),
            self.alert_level.clone(),
            format!("{:.2}", self.confidence),
            self.location.clone().unwrap_or_default(),
            self.latitude.map(|v| v.to_string()).unwrap_or_default(),
            self.longitude.map(|v| v.to_string()).unwrap_or_default(),
            self.description.clone(),
        ]
    }
}

/// Outcome of one refresh of the collection pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionRun {
    /// Assigned by the database; ignored on insert
    pub id: i64,
    pub started_at: String,
    pub finished_at: String,
    /// Raw items collected across all sources
    pub collected: u32,
    /// Items that contained at least one hazard
    pub hazards: u32,
    /// Sources that failed during the run
    pub errors: u32,
    pub error: Option<String>,
}

/// Stored report counts per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportCounts {
    pub total: u32,
    pub high: u32,
    pub medium: u32,
    pub low: u32,
    pub unknown: u32,
}
