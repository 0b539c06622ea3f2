// Dashboard state and the read-only views computed from it.
//
// The monitor replaces `current` on every refresh and appends the same items
// to a bounded history. Views are computed on demand from `current`; the
// history only feeds the "seen so far" count in /api/status.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::detection::models::{AlertLevel, AnalyzedReport, HazardKind, Severity};
use crate::output::truncate_chars;

pub const DEFAULT_HISTORY_LIMIT: usize = 1000;
pub const DEFAULT_TABLE_LIMIT: usize = 20;
pub const TABLE_DESCRIPTION_CHARS: usize = 100;

/// Default map viewport (continental US).
pub const MAP_CENTER_LAT: f64 = 37.0902;
pub const MAP_CENTER_LON: f64 = -95.7129;
pub const MAP_ZOOM: u8 = 3;

/// One hazard report, flattened for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardItem {
    pub id: String,
    pub description: String,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timestamp: DateTime<Utc>,
    pub severity: Severity,
    pub hazards: Vec<HazardKind>,
    pub source: String,
    pub confidence: f64,
    pub priority: f64,
    pub alert_level: AlertLevel,
}

impl From<&AnalyzedReport> for DashboardItem {
    fn from(analyzed: &AnalyzedReport) -> Self {
        let report = &analyzed.report;
        Self {
            id: report.id.clone(),
            description: report.description().to_string(),
            location: analyzed.primary_location().unwrap_or_default().to_string(),
            latitude: report.latitude,
            longitude: report.longitude,
            timestamp: report.timestamp,
            severity: analyzed.severity,
            hazards: analyzed.hazard_kinds(),
            source: report.source.clone(),
            confidence: analyzed.confidence,
            priority: analyzed.priority,
            alert_level: analyzed.alert_level,
        }
    }
}

/// Headline counts shown at the top of the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityStats {
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HazardCount {
    pub hazard: HazardKind,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeverityCount {
    pub severity: Severity,
    pub count: usize,
    pub color: &'static str,
}

/// Bar-chart data: reports per hazard kind and per severity. Zero counts
/// are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Distribution {
    pub hazard_types: Vec<HazardCount>,
    pub severities: Vec<SeverityCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub location: String,
    pub description: String,
}

/// All markers of one severity, drawn in that severity's color.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapLayer {
    pub severity: Severity,
    pub name: String,
    pub color: &'static str,
    pub markers: Vec<MapMarker>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: u8,
    pub layers: Vec<MapLayer>,
}

/// One row of the recent-reports table, preformatted for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub id: String,
    /// HH:MM:SS (UTC)
    pub time: String,
    pub location: String,
    /// "🌊 storm_surge, 🚨 flood"
    pub hazards: String,
    pub severity: Severity,
    pub severity_color: &'static str,
    pub description: String,
}

pub struct MonitorState {
    current: Vec<DashboardItem>,
    history: VecDeque<DashboardItem>,
    history_limit: usize,
    last_updated: Option<DateTime<Utc>>,
}

impl Default for MonitorState {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl MonitorState {
    pub fn new(history_limit: usize) -> Self {
        Self {
            current: Vec::new(),
            history: VecDeque::new(),
            history_limit,
            last_updated: None,
        }
    }

    /// Replace the current items and append them to the history, dropping
    /// the oldest history entries beyond the limit.
    pub fn update(&mut self, items: Vec<DashboardItem>, now: DateTime<Utc>) {
        self.history.extend(items.iter().cloned());
        while self.history.len() > self.history_limit {
            self.history.pop_front();
        }
        self.current = items;
        self.last_updated = Some(now);
    }

    pub fn current(&self) -> &[DashboardItem] {
        &self.current
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    /// Current items matching the optional filters, in priority order.
    pub fn filtered(
        &self,
        severity: Option<Severity>,
        hazard: Option<HazardKind>,
        limit: Option<usize>,
    ) -> Vec<DashboardItem> {
        self.current
            .iter()
            .filter(|item| severity.is_none_or(|s| item.severity == s))
            .filter(|item| hazard.is_none_or(|h| item.hazards.contains(&h)))
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }

    pub fn stats(&self) -> SeverityStats {
        let count = |s: Severity| self.current.iter().filter(|i| i.severity == s).count();
        SeverityStats {
            total: self.current.len(),
            high: count(Severity::High),
            medium: count(Severity::Medium),
            low: count(Severity::Low),
        }
    }

    pub fn distribution(&self) -> Distribution {
        let hazard_types = HazardKind::ALL
            .into_iter()
            .map(|kind| HazardCount {
                hazard: kind,
                count: self
                    .current
                    .iter()
                    .filter(|i| i.hazards.contains(&kind))
                    .count(),
            })
            .filter(|c| c.count > 0)
            .collect();

        let severities = Severity::ALL
            .into_iter()
            .map(|severity| SeverityCount {
                severity,
                count: self
                    .current
                    .iter()
                    .filter(|i| i.severity == severity)
                    .count(),
                color: severity.color(),
            })
            .filter(|c| c.count > 0)
            .collect();

        Distribution {
            hazard_types,
            severities,
        }
    }

    /// Markers for items with coordinates, one layer per severity present.
    pub fn map(&self) -> MapView {
        let layers = Severity::ALL
            .into_iter()
            .filter_map(|severity| {
                let markers: Vec<MapMarker> = self
                    .current
                    .iter()
                    .filter(|i| i.severity == severity)
                    .filter_map(|i| {
                        Some(MapMarker {
                            id: i.id.clone(),
                            latitude: i.latitude?,
                            longitude: i.longitude?,
                            location: i.location.clone(),
                            description: i.description.clone(),
                        })
                    })
                    .collect();
                if markers.is_empty() {
                    return None;
                }
                let label = severity.as_str();
                let mut chars = label.chars();
                let capitalized: String = chars
                    .next()
                    .map(|c| c.to_uppercase().chain(chars).collect())
                    .unwrap_or_default();
                Some(MapLayer {
                    severity,
                    name: format!("{capitalized} Severity"),
                    color: severity.color(),
                    markers,
                })
            })
            .collect();

        MapView {
            center_lat: MAP_CENTER_LAT,
            center_lon: MAP_CENTER_LON,
            zoom: MAP_ZOOM,
            layers,
        }
    }

    /// The newest `limit` items as table rows.
    pub fn table(&self, limit: usize) -> Vec<TableRow> {
        let mut items: Vec<&DashboardItem> = self.current.iter().collect();
        items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        items
            .into_iter()
            .take(limit)
            .map(|item| TableRow {
                id: item.id.clone(),
                time: item.timestamp.format("%H:%M:%S").to_string(),
                location: item.location.clone(),
                hazards: item
                    .hazards
                    .iter()
                    .map(|h| format!("{} {}", h.icon(), h.as_str()))
                    .collect::<Vec<_>>()
                    .join(", "),
                severity: item.severity,
                severity_color: item.severity.color(),
                description: truncate_chars(&item.description, TABLE_DESCRIPTION_CHARS),
            })
            .collect()
    }
}
