// Source data models: the normalized shape every source produces.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::detection::models::Severity;
use crate::output::export::CsvRecord;

/// One incoming text item, normalized across citizen reports, social media
/// posts, news articles and agency bulletins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawReport {
    pub id: String,
    /// Where the item came from ("citizen_report", "twitter", a news outlet name, ...)
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Main body: report description, post text or article content
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    pub timestamp: DateTime<Utc>,
    /// Hazard type as declared by the reporter (citizen reports carry one)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reported_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reported_severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl RawReport {
    /// Minimal report; the remaining fields are filled by the caller.
    pub fn new(id: impl Into<String>, source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            title: None,
            text: text.into(),
            location: None,
            latitude: None,
            longitude: None,
            timestamp: Utc::now(),
            reported_type: None,
            reported_severity: None,
            author: None,
            url: None,
        }
    }

    /// The best human-readable description: the body, else the title.
    pub fn description(&self) -> &str {
        if !self.text.trim().is_empty() {
            &self.text
        } else {
            self.title.as_deref().unwrap_or("")
        }
    }

    /// Text fed to the analyzers, title and body together, since news
    /// headlines often carry the hazard term the body only implies.
    pub fn analysis_text(&self) -> String {
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() && !self.text.trim().is_empty() => {
                format!("{title}. {}", self.text)
            }
            Some(title) if !title.is_empty() => title.to_string(),
            _ => self.text.clone(),
        }
    }

    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

impl CsvRecord for RawReport {
    fn headers() -> &'static [&'static str] {
        &[
            "id",
            "source",
            "title",
            "text",
            "location",
            "latitude",
            "longitude",
            "timestamp",
            "reported_type",
            "reported_severity",
            "author",
            "url",
        ]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.source.clone(),
            self.title.clone().unwrap_or_default(),
            self.text.clone(),
            self.location.clone().unwrap_or_default(),
            self.latitude.map(|v| v.to_string()).unwrap_or_default(),
            self.longitude.map(|v| v.to_string()).unwrap_or_default(),
            self.timestamp.to_rfc3339(),
            self.reported_type.clone().unwrap_or_default(),
            self.reported_severity
                .map(|s| s.as_str().to_string())
                .unwrap_or_default(),
            self.author.clone().unwrap_or_default(),
            self.url.clone().unwrap_or_default(),
        ]
    }
}

/// Per-source collection parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectParams {
    /// Search keywords (used by the social media source)
    pub keywords: Vec<String>,
    /// Maximum number of items to return
    pub limit: Option<usize>,
    /// Only return items newer than this
    pub since: Option<DateTime<Utc>>,
}

impl CollectParams {
    /// Apply `since` and `limit` to an already-fetched list. Sources whose
    /// upstream can't filter server-side use this.
    pub fn apply(&self, mut reports: Vec<RawReport>) -> Vec<RawReport> {
        if let Some(since) = self.since {
            reports.retain(|r| r.timestamp > since);
        }
        if let Some(limit) = self.limit {
            reports.truncate(limit);
        }
        reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn description_falls_back_to_title() {
        let mut report = RawReport::new("news_1", "Coastal News Network", "");
        report.title = Some("Coastal Communities Prepare for Upcoming Storm".to_string());
        assert_eq!(report.description(), "Coastal Communities Prepare for Upcoming Storm");
    }

    #[test]
    fn analysis_text_joins_title_and_body() {
        let mut report = RawReport::new("news_1", "news", "Crews are on standby.");
        report.title = Some("Tsunami watch issued".to_string());
        assert_eq!(report.analysis_text(), "Tsunami watch issued. Crews are on standby.");
    }

    #[test]
    fn params_apply_since_then_limit() {
        let now = Utc::now();
        let reports: Vec<RawReport> = (0..5)
            .map(|i| {
                let mut r = RawReport::new(format!("r{i}"), "test", "text");
                r.timestamp = now - Duration::hours(i);
                r
            })
            .collect();

        let params = CollectParams {
            since: Some(now - Duration::minutes(150)),
            limit: Some(2),
            ..CollectParams::default()
        };
        let kept = params.apply(reports);
        let ids: Vec<&str> = kept.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r0", "r1"]);
    }
}
