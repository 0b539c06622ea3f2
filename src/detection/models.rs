// Detection data models: hazard kinds, severity levels, alert levels and
// the analyzed report that flows into the dashboard and the database.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::nlp::keywords::Keyword;
use crate::nlp::sentiment::Sentiment;
use crate::output::export::CsvRecord;
use crate::sources::models::RawReport;

/// The ocean hazard categories the detector recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardKind {
    Flood,
    StormSurge,
    Tsunami,
    HighWaves,
    Erosion,
    MarinePollution,
    HarmfulAlgalBloom,
    CoastalStorm,
}

impl HazardKind {
    pub const ALL: [HazardKind; 8] = [
        HazardKind::Flood,
        HazardKind::StormSurge,
        HazardKind::Tsunami,
        HazardKind::HighWaves,
        HazardKind::Erosion,
        HazardKind::MarinePollution,
        HazardKind::HarmfulAlgalBloom,
        HazardKind::CoastalStorm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HazardKind::Flood => "flood",
            HazardKind::StormSurge => "storm_surge",
            HazardKind::Tsunami => "tsunami",
            HazardKind::HighWaves => "high_waves",
            HazardKind::Erosion => "erosion",
            HazardKind::MarinePollution => "marine_pollution",
            HazardKind::HarmfulAlgalBloom => "harmful_algal_bloom",
            HazardKind::CoastalStorm => "coastal_storm",
        }
    }

    /// Icon shown next to the hazard name in the dashboard table.
    pub fn icon(&self) -> &'static str {
        match self {
            HazardKind::Flood => "🚨",
            HazardKind::StormSurge => "🌊",
            HazardKind::Tsunami => "🌊⚡",
            HazardKind::HighWaves => "🌊",
            HazardKind::Erosion => "🏖️",
            HazardKind::MarinePollution => "🚮",
            HazardKind::HarmfulAlgalBloom => "🟢",
            HazardKind::CoastalStorm => "⛈️",
        }
    }
}

impl fmt::Display for HazardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HazardKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        HazardKind::ALL
            .into_iter()
            .find(|k| k.as_str() == normalized)
            .ok_or_else(|| anyhow::anyhow!("Unknown hazard type: {s}"))
    }
}

/// How serious a report is, judged from its wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
    #[default]
    Unknown,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Unknown => "unknown",
        }
    }

    /// Dashboard color for this severity.
    pub fn color(&self) -> &'static str {
        match self {
            Severity::High => "#dc3545",
            Severity::Medium => "#ffc107",
            Severity::Low => "#17a2b8",
            Severity::Unknown => "#6c757d",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Severity::High),
            "medium" => Ok(Severity::Medium),
            "low" => Ok(Severity::Low),
            "unknown" => Ok(Severity::Unknown),
            other => anyhow::bail!("Unknown severity: {other}"),
        }
    }
}

/// Alert level derived from the 0-100 priority score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Info,
    Advisory,
    Warning,
    Critical,
}

impl AlertLevel {
    pub fn from_priority(score: f64) -> Self {
        match score {
            s if s >= 75.0 => AlertLevel::Critical,
            s if s >= 50.0 => AlertLevel::Warning,
            s if s >= 25.0 => AlertLevel::Advisory,
            _ => AlertLevel::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Info => "info",
            AlertLevel::Advisory => "advisory",
            AlertLevel::Warning => "warning",
            AlertLevel::Critical => "critical",
        }
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detected hazard and the terms that triggered it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardMatch {
    pub kind: HazardKind,
    pub terms: Vec<String>,
}

/// A report after the full analysis pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzedReport {
    pub report: RawReport,
    pub hazards: Vec<HazardMatch>,
    pub severity: Severity,
    /// 0.0 (no hazard evidence) to 0.99
    pub confidence: f64,
    pub locations: Vec<String>,
    pub keywords: Vec<Keyword>,
    pub sentiment: Sentiment,
    /// 0-100 urgency score used for ordering
    pub priority: f64,
    pub alert_level: AlertLevel,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalyzedReport {
    pub fn is_hazard(&self) -> bool {
        !self.hazards.is_empty()
    }

    pub fn hazard_kinds(&self) -> Vec<HazardKind> {
        self.hazards.iter().map(|h| h.kind).collect()
    }

    /// The report's own location if it has one, else the first one found in the text.
    pub fn primary_location(&self) -> Option<&str> {
        self.report
            .location
            .as_deref()
            .or_else(|| self.locations.first().map(String::as_str))
    }
}

impl CsvRecord for AnalyzedReport {
    fn headers() -> &'static [&'static str] {
        &[
            "id",
            "source",
            "timestamp",
            "description",
            "hazards",
            "severity",
            "confidence",
            "locations",
            "keywords",
            "sentiment",
            "priority",
            "alert_level",
        ]
    }

    fn fields(&self) -> Vec<String> {
        let join = |items: Vec<String>| items.join("; ");
        vec![
            self.report.id.clone(),
            self.report.source.clone(),
            self.report.timestamp.to_rfc3339(),
            self.report.description().to_string(),
            join(self.hazards.iter().map(|h| h.kind.to_string()).collect()),
            self.severity.to_string(),
            format!("{:.2}", self.confidence),
            join(self.locations.clone()),
            join(self.keywords.iter().map(|k| k.keyword.clone()).collect()),
            format!("{:?}", self.sentiment.label).to_lowercase(),
            format!("{:.1}", self.priority),
            self.alert_level.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hazard_kind_parses_loosely() {
        assert_eq!("Storm Surge".parse::<HazardKind>().unwrap(), HazardKind::StormSurge);
        assert_eq!(
            "harmful-algal-bloom".parse::<HazardKind>().unwrap(),
            HazardKind::HarmfulAlgalBloom
        );
        assert!("volcano".parse::<HazardKind>().is_err());
    }

    #[test]
    fn hazard_kind_serializes_snake_case() {
        let json = serde_json::to_string(&HazardKind::HighWaves).unwrap();
        assert_eq!(json, "\"high_waves\"");
    }

    #[test]
    fn alert_level_boundaries() {
        assert_eq!(AlertLevel::from_priority(75.0), AlertLevel::Critical);
        assert_eq!(AlertLevel::from_priority(74.99), AlertLevel::Warning);
        assert_eq!(AlertLevel::from_priority(50.0), AlertLevel::Warning);
        assert_eq!(AlertLevel::from_priority(25.0), AlertLevel::Advisory);
        assert_eq!(AlertLevel::from_priority(0.0), AlertLevel::Info);
    }
}
