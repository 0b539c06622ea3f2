// HazardDetector: turns a raw report into an analyzed, scored report.
//
// Detection is rule-based: hazard kinds come from keyword patterns, severity
// from indicator words, locations from capitalized place-name patterns.
// Declared metadata from the source (a citizen's chosen hazard type and
// severity) is merged in as a fallback, never as an override of the text.

use chrono::{DateTime, Utc};
use regex_lite::Regex;
use tracing::{debug, info};

use super::models::{AlertLevel, AnalyzedReport, HazardKind, HazardMatch, Severity};
use super::patterns::{
    compile_insensitive, hazard_pattern_sources, location_pattern_sources,
    severity_indicator_sources, CompiledPattern,
};
use super::priority::{compute_priority, PriorityWeights};
use crate::nlp::NlpProcessor;
use crate::sources::models::RawReport;

pub struct HazardDetector {
    nlp: NlpProcessor,
    hazard_patterns: Vec<(HazardKind, Vec<CompiledPattern>)>,
    severity_patterns: Vec<(Severity, Vec<CompiledPattern>)>,
    location_patterns: Vec<Regex>,
    weights: PriorityWeights,
}

impl HazardDetector {
    /// Build a detector with the default priority weights.
    pub fn new() -> anyhow::Result<Self> {
        Self::with_weights(PriorityWeights::default())
    }

    pub fn with_weights(weights: PriorityWeights) -> anyhow::Result<Self> {
        let hazard_patterns = HazardKind::ALL
            .into_iter()
            .map(|kind| {
                let compiled = hazard_pattern_sources(kind)
                    .iter()
                    .map(|s| compile_insensitive(s))
                    .collect::<anyhow::Result<Vec<_>>>()?;
                Ok((kind, compiled))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let severity_patterns = [Severity::High, Severity::Medium, Severity::Low]
            .into_iter()
            .map(|level| {
                let compiled = severity_indicator_sources(level)
                    .iter()
                    .map(|s| compile_insensitive(s))
                    .collect::<anyhow::Result<Vec<_>>>()?;
                Ok((level, compiled))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let location_patterns = location_pattern_sources()
            .iter()
            .map(|s| Regex::new(s).map_err(|e| anyhow::anyhow!("Invalid location pattern: {e}")))
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Self {
            nlp: NlpProcessor::default(),
            hazard_patterns,
            severity_patterns,
            location_patterns,
            weights,
        })
    }

    /// Every hazard kind with at least one matching pattern, in declaration
    /// order, together with the matched terms (lowercased, deduplicated).
    pub fn detect_hazards(&self, text: &str) -> Vec<HazardMatch> {
        let mut found = Vec::new();
        for (kind, patterns) in &self.hazard_patterns {
            let mut terms: Vec<String> = Vec::new();
            for pattern in patterns {
                for m in pattern.regex.find_iter(text) {
                    let term = m.as_str().to_lowercase();
                    if !terms.contains(&term) {
                        terms.push(term);
                    }
                }
            }
            if !terms.is_empty() {
                found.push(HazardMatch { kind: *kind, terms });
            }
        }
        found
    }

    /// Highest severity level with at least one indicator in the text.
    pub fn assess_severity(&self, text: &str) -> Severity {
        self.severity_patterns
            .iter()
            .find(|(_, patterns)| patterns.iter().any(|p| p.regex.is_match(text)))
            .map(|(level, _)| *level)
            .unwrap_or(Severity::Unknown)
    }

    /// Distinct place names in order of first appearance.
    pub fn extract_locations(&self, text: &str) -> Vec<String> {
        let mut hits: Vec<(usize, String)> = Vec::new();
        for pattern in &self.location_patterns {
            for caps in pattern.captures_iter(text) {
                if let Some(m) = caps.get(1) {
                    hits.push((m.start(), m.as_str().trim().to_string()));
                }
            }
        }
        hits.sort_by_key(|(start, _)| *start);

        let mut locations: Vec<String> = Vec::new();
        for (_, name) in hits {
            if !name.is_empty() && !locations.contains(&name) {
                locations.push(name);
            }
        }
        locations
    }

    /// Analyze a report using the current time for recency scoring.
    pub fn analyze_report(&self, report: &RawReport) -> AnalyzedReport {
        self.analyze_report_at(report, Utc::now())
    }

    /// Analyze a report as of `now`.
    pub fn analyze_report_at(&self, report: &RawReport, now: DateTime<Utc>) -> AnalyzedReport {
        let text = report.analysis_text();

        let mut hazards = self.detect_hazards(&text);
        let reported_kind = report
            .reported_type
            .as_deref()
            .and_then(|t| t.parse::<HazardKind>().ok());
        let reported_agrees = reported_kind.is_some_and(|k| hazards.iter().any(|h| h.kind == k));
        if let Some(kind) = reported_kind {
            if !reported_agrees {
                hazards.push(HazardMatch {
                    kind,
                    terms: Vec::new(),
                });
                hazards.sort_by_key(|h| h.kind);
            }
        }

        let mut severity = self.assess_severity(&text);
        if severity == Severity::Unknown {
            severity = report.reported_severity.unwrap_or(Severity::Unknown);
        }

        let mut locations = self.extract_locations(&text);
        if locations.is_empty() {
            if let Some(ref loc) = report.location {
                locations.push(loc.clone());
            }
        }

        let confidence = compute_confidence(&hazards, !locations.is_empty(), reported_agrees);
        let processed = self.nlp.process(&text);

        let mut analyzed = AnalyzedReport {
            report: report.clone(),
            hazards,
            severity,
            confidence,
            locations,
            keywords: processed.keywords,
            sentiment: processed.sentiment,
            priority: 0.0,
            alert_level: AlertLevel::Info,
            analyzed_at: now,
        };
        analyzed.priority = compute_priority(&analyzed, &self.weights, now);
        analyzed.alert_level = AlertLevel::from_priority(analyzed.priority);

        debug!(
            id = %report.id,
            hazards = analyzed.hazards.len(),
            severity = %analyzed.severity,
            priority = analyzed.priority,
            "Analyzed report"
        );
        analyzed
    }

    /// Analyze every report in input order.
    pub fn analyze_batch_reports(&self, reports: &[RawReport]) -> Vec<AnalyzedReport> {
        let now = Utc::now();
        let analyzed: Vec<AnalyzedReport> = reports
            .iter()
            .map(|r| self.analyze_report_at(r, now))
            .collect();
        info!(
            reports = analyzed.len(),
            hazards = analyzed.iter().filter(|a| a.is_hazard()).count(),
            "Analyzed report batch"
        );
        analyzed
    }

    /// Keep only hazard reports, most urgent first; ties go to the newest.
    pub fn prioritize_reports(&self, analyzed: Vec<AnalyzedReport>) -> Vec<AnalyzedReport> {
        prioritize(analyzed)
    }
}

/// Ordering used by `HazardDetector::prioritize_reports`.
pub fn prioritize(analyzed: Vec<AnalyzedReport>) -> Vec<AnalyzedReport> {
    let mut hazards: Vec<AnalyzedReport> = analyzed.into_iter().filter(|a| a.is_hazard()).collect();
    hazards.sort_by(|a, b| {
        b.priority
            .partial_cmp(&a.priority)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.report.timestamp.cmp(&a.report.timestamp))
    });
    hazards
}

/// Confidence in the hazard call: more independent pattern hits, a known
/// location and a matching declared type all raise it.
pub fn compute_confidence(
    hazards: &[HazardMatch],
    has_location: bool,
    reported_agrees: bool,
) -> f64 {
    if hazards.is_empty() {
        return 0.0;
    }
    // A declared-only hazard still counts as one piece of evidence
    let hits: usize = hazards.iter().map(|h| h.terms.len().max(1)).sum();
    let mut confidence = 0.5 + 0.15 * (hits as f64 - 1.0);
    if has_location {
        confidence += 0.05;
    }
    if reported_agrees {
        confidence += 0.1;
    }
    confidence.min(0.99)
}
