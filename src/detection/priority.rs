// Priority score for analyzed hazard reports.
//
// Additive 0-100 score: severity carries the most weight, then the most
// dangerous hazard kind present, then supporting signals (co-occurring
// hazards, confidence, recency). Reports without any hazard score 0 so they
// never outrank a real hazard.

use chrono::{DateTime, Utc};

use super::models::{AnalyzedReport, HazardKind, Severity};

/// Configurable weights for the priority formula.
pub struct PriorityWeights {
    pub high_severity: f64,
    pub medium_severity: f64,
    pub low_severity: f64,
    pub unknown_severity: f64,
    /// Points per extra hazard kind beyond the first
    pub extra_hazard: f64,
    /// Cap on the extra-hazard bonus
    pub extra_hazard_cap: f64,
    /// Points at confidence 1.0
    pub confidence: f64,
    /// Points for a brand-new report, decaying linearly to zero
    pub recency: f64,
    pub recency_window_hours: f64,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            high_severity: 50.0,
            medium_severity: 30.0,
            low_severity: 15.0,
            unknown_severity: 5.0,
            extra_hazard: 5.0,
            extra_hazard_cap: 10.0,
            confidence: 10.0,
            recency: 10.0,
            recency_window_hours: 24.0,
        }
    }
}

impl PriorityWeights {
    fn severity_points(&self, severity: Severity) -> f64 {
        match severity {
            Severity::High => self.high_severity,
            Severity::Medium => self.medium_severity,
            Severity::Low => self.low_severity,
            Severity::Unknown => self.unknown_severity,
        }
    }
}

/// Intrinsic danger of each hazard kind.
pub fn hazard_weight(kind: HazardKind) -> f64 {
    match kind {
        HazardKind::Tsunami => 30.0,
        HazardKind::StormSurge => 25.0,
        HazardKind::CoastalStorm => 22.0,
        HazardKind::Flood => 20.0,
        HazardKind::HighWaves => 15.0,
        HazardKind::HarmfulAlgalBloom => 12.0,
        HazardKind::MarinePollution => 12.0,
        HazardKind::Erosion => 8.0,
    }
}

/// Compute the 0-100 priority of an analyzed report as of `now`.
pub fn compute_priority(
    report: &AnalyzedReport,
    weights: &PriorityWeights,
    now: DateTime<Utc>,
) -> f64 {
    if report.hazards.is_empty() {
        return 0.0;
    }

    let strongest = report
        .hazards
        .iter()
        .map(|h| hazard_weight(h.kind))
        .fold(0.0_f64, f64::max);

    let extra =
        ((report.hazards.len() - 1) as f64 * weights.extra_hazard).min(weights.extra_hazard_cap);

    // Future timestamps (clock skew) count as brand new
    let age_hours = (now - report.report.timestamp).num_seconds().max(0) as f64 / 3600.0;
    let freshness = (1.0 - age_hours / weights.recency_window_hours).clamp(0.0, 1.0);

    let score = weights.severity_points(report.severity)
        + strongest
        + extra
        + report.confidence * weights.confidence
        + freshness * weights.recency;

    score.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::models::{AlertLevel, HazardMatch};
    use crate::nlp::sentiment::Sentiment;
    use crate::sources::models::RawReport;
    use chrono::Duration;

    fn analyzed(
        kinds: &[HazardKind],
        severity: Severity,
        confidence: f64,
        age: Duration,
    ) -> (AnalyzedReport, DateTime<Utc>) {
        let now = Utc::now();
        let mut report = RawReport::new("r", "test", "text");
        report.timestamp = now - age;
        (
            AnalyzedReport {
                report,
                hazards: kinds
                    .iter()
                    .map(|k| HazardMatch {
                        kind: *k,
                        terms: vec![k.as_str().to_string()],
                    })
                    .collect(),
                severity,
                confidence,
                locations: vec![],
                keywords: vec![],
                sentiment: Sentiment::default(),
                priority: 0.0,
                alert_level: AlertLevel::Info,
                analyzed_at: now,
            },
            now,
        )
    }

    #[test]
    fn no_hazard_scores_zero() {
        let (a, now) = analyzed(&[], Severity::High, 0.9, Duration::zero());
        assert_eq!(compute_priority(&a, &PriorityWeights::default(), now), 0.0);
    }

    #[test]
    fn fresh_high_severity_tsunami_is_capped() {
        let (a, now) = analyzed(
            &[HazardKind::Flood, HazardKind::Tsunami, HazardKind::StormSurge],
            Severity::High,
            0.99,
            Duration::zero(),
        );
        // 50 + 30 + 10 + 9.9 + 10 = 109.9 -> clamped
        assert_eq!(compute_priority(&a, &PriorityWeights::default(), now), 100.0);
    }

    #[test]
    fn recency_decays_over_window() {
        let weights = PriorityWeights::default();
        let erosion = [HazardKind::Erosion];
        let (fresh, now_a) = analyzed(&erosion, Severity::Low, 0.5, Duration::zero());
        let (half, now_b) = analyzed(&erosion, Severity::Low, 0.5, Duration::hours(12));
        let (stale, now_c) = analyzed(&erosion, Severity::Low, 0.5, Duration::days(3));

        // 15 + 8 + 5 = 28 base
        assert!((compute_priority(&fresh, &weights, now_a) - 38.0).abs() < 1e-6);
        assert!((compute_priority(&half, &weights, now_b) - 33.0).abs() < 1e-6);
        assert!((compute_priority(&stale, &weights, now_c) - 28.0).abs() < 1e-6);
    }

    #[test]
    fn severity_dominates_hazard_kind() {
        let weights = PriorityWeights::default();
        let (erosion_high, n1) =
            analyzed(&[HazardKind::Erosion], Severity::High, 0.5, Duration::zero());
        let (tsunami_low, n2) =
            analyzed(&[HazardKind::Tsunami], Severity::Low, 0.5, Duration::zero());
        assert!(
            compute_priority(&erosion_high, &weights, n1)
                > compute_priority(&tsunami_low, &weights, n2)
        );
    }
}
