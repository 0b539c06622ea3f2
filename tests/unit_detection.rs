// Behavioral tests for hazard detection and prioritization.
//
// Exercises the public HazardDetector API on realistic report wording:
// hazard kinds and matched terms, severity precedence, place-name
// extraction, declared-metadata fallback, confidence and ordering.

use chrono::{Duration, Utc};
use ohm::detection::detector::{compute_confidence, prioritize};
use ohm::detection::models::{AlertLevel, HazardKind, HazardMatch, Severity};
use ohm::detection::HazardDetector;
use ohm::sources::RawReport;

fn detector() -> HazardDetector {
    HazardDetector::new().unwrap()
}

fn kinds(text: &str) -> Vec<HazardKind> {
    detector().detect_hazards(text).iter().map(|h| h.kind).collect()
}

// ============================================================
// Hazard kinds
// ============================================================

#[test]
fn tsunami_warning_detected() {
    assert_eq!(kinds("Tsunami warning issued for the Pacific coast"), vec![HazardKind::Tsunami]);
}

#[test]
fn kinds_follow_declaration_order_not_text_order() {
    assert_eq!(
        kinds("Minor erosion but a severe storm surge is expected"),
        vec![HazardKind::StormSurge, HazardKind::Erosion]
    );
}

#[test]
fn matched_terms_are_lowercased_and_deduplicated() {
    let hazards = detector().detect_hazards("Flooding! FLOODING everywhere, flooded streets");
    assert_eq!(hazards.len(), 1);
    assert_eq!(hazards[0].kind, HazardKind::Flood);
    assert_eq!(hazards[0].terms, vec!["flooding".to_string(), "flooded".to_string()]);
}

#[test]
fn pollution_and_algal_bloom_detected() {
    assert_eq!(
        kinds("Oil spill near the marina and a red tide offshore"),
        vec![HazardKind::MarinePollution, HazardKind::HarmfulAlgalBloom]
    );
}

#[test]
fn ordinary_beach_day_has_no_hazard() {
    assert!(kinds("Beautiful calm day at the beach").is_empty());
}

// ============================================================
// Severity
// ============================================================

#[test]
fn highest_severity_indicator_wins() {
    assert_eq!(
        detector().assess_severity("Minor erosion but a severe storm surge is expected"),
        Severity::High
    );
}

#[test]
fn warning_is_medium() {
    assert_eq!(
        detector().assess_severity("Tsunami warning issued for the Pacific coast"),
        Severity::Medium
    );
}

#[test]
fn no_indicator_is_unknown() {
    assert_eq!(detector().assess_severity("Waves reaching the boardwalk"), Severity::Unknown);
}

// ============================================================
// Locations
// ============================================================

#[test]
fn place_names_in_order_of_appearance() {
    let locations =
        detector().extract_locations("Waves crashed at Santa Monica pier and near Venice Beach");
    assert_eq!(locations, vec!["Santa Monica".to_string(), "Venice Beach".to_string()]);
}

#[test]
fn place_word_suffix_pattern() {
    assert_eq!(
        detector().extract_locations("Tsunami warning issued for the Pacific coast"),
        vec!["Pacific".to_string()]
    );
}

// ============================================================
// Full analysis
// ============================================================

#[test]
fn non_hazard_report_scores_zero() {
    let report = RawReport::new("r1", "test", "Beautiful calm day at the beach");
    let analyzed = detector().analyze_report(&report);
    assert!(!analyzed.is_hazard());
    assert_eq!(analyzed.priority, 0.0);
    assert_eq!(analyzed.confidence, 0.0);
    assert_eq!(analyzed.alert_level, AlertLevel::Info);
}

#[test]
fn declared_type_and_severity_fill_gaps() {
    let mut report = RawReport::new("r2", "citizen_report", "Water reaching the road");
    report.reported_type = Some("flood".to_string());
    report.reported_severity = Some(Severity::Low);

    let analyzed = detector().analyze_report(&report);
    assert_eq!(analyzed.hazard_kinds(), vec![HazardKind::Flood]);
    assert!(analyzed.hazards[0].terms.is_empty());
    assert_eq!(analyzed.severity, Severity::Low);
    assert!((analyzed.confidence - 0.5).abs() < 1e-9);
}

#[test]
fn text_severity_beats_declared_severity() {
    let mut report = RawReport::new("r3", "citizen_report", "Severe flooding downtown");
    report.reported_severity = Some(Severity::Low);
    assert_eq!(detector().analyze_report(&report).severity, Severity::High);
}

#[test]
fn agreeing_declared_type_raises_confidence() {
    let mut report = RawReport::new("r4", "citizen_report", "Major flooding downtown");
    report.reported_type = Some("flood".to_string());

    let analyzed = detector().analyze_report(&report);
    assert_eq!(analyzed.hazards.len(), 1);
    assert!((analyzed.confidence - 0.6).abs() < 1e-9);
}

#[test]
fn unknown_declared_type_is_ignored() {
    let mut report = RawReport::new("r5", "citizen_report", "Something odd on the shore");
    report.reported_type = Some("volcano".to_string());
    assert!(!detector().analyze_report(&report).is_hazard());
}

#[test]
fn alert_level_tracks_priority() {
    let analyzed = detector().analyze_report(&RawReport::new(
        "r6",
        "test",
        "Catastrophic tsunami and storm surge, evacuate the coast now",
    ));
    assert!(analyzed.priority >= 75.0);
    assert_eq!(analyzed.alert_level, AlertLevel::Critical);
    assert_eq!(analyzed.alert_level, AlertLevel::from_priority(analyzed.priority));
}

// ============================================================
// Confidence
// ============================================================

#[test]
fn confidence_is_capped() {
    let hazards = vec![HazardMatch {
        kind: HazardKind::Flood,
        terms: (0..10).map(|i| format!("term{i}")).collect(),
    }];
    assert_eq!(compute_confidence(&hazards, true, true), 0.99);
}

#[test]
fn location_adds_confidence() {
    let hazards = vec![HazardMatch {
        kind: HazardKind::Erosion,
        terms: vec!["erosion".to_string()],
    }];
    let without = compute_confidence(&hazards, false, false);
    let with = compute_confidence(&hazards, true, false);
    assert!((with - without - 0.05).abs() < 1e-9);
}

// ============================================================
// Prioritization
// ============================================================

#[test]
fn prioritize_drops_non_hazards_and_sorts_descending() {
    let d = detector();
    let reports = vec![
        RawReport::new("calm", "test", "Calm seas today"),
        RawReport::new("minor", "test", "Minor erosion observed"),
        RawReport::new("major", "test", "Severe storm surge flooding the harbor"),
    ];
    let ranked = d.prioritize_reports(d.analyze_batch_reports(&reports));
    let ids: Vec<&str> = ranked.iter().map(|r| r.report.id.as_str()).collect();
    assert_eq!(ids, vec!["major", "minor"]);
}

#[test]
fn equal_priority_prefers_newest() {
    let d = detector();
    let now = Utc::now();
    // Future timestamps count as brand new, so both get identical scores
    let mut older = RawReport::new("older", "test", "High waves at the jetty");
    older.timestamp = now + Duration::hours(1);
    let mut newer = RawReport::new("newer", "test", "High waves at the jetty");
    newer.timestamp = now + Duration::hours(2);

    let analyzed = vec![d.analyze_report_at(&older, now), d.analyze_report_at(&newer, now)];
    assert_eq!(analyzed[0].priority, analyzed[1].priority);

    let ranked = prioritize(analyzed);
    assert_eq!(ranked[0].report.id, "newer");
    assert_eq!(ranked[1].report.id, "older");
}
