// Colored terminal output for hazard reports, text analysis and keywords.
//
// This module handles all terminal-specific formatting: colors, tables,
// progress indicators. The main.rs display functions delegate here.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::db::models::StoredReport;
use crate::detection::models::{AlertLevel, AnalyzedReport, Severity};
use crate::nlp::keywords::Keyword;
use crate::nlp::trending::TrendingTerm;
use crate::sources::collector::Collection;

/// Progress bar ticking once per source during a multi-source collection.
pub fn collection_progress(sources: usize) -> ProgressBar {
    let pb = ProgressBar::new(sources as u64);
    if let Ok(style) =
        ProgressStyle::default_bar().template("  Sources [{bar:30}] {pos}/{len} {msg}")
    {
        pb.set_style(style);
    }
    pb
}

/// Display a collection summary: per-source counts and failures.
pub fn display_collection_summary(collection: &Collection) {
    println!(
        "\n{}",
        format!("=== Collected {} reports ===", collection.reports.len()).bold()
    );
    for outcome in &collection.outcomes {
        match &outcome.error {
            None => println!("  {} {:<20} {:>4}", "✓".green(), outcome.name, outcome.collected),
            Some(err) => println!(
                "  {} {:<20} {}",
                "✗".red(),
                outcome.name,
                super::truncate_chars(err, 80).red()
            ),
        }
    }
}

/// Display prioritized hazard reports as a ranked list.
pub fn display_prioritized_reports(reports: &[AnalyzedReport]) {
    if reports.is_empty() {
        println!("No hazards detected.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Hazard Report ({} reports) ===", reports.len()).bold()
    );
    println!();

    println!(
        "  {:>4}  {:>6}  {:<10}  {:<8}  {:<28}  {}",
        "Rank".dimmed(),
        "Prio".dimmed(),
        "Alert".dimmed(),
        "Severity".dimmed(),
        "Hazards".dimmed(),
        "Location".dimmed(),
    );
    println!("  {}", "-".repeat(86).dimmed());

    for (i, report) in reports.iter().enumerate() {
        let hazards = report
            .hazards
            .iter()
            .map(|h| h.kind.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "  {:>4}. {:>6.1}  {:<10}  {:<8}  {:<28}  {}",
            i + 1,
            report.priority,
            colorize_alert(report.alert_level),
            colorize_severity(report.severity),
            super::truncate_chars(&hazards, 25),
            report.primary_location().unwrap_or("-"),
        );
        println!(
            "         {}",
            super::truncate_chars(report.report.description(), 100).dimmed()
        );
    }

    println!();

    let critical = reports
        .iter()
        .filter(|r| r.alert_level == AlertLevel::Critical)
        .count();
    let warning = reports
        .iter()
        .filter(|r| r.alert_level == AlertLevel::Warning)
        .count();
    if critical > 0 {
        println!("  {} {} critical reports", "!!".red().bold(), critical);
    }
    if warning > 0 {
        println!("  {} {} warnings", "!".bright_red(), warning);
    }
}

/// Display the full analysis of a single text.
pub fn display_analysis(analyzed: &AnalyzedReport) {
    println!("\n{}", "=== Text Analysis ===".bold());
    println!(
        "  Text: {}",
        super::truncate_chars(&analyzed.report.analysis_text(), 120).dimmed()
    );

    if analyzed.hazards.is_empty() {
        println!("  Hazards: {}", "none detected".green());
    } else {
        println!("  Hazards:");
        for hazard in &analyzed.hazards {
            let terms = if hazard.terms.is_empty() {
                "(declared by source)".to_string()
            } else {
                hazard.terms.join(", ")
            };
            println!("    {} {:<20} {}", hazard.kind.icon(), hazard.kind.as_str(), terms.dimmed());
        }
    }

    println!("  Severity: {}", colorize_severity(analyzed.severity));
    println!("  Confidence: {:.2}", analyzed.confidence);
    println!(
        "  Priority: {:.1}/100 ({})",
        analyzed.priority,
        colorize_alert(analyzed.alert_level)
    );
    if !analyzed.locations.is_empty() {
        println!("  Locations: {}", analyzed.locations.join(", "));
    }
    println!(
        "  Sentiment: {:?} (positive {:.2}, negative {:.2})",
        analyzed.sentiment.label, analyzed.sentiment.positive, analyzed.sentiment.negative
    );
    if !analyzed.keywords.is_empty() {
        display_keywords(&analyzed.keywords);
    }
}

/// Display keywords with their frequencies.
pub fn display_keywords(keywords: &[Keyword]) {
    if keywords.is_empty() {
        println!("No keywords found.");
        return;
    }
    println!("  Keywords:");
    for keyword in keywords {
        println!("    {:<20} {}", keyword.keyword, keyword.frequency);
    }
}

/// Display batch-level trending terms.
pub fn display_trending(terms: &[TrendingTerm]) {
    if terms.is_empty() {
        return;
    }
    println!("\n{}", "=== Trending Terms ===".bold());
    for term in terms {
        println!("  {:<20} {:.3}", term.term, term.score);
    }
}

/// Display stored reports from the database, highest priority first.
pub fn display_stored_reports(reports: &[StoredReport]) {
    if reports.is_empty() {
        println!("No reports stored yet. Run `ohm serve` or `ohm analyze --save` first.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Stored Reports ({}) ===", reports.len()).bold()
    );
    println!();
    for report in reports {
        let severity = report
            .severity
            .parse::<Severity>()
            .map(colorize_severity)
            .unwrap_or_else(|_| report.severity.dimmed());
        println!(
            "  {:>6.1}  {:<8}  {:<20}  {}  {}",
            report.priority,
            severity,
            report.timestamp,
            report.hazards.join(", "),
            report.location.as_deref().unwrap_or("").dimmed(),
        );
        println!(
            "          {}",
            super::truncate_chars(&report.description, 100).dimmed()
        );
    }
}

/// Colorize a severity level.
fn colorize_severity(severity: Severity) -> colored::ColoredString {
    let label = severity.as_str();
    match severity {
        Severity::High => label.red().bold(),
        Severity::Medium => label.yellow(),
        Severity::Low => label.cyan(),
        Severity::Unknown => label.dimmed(),
    }
}

/// Colorize an alert level.
fn colorize_alert(level: AlertLevel) -> colored::ColoredString {
    let label = level.as_str();
    match level {
        AlertLevel::Critical => label.red().bold(),
        AlertLevel::Warning => label.bright_red(),
        AlertLevel::Advisory => label.yellow(),
        AlertLevel::Info => label.dimmed(),
    }
}
