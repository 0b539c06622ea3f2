// Pattern tables for hazard, severity and location detection.
//
// Hazard and severity patterns are matched case-insensitively against the
// raw text. Location patterns depend on capitalization, so they are matched
// case-sensitively on the original wording.

use regex_lite::Regex;

use super::models::{HazardKind, Severity};

/// Regex sources for each hazard kind.
pub fn hazard_pattern_sources(kind: HazardKind) -> &'static [&'static str] {
    match kind {
        HazardKind::Flood => &[
            r"flood(ing|ed|s)?",
            r"water levels? ris(e|es|ing)",
            r"submerged",
            r"inundat(e|ed|ion)",
        ],
        HazardKind::StormSurge => &[
            r"storm\s*surge",
            r"surge\s*warning",
            r"coastal\s*surge",
            r"sea\s*level\s*rise",
        ],
        HazardKind::Tsunami => &[r"tsunami", r"tidal\s*wave", r"seismic\s*sea\s*wave"],
        HazardKind::HighWaves => &[
            r"high\s*waves?",
            r"large\s*waves?",
            r"dangerous\s*waves?",
            r"rough\s*seas?",
            r"wave\s*height",
            r"waves?\s+(?:are\s+)?(?:getting\s+)?dangerously\s+high",
        ],
        HazardKind::Erosion => &[
            r"erosion",
            r"beach\s*loss",
            r"(?:feet|metres|meters)\s+of\s+beach\s+lost",
            r"shoreline\s*retreat",
        ],
        HazardKind::MarinePollution => &[
            r"oil\s*spill",
            r"pollut(e|ed|ion)",
            r"contaminat(e|ed|ion)",
            r"marine\s*debris",
            r"plastic\s*waste",
        ],
        HazardKind::HarmfulAlgalBloom => &[
            r"harmful\s*algal\s*bloom",
            r"red\s*tide",
            r"blue\s*tide",
            r"algal\s*bloom",
        ],
        HazardKind::CoastalStorm => &[
            r"coastal\s*storm",
            r"tropical\s*storm",
            r"hurricane",
            r"typhoon",
            r"cyclone",
        ],
    }
}

/// Regex sources for severity indicators. Unknown has none.
pub fn severity_indicator_sources(severity: Severity) -> &'static [&'static str] {
    match severity {
        Severity::High => &[
            r"major",
            r"severe",
            r"catastrophic",
            r"dangerous",
            r"urgent",
            r"emergency",
            r"critical",
            r"extreme",
            r"life-threatening",
            r"evacuat",
            r"damage",
            r"destroy",
            r"collapse",
            r"injured",
            r"casualt",
            r"fatal",
        ],
        Severity::Medium => &[
            r"moderate",
            r"significant",
            r"noticeable",
            r"concerning",
            r"warning",
            r"alert",
            r"caution",
            r"potential",
            r"possible",
            r"expected",
        ],
        Severity::Low => &[
            r"minor",
            r"slight",
            r"mild",
            r"small",
            r"observ",
            r"monitoring",
            r"update",
            r"information",
        ],
        Severity::Unknown => &[],
    }
}

const PLACE_WORDS: &str = "coast|beach|pier|harbor|harbour|port|town|city|village|bay";

/// Regex sources for place names: "in/at/near <Capitalized Words>" and
/// "<Capitalized Words> beach/pier/...". Group 1 is the place name.
pub fn location_pattern_sources() -> Vec<String> {
    vec![
        r"\b(?:in|at|near)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)".to_string(),
        format!(r"\b([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)\s+(?:{PLACE_WORDS})\b"),
    ]
}

/// A compiled pattern with its source kept for reporting matched terms.
pub struct CompiledPattern {
    pub source: &'static str,
    pub regex: Regex,
}

/// Compile a case-insensitive pattern.
pub fn compile_insensitive(source: &'static str) -> anyhow::Result<CompiledPattern> {
    let regex = Regex::new(&format!("(?i){source}"))
        .map_err(|e| anyhow::anyhow!("Invalid pattern '{source}': {e}"))?;
    Ok(CompiledPattern { source, regex })
}
