// Text analytics on report-shaped input: the NlpProcessor pipeline,
// keyword extraction and batch trending terms.

use ohm::nlp::keywords::extract_keywords;
use ohm::nlp::sentiment::SentimentLabel;
use ohm::nlp::trending::trending_terms;
use ohm::nlp::NlpProcessor;

// ============================================================
// NlpProcessor
// ============================================================

#[test]
fn social_post_is_cleaned_before_keywords() {
    let processed = NlpProcessor::default()
        .process("Flooding at the pier! https://t.co/abc @harbor_watch #StormSurge 2024");

    assert_eq!(processed.preprocessed.cleaned_text, "flooding at the pier stormsurge");
    let words: Vec<&str> = processed.keywords.iter().map(|k| k.keyword.as_str()).collect();
    assert!(words.contains(&"flooding"));
    assert!(words.contains(&"stormsurge"));
    assert!(!words.iter().any(|w| w.contains("http") || w.contains("harbor_watch")));
}

#[test]
fn batch_preserves_input_order() {
    let texts = vec![
        "Calm and safe at the marina".to_string(),
        "Dangerous waves, people trapped".to_string(),
    ];
    let processed = NlpProcessor::default().process_batch(&texts);
    assert_eq!(processed.len(), 2);
    assert_eq!(processed[0].preprocessed.original_text, texts[0]);
    assert_eq!(processed[0].sentiment.label, SentimentLabel::Positive);
    assert_eq!(processed[1].sentiment.label, SentimentLabel::Negative);
}

// ============================================================
// Keywords
// ============================================================

#[test]
fn keyword_plurals_share_a_bucket() {
    let keywords = extract_keywords("Waves hit the beaches. A wave reached the beach.", 2);
    assert_eq!(keywords[0].keyword, "wave");
    assert_eq!(keywords[0].frequency, 2);
    assert_eq!(keywords[1].keyword, "beach");
    assert_eq!(keywords[1].frequency, 2);
}

#[test]
fn short_words_are_not_keywords() {
    let keywords = extract_keywords("Go up to sea", 5);
    assert!(keywords.iter().all(|k| k.keyword.chars().count() > 2));
}

// ============================================================
// Trending
// ============================================================

#[test]
fn trending_ignores_stop_words() {
    let texts = vec![
        "The surge is flooding the harbor road".to_string(),
        "The harbor road is closed by the surge".to_string(),
        "The red tide is back along the beach".to_string(),
    ];
    let terms = trending_terms(&texts, 5);
    assert!(!terms.is_empty());
    assert!(terms.len() <= 5);
    assert!(terms.iter().all(|t| t.term != "the" && t.term != "is"));
}
