// Sentiment scoring: trait plus a lexicon-based default.
//
// Sentiment is a supporting signal on the dashboard (distressed reports read
// very differently from "all clear" updates), not an input to severity. The
// lexicon scorer runs locally with no model files; the trait keeps the door
// open for a model-backed scorer.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::preprocess::{clean_text, tokenize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
}

/// Probabilities for each polarity; they always sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub positive: f64,
    pub negative: f64,
    pub label: SentimentLabel,
}

impl Sentiment {
    fn from_positive(positive: f64) -> Self {
        let negative = 1.0 - positive;
        Self {
            positive,
            negative,
            label: if positive > negative {
                SentimentLabel::Positive
            } else {
                SentimentLabel::Negative
            },
        }
    }
}

impl Default for Sentiment {
    /// Empty or unscorable text reads as fully negative.
    fn default() -> Self {
        Self {
            positive: 0.0,
            negative: 1.0,
            label: SentimentLabel::Negative,
        }
    }
}

pub trait SentimentAnalyzer: Send + Sync {
    fn analyze(&self, text: &str) -> Sentiment;
}

const POSITIVE_WORDS: &[&str] = &[
    "safe", "calm", "clear", "cleared", "recovered", "recovering", "restored", "reopened",
    "improving", "improved", "lifted", "stable", "good", "great", "relief", "rescued", "thanks",
    "thank", "helpful", "support", "beautiful", "peaceful", "normal", "resolved", "secure",
    "protected", "ok", "fine", "lucky", "grateful",
];

const NEGATIVE_WORDS: &[&str] = &[
    "dangerous", "dangerously", "danger", "damage", "damaged", "destroyed", "destruction",
    "flooded", "flooding", "injured", "killed", "dead", "death", "fatal", "missing", "trapped",
    "stranded", "scary", "scared", "afraid", "panic", "terrible", "awful", "worst", "bad",
    "worse", "worsening", "severe", "emergency", "threat", "threatening", "collapse",
    "collapsed", "evacuate", "evacuation", "warning", "loss", "lost", "polluted", "toxic",
    "devastating", "catastrophic", "urgent", "help",
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "without", "isnt", "arent", "wasnt",
    "dont", "doesnt", "didnt", "cant", "wont",
];

fn word_set(words: &'static [&'static str]) -> HashSet<&'static str> {
    words.iter().copied().collect()
}

/// Lexicon-based sentiment with simple negation handling: a polarity word
/// within two tokens after a negation counts for the opposite side.
pub struct LexiconSentiment {
    positive: HashSet<&'static str>,
    negative: HashSet<&'static str>,
    negations: HashSet<&'static str>,
}

impl Default for LexiconSentiment {
    fn default() -> Self {
        Self {
            positive: word_set(POSITIVE_WORDS),
            negative: word_set(NEGATIVE_WORDS),
            negations: word_set(NEGATIONS),
        }
    }
}

impl SentimentAnalyzer for LexiconSentiment {
    fn analyze(&self, text: &str) -> Sentiment {
        let tokens = tokenize(&clean_text(text));
        if tokens.is_empty() {
            return Sentiment::default();
        }

        let mut pos = 0.0_f64;
        let mut neg = 0.0_f64;
        let mut negate_window = 0usize;

        for token in &tokens {
            let t = token.as_str();
            if self.negations.contains(t) {
                negate_window = 2;
                continue;
            }
            let negated = negate_window > 0;
            negate_window = negate_window.saturating_sub(1);

            let polarity = if self.positive.contains(t) {
                1
            } else if self.negative.contains(t) {
                -1
            } else {
                0
            };
            match (polarity, negated) {
                (1, false) | (-1, true) => pos += 1.0,
                (-1, false) | (1, true) => neg += 1.0,
                _ => {}
            }
        }

        // Logistic squash of the net score; +1 smoothing keeps neutral text
        // at exactly 0.5 and damps single-word swings.
        let net = (pos - neg) / (pos + neg + 1.0);
        let positive = 1.0 / (1.0 + (-4.0 * net).exp());
        Sentiment::from_positive(positive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(text: &str) -> Sentiment {
        LexiconSentiment::default().analyze(text)
    }

    #[test]
    fn empty_text_is_negative() {
        let s = analyze("");
        assert_eq!(s.label, SentimentLabel::Negative);
        assert_eq!(s.negative, 1.0);
    }

    #[test]
    fn distress_reads_negative() {
        let s = analyze("Dangerous flooding, several buildings damaged and people trapped");
        assert_eq!(s.label, SentimentLabel::Negative);
        assert!(s.negative > 0.8);
    }

    #[test]
    fn all_clear_reads_positive() {
        let s = analyze("Beach reopened, water is calm and everyone is safe");
        assert_eq!(s.label, SentimentLabel::Positive);
    }

    #[test]
    fn negation_flips_polarity() {
        let s = analyze("The harbor is not safe");
        assert_eq!(s.label, SentimentLabel::Negative);
    }

    #[test]
    fn probabilities_sum_to_one() {
        let s = analyze("calm seas but dangerous rip currents");
        assert!((s.positive + s.negative - 1.0).abs() < 1e-9);
    }
}
