// Frequency-based keyword extraction for a single text.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::preprocess::preprocess;

/// Default number of keywords returned per text.
pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    pub keyword: String,
    pub frequency: u32,
}

/// Extract the `top_n` most frequent lemmatized words longer than two
/// characters. Ties keep first-occurrence order.
pub fn extract_keywords(text: &str, top_n: usize) -> Vec<Keyword> {
    if text.trim().is_empty() || top_n == 0 {
        return Vec::new();
    }

    let preprocessed = preprocess(text);

    // (frequency, first position) per word
    let mut counts: HashMap<&str, (u32, usize)> = HashMap::new();
    for (pos, token) in preprocessed.lemmatized_tokens.iter().enumerate() {
        if token.chars().count() <= 2 {
            continue;
        }
        counts.entry(token.as_str()).or_insert((0, pos)).0 += 1;
    }

    let mut ranked: Vec<(&str, u32, usize)> = counts
        .into_iter()
        .map(|(word, (freq, first))| (word, freq, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(top_n)
        .map(|(word, frequency, _)| Keyword {
            keyword: word.to_string(),
            frequency,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn most_frequent_first_ties_in_order() {
        let keywords = extract_keywords(
            "Flooding at the pier. Flooding downtown. Pier closed. Flooding everywhere.",
            3,
        );
        assert_eq!(keywords[0].keyword, "flooding");
        assert_eq!(keywords[0].frequency, 3);
        assert_eq!(keywords[1].keyword, "pier");
        assert_eq!(keywords[1].frequency, 2);
        assert_eq!(keywords.len(), 3);
    }

    #[test]
    fn plurals_are_merged() {
        let keywords = extract_keywords("waves wave waves", 5);
        assert_eq!(
            keywords,
            vec![Keyword {
                keyword: "wave".to_string(),
                frequency: 3
            }]
        );
    }

    #[test]
    fn empty_text_has_no_keywords() {
        assert!(extract_keywords("", 5).is_empty());
        assert!(extract_keywords("flooding", 0).is_empty());
    }
}
