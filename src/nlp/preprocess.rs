// Text cleaning and tokenization.
//
// Social posts and citizen reports are noisy: URLs, @mentions, hashtags,
// emoji, numbers. Cleaning normalizes them into lowercase words separated by
// single spaces, which is all the keyword and frequency analysis needs.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use stop_words::{get, LANGUAGE};

use super::lemmatize::lemmatize_word;

fn url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"https?\S+|www\S+").expect("valid URL regex"))
}

fn mention_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"@\w+").expect("valid mention regex"))
}

fn hashtag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#(\S+)").expect("valid hashtag regex"))
}

/// English stop words, loaded once.
pub fn stop_words() -> &'static HashSet<String> {
    static WORDS: OnceLock<HashSet<String>> = OnceLock::new();
    WORDS.get_or_init(|| {
        let list: Vec<String> = get(LANGUAGE::English);
        list.into_iter().collect()
    })
}

/// Clean raw text: lowercase, drop URLs and mentions, unwrap hashtags,
/// strip punctuation and digits, collapse whitespace.
pub fn clean_text(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let lower = text.to_lowercase();
    let no_urls = url_re().replace_all(&lower, "");
    let no_mentions = mention_re().replace_all(&no_urls, "");
    let unwrapped = hashtag_re().replace_all(&no_mentions, "$1");

    let stripped: String = unwrapped
        .chars()
        .filter(|c| !c.is_ascii_punctuation() && !c.is_ascii_digit())
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split cleaned text into word tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

/// Drop English stop words.
pub fn remove_stopwords(tokens: &[String]) -> Vec<String> {
    let stops = stop_words();
    tokens
        .iter()
        .filter(|t| !stops.contains(t.as_str()))
        .cloned()
        .collect()
}

/// Reduce tokens to their base (singular noun) form.
pub fn lemmatize(tokens: &[String]) -> Vec<String> {
    tokens.iter().map(|t| lemmatize_word(t)).collect()
}

/// Every intermediate stage of the preprocessing pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreprocessedText {
    pub original_text: String,
    pub cleaned_text: String,
    pub tokens: Vec<String>,
    pub tokens_no_stopwords: Vec<String>,
    pub lemmatized_tokens: Vec<String>,
    /// Lemmatized tokens joined back into a single string
    pub processed_text: String,
}

/// Run the full pipeline: clean -> tokenize -> stop words -> lemmatize.
pub fn preprocess(text: &str) -> PreprocessedText {
    let cleaned_text = clean_text(text);
    let tokens = tokenize(&cleaned_text);
    let tokens_no_stopwords = remove_stopwords(&tokens);
    let lemmatized_tokens = lemmatize(&tokens_no_stopwords);
    let processed_text = lemmatized_tokens.join(" ");

    PreprocessedText {
        original_text: text.to_string(),
        cleaned_text,
        tokens,
        tokens_no_stopwords,
        lemmatized_tokens,
        processed_text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_strips_urls_mentions_and_numbers() {
        let cleaned = clean_text(
            "Waves over 10 feet at the pier! @coastguard see https://t.co/abc123 #HighSurf",
        );
        assert_eq!(cleaned, "waves over feet at the pier see highsurf");
    }

    #[test]
    fn clean_empty_and_whitespace() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text("   \n\t"), "");
    }

    #[test]
    fn clean_removes_apostrophes() {
        assert_eq!(clean_text("There's flooding"), "theres flooding");
    }

    #[test]
    fn stopwords_are_removed() {
        let tokens = tokenize("the flooding is at the pier");
        let filtered = remove_stopwords(&tokens);
        assert!(!filtered.contains(&"the".to_string()));
        assert!(!filtered.contains(&"is".to_string()));
        assert!(filtered.contains(&"flooding".to_string()));
        assert!(filtered.contains(&"pier".to_string()));
    }

    #[test]
    fn preprocess_keeps_every_stage() {
        let result = preprocess("Buildings flooded near the Piers.");
        assert_eq!(result.original_text, "Buildings flooded near the Piers.");
        assert_eq!(result.cleaned_text, "buildings flooded near the piers");
        assert_eq!(result.tokens.len(), 5);
        assert!(result.lemmatized_tokens.contains(&"pier".to_string()));
        assert!(result.lemmatized_tokens.contains(&"building".to_string()));
        assert_eq!(result.processed_text, result.lemmatized_tokens.join(" "));
    }
}
