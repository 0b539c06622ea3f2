// NlpProcessor: one entry point for the per-text analytics.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::keywords::{self, Keyword, DEFAULT_TOP_N};
use super::preprocess::{self, PreprocessedText};
use super::sentiment::{LexiconSentiment, Sentiment, SentimentAnalyzer};

/// Preprocessing output plus keywords and sentiment for one text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedText {
    #[serde(flatten)]
    pub preprocessed: PreprocessedText,
    pub keywords: Vec<Keyword>,
    pub sentiment: Sentiment,
}

pub struct NlpProcessor {
    sentiment: Box<dyn SentimentAnalyzer>,
    top_keywords: usize,
}

impl Default for NlpProcessor {
    fn default() -> Self {
        Self {
            sentiment: Box::new(LexiconSentiment::default()),
            top_keywords: DEFAULT_TOP_N,
        }
    }
}

impl NlpProcessor {
    /// Use a different sentiment backend.
    pub fn with_sentiment(sentiment: Box<dyn SentimentAnalyzer>) -> Self {
        Self {
            sentiment,
            ..Self::default()
        }
    }

    pub fn clean_text(&self, text: &str) -> String {
        preprocess::clean_text(text)
    }

    pub fn tokenize_text(&self, text: &str) -> Vec<String> {
        preprocess::tokenize(text)
    }

    pub fn remove_stopwords(&self, tokens: &[String]) -> Vec<String> {
        preprocess::remove_stopwords(tokens)
    }

    pub fn lemmatize_tokens(&self, tokens: &[String]) -> Vec<String> {
        preprocess::lemmatize(tokens)
    }

    pub fn preprocess_text(&self, text: &str) -> PreprocessedText {
        preprocess::preprocess(text)
    }

    pub fn extract_keywords(&self, text: &str, top_n: usize) -> Vec<Keyword> {
        keywords::extract_keywords(text, top_n)
    }

    pub fn analyze_sentiment(&self, text: &str) -> Sentiment {
        self.sentiment.analyze(text)
    }

    /// Preprocess, extract keywords and score sentiment for a single text.
    pub fn process(&self, text: &str) -> ProcessedText {
        ProcessedText {
            preprocessed: self.preprocess_text(text),
            keywords: self.extract_keywords(text, self.top_keywords),
            sentiment: self.analyze_sentiment(text),
        }
    }

    /// Process every text, preserving input order.
    pub fn process_batch(&self, texts: &[String]) -> Vec<ProcessedText> {
        debug!(count = texts.len(), "Processing text batch");
        texts.iter().map(|t| self.process(t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::sentiment::SentimentLabel;

    struct AlwaysPositive;

    impl SentimentAnalyzer for AlwaysPositive {
        fn analyze(&self, _text: &str) -> Sentiment {
            Sentiment {
                positive: 1.0,
                negative: 0.0,
                label: SentimentLabel::Positive,
            }
        }
    }

    #[test]
    fn batch_preserves_order() {
        let processor = NlpProcessor::default();
        let texts = vec![
            "Tsunami warning for the bay".to_string(),
            "".to_string(),
            "Oil spill near the harbor".to_string(),
        ];
        let results = processor.process_batch(&texts);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].preprocessed.original_text, texts[0]);
        assert!(results[1].keywords.is_empty());
        assert_eq!(results[1].sentiment, Sentiment::default());
        assert_eq!(results[2].preprocessed.original_text, texts[2]);
    }

    #[test]
    fn sentiment_backend_is_swappable() {
        let processor = NlpProcessor::with_sentiment(Box::new(AlwaysPositive));
        let s = processor.analyze_sentiment("catastrophic flooding");
        assert_eq!(s.label, SentimentLabel::Positive);
    }
}
