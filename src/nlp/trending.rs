// Trending terms across a batch of reports.
//
// Uses TF-IDF with each report as its own document: a term that shows up in
// one burst of reports ("surge", "pier") scores above words every report
// shares. The dashboard shows these as "what people are talking about now".

use keyword_extraction::tf_idf::{TfIdf, TfIdfParams};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::preprocess::{clean_text, stop_words};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingTerm {
    pub term: String,
    pub score: f32,
}

/// Rank the `top_n` most distinctive terms across `texts`.
pub fn trending_terms(texts: &[String], top_n: usize) -> Vec<TrendingTerm> {
    let documents: Vec<String> = texts
        .iter()
        .map(|t| clean_text(t))
        .filter(|t| !t.is_empty())
        .collect();
    if documents.is_empty() || top_n == 0 {
        return Vec::new();
    }

    let stop_words: Vec<String> = stop_words().iter().cloned().collect();
    let params = TfIdfParams::UnprocessedDocuments(&documents, &stop_words, None);
    let tfidf = TfIdf::new(params);

    let ranked: Vec<(String, f32)> = tfidf.get_ranked_word_scores(top_n);
    debug!(documents = documents.len(), terms = ranked.len(), "Ranked trending terms");

    ranked
        .into_iter()
        .map(|(term, score)| TrendingTerm { term, score })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_batch_has_no_terms() {
        assert!(trending_terms(&[], 5).is_empty());
        assert!(trending_terms(&["   ".to_string()], 5).is_empty());
    }

    #[test]
    fn returns_at_most_top_n() {
        let texts = vec![
            "Storm surge flooding the harbor road".to_string(),
            "Harbor road closed due to surge".to_string(),
            "Red tide spotted along the northern beach".to_string(),
            "Tsunami siren test scheduled tomorrow".to_string(),
        ];
        let terms = trending_terms(&texts, 3);
        assert!(!terms.is_empty());
        assert!(terms.len() <= 3);
        assert!(terms.iter().all(|t| t.score >= 0.0));
    }
}
