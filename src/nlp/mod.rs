// Text analytics: cleaning, tokenization, keywords, sentiment and
// batch-level trending terms.

pub mod keywords;
pub mod lemmatize;
pub mod preprocess;
pub mod processor;
pub mod sentiment;
pub mod trending;

pub use processor::{NlpProcessor, ProcessedText};
