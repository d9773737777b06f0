//! Query cleaning: language detection followed by stopword stripping.
//!
//! Rules:
//!
//! - no language detected: the query passes through unchanged;
//! - otherwise the stopwords of the detected language are stripped;
//! - if nothing is left after stripping, the original query is returned.
//!
//! # Examples
//!
//! ```
//! use raven::analysis::stopword_cleaner::StopwordCleaner;
//!
//! let cleaner = StopwordCleaner::new();
//! assert_eq!(cleaner.clean("the history of the bloom filter"), "history bloom filter");
//! assert_eq!(cleaner.clean("bloom filter"), "bloom filter");
//! assert_eq!(cleaner.clean("to be or not to be"), "to be or not to be");
//! ```

use std::sync::Arc;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::analyzer::standard::StandardAnalyzer;
use crate::analysis::language::{LanguageDetector, StopwordLanguageDetector};

/// Strips stopwords from queries in the language the detector finds.
#[derive(Clone)]
pub struct StopwordCleaner {
    detector: Arc<dyn LanguageDetector>,
}

impl StopwordCleaner {
    /// Create a cleaner backed by [`StopwordLanguageDetector`].
    pub fn new() -> Self {
        Self::with_detector(Arc::new(StopwordLanguageDetector::new()))
    }

    /// Create a cleaner with a custom language detector.
    pub fn with_detector(detector: Arc<dyn LanguageDetector>) -> Self {
        StopwordCleaner { detector }
    }

    /// Clean `query`, returning the stripped query or the original one.
    pub fn clean(&self, query: &str) -> String {
        let Some(language) = self.detector.detect(query) else {
            return query.to_string();
        };

        let cleaned = match StandardAnalyzer::with_stop_words(language).analyze(query) {
            Ok(tokens) => tokens
                .filter(|t| !t.is_stopped())
                .map(|t| t.text)
                .collect::<Vec<_>>()
                .join(" "),
            Err(e) => {
                tracing::debug!(
                    target: "raven::analysis",
                    language = %language,
                    error = %e,
                    "Stopword stripping failed; keeping original query"
                );
                return query.to_string();
            }
        };

        if cleaned.is_empty() {
            query.to_string()
        } else {
            cleaned
        }
    }
}

impl Default for StopwordCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StopwordCleaner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StopwordCleaner").finish_non_exhaustive()
    }
}
