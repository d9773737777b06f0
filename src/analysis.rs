//! Text analysis module for Raven.
//!
//! Tokenizers, token filters and analyzers that turn document content into
//! index terms, plus the query cleaning step (language detection and
//! stopword stripping).

pub mod analyzer;
pub mod language;
pub mod stopword_cleaner;
pub mod token;
pub mod token_filter;
pub mod tokenizer;
