//! Core analyzer trait definition.
//!
//! ```text
//! Raw Text → Analyzer → Token Stream → Index
//!             ↓
//!         Tokenizer
//!             ↓
//!         Filter 1 … Filter N
//! ```
//!
//! # Examples
//!
//! Implementing a custom analyzer:
//!
//! ```
//! use raven::analysis::analyzer::analyzer::Analyzer;
//! use raven::analysis::token::{Token, TokenStream};
//! use raven::error::Result;
//!
//! struct HashtagAnalyzer;
//!
//! impl Analyzer for HashtagAnalyzer {
//!     fn analyze(&self, text: &str) -> Result<TokenStream> {
//!         let tags: Vec<Token> = text
//!             .split_whitespace()
//!             .filter_map(|w| w.strip_prefix('#'))
//!             .enumerate()
//!             .map(|(i, tag)| Token::new(tag.to_lowercase(), i))
//!             .collect();
//!         Ok(Box::new(tags.into_iter()))
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "hashtag"
//!     }
//! }
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for analyzers that convert text into processed tokens.
///
/// Implementations must be `Send + Sync`; one analyzer instance is shared by
/// the index for every document it ingests.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &'static str;
}
