//! Analyzers that turn raw document text into index terms.
//!
//! An analyzer is the tokenizer collaborator of the index: the engine only
//! consumes the token stream it produces.

pub mod analyzer;
pub mod pipeline;
pub mod standard;
