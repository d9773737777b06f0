//! Probabilistic membership filter in front of the page store.
//!
//! A negative answer is definitive, so queries for terms that were never
//! indexed are answered without reading any page.

pub mod bloom;
pub mod scalable;
