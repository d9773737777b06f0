//! # Raven
//!
//! The indexing core of a search-engine database: an inverted index that is
//! persisted incrementally as immutable JSON pages, with a scalable Bloom
//! filter that answers lookups for absent terms without touching disk.
//!
//! ## Features
//!
//! - Memory-bounded ingestion that spills the in-memory segment to a page
//!   once it holds a configured number of distinct terms
//! - Scalable Bloom filter whose aggregate false-positive rate stays bounded
//!   as it grows
//! - Pluggable text analysis pipeline
//! - Stopword-based query cleaning for English, French, German and Spanish
//!
//! ## Example
//!
//! ```
//! use raven::prelude::*;
//!
//! # fn main() -> raven::error::Result<()> {
//! let dir = tempfile::tempdir()?;
//! let mut index = PagedInvertedIndex::new(IndexConfig::new(dir.path()).max_segment_size(2))?;
//!
//! index.build_index(&[Document::new(1, "a b"), Document::new(2, "b c")], false)?;
//! index.flush()?;
//!
//! let mut hits = index.search("b");
//! hits.sort_unstable();
//! assert_eq!(hits, vec![1, 2]);
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod document;
pub mod error;
pub mod index;
pub mod membership;
pub mod storage;

pub mod prelude {
    pub use crate::analysis::analyzer::analyzer::Analyzer;
    pub use crate::document::{DocId, Document};
    pub use crate::error::{RavenError, Result};
    pub use crate::index::config::IndexConfig;
    pub use crate::index::paged::PagedInvertedIndex;
    pub use crate::index::shared::SharedPagedIndex;
    pub use crate::membership::scalable::{MembershipFilterConfig, ScalableBloomFilter};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
