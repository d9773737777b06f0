//! The paged inverted index.
//!
//! - [`paged::PagedInvertedIndex`] ingests documents into an in-memory
//!   segment, flushes it to the page store and answers term lookups behind
//!   the membership filter.
//! - [`shared::SharedPagedIndex`] wraps it in a read/write lock for use
//!   from several threads.

pub mod config;
pub mod paged;
pub mod segment;
pub mod shared;
