//! Thread-safe handle around a [`PagedInvertedIndex`].
//!
//! Writers (ingest, flush, filter rebuild, close) take an exclusive lock;
//! searches share a read lock. A search therefore never observes a page
//! that is still being written.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::document::{DocId, Document};
use crate::error::Result;
use crate::index::config::IndexConfig;
use crate::index::paged::PagedInvertedIndex;
use crate::storage::page::PageId;

/// Cloneable, lock-protected paged index.
#[derive(Clone, Debug)]
pub struct SharedPagedIndex {
    inner: Arc<RwLock<PagedInvertedIndex>>,
}

impl SharedPagedIndex {
    pub fn new(index: PagedInvertedIndex) -> Self {
        SharedPagedIndex {
            inner: Arc::new(RwLock::new(index)),
        }
    }

    /// Open a paged index and wrap it.
    pub fn open(config: IndexConfig) -> Result<Self> {
        Ok(Self::new(PagedInvertedIndex::new(config)?))
    }

    pub fn ingest(&self, document: &Document, use_tokenizer: bool) -> Result<()> {
        self.inner.write().ingest(document, use_tokenizer)
    }

    /// Ingest a batch under a single write lock.
    pub fn build_index<'a, I>(&self, documents: I, use_tokenizer: bool) -> Result<()>
    where
        I: IntoIterator<Item = &'a Document>,
    {
        self.inner.write().build_index(documents, use_tokenizer)
    }

    pub fn flush(&self) -> Result<Option<PageId>> {
        self.inner.write().flush()
    }

    pub fn search(&self, term: &str) -> Vec<DocId> {
        self.inner.read().search(term)
    }

    pub fn search_query(&self, query: &str) -> Result<Vec<DocId>> {
        self.inner.read().search_query(query)
    }

    pub fn rebuild_filter(&self) -> Result<usize> {
        self.inner.write().rebuild_filter()
    }

    pub fn close(&self) -> Result<Option<PageId>> {
        self.inner.write().close()
    }

    /// Shared access to the wrapped index.
    pub fn read(&self) -> RwLockReadGuard<'_, PagedInvertedIndex> {
        self.inner.read()
    }

    /// Exclusive access to the wrapped index.
    pub fn write(&self) -> RwLockWriteGuard<'_, PagedInvertedIndex> {
        self.inner.write()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use tempfile::TempDir;

    #[test]
    fn test_concurrent_ingest_and_search() {
        let temp_dir = TempDir::new().unwrap();
        let config = IndexConfig::new(temp_dir.path()).max_segment_size(3);
        let shared = SharedPagedIndex::open(config).unwrap();

        let handles: Vec<_> = (0..4u64)
            .map(|t| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for i in 0..25u64 {
                        let id = t * 100 + i;
                        shared
                            .ingest(&Document::new(id, format!("common term{id}")), false)
                            .unwrap();
                        shared.search("common");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        shared.flush().unwrap();

        let results = shared.search("common");
        assert_eq!(results.len(), 100);
        assert_eq!(shared.search("term301"), vec![301]);
        assert!(shared.read().segment().is_empty());
    }

    #[test]
    fn test_close_through_handle() {
        let temp_dir = TempDir::new().unwrap();
        let shared = SharedPagedIndex::open(IndexConfig::new(temp_dir.path())).unwrap();
        shared.ingest(&Document::new(1, "cat"), false).unwrap();

        assert_eq!(shared.close().unwrap(), Some(0));
        assert!(shared.write().is_closed());
        assert_eq!(shared.search("cat"), vec![1]);
    }
}
