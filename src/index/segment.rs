//! The in-memory segment: postings that have not been flushed yet.

use ahash::AHashMap;

use crate::document::DocId;
use crate::storage::page::PageIndex;

/// Mutable term to posting list map owned by the index.
///
/// Posting lists are append-only and keep duplicates; a term repeated in
/// one document appends the id once per occurrence.
#[derive(Debug, Clone, Default)]
pub struct InMemorySegment {
    postings: AHashMap<String, Vec<DocId>>,
    posting_count: usize,
}

impl InMemorySegment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `doc_id` to the posting list of `term`.
    ///
    /// Returns `true` if `term` was not in the segment before.
    pub fn append(&mut self, term: &str, doc_id: DocId) -> bool {
        self.posting_count += 1;
        match self.postings.get_mut(term) {
            Some(list) => {
                list.push(doc_id);
                false
            }
            None => {
                self.postings.insert(term.to_string(), vec![doc_id]);
                true
            }
        }
    }

    /// Number of distinct terms.
    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    /// Number of postings across all terms.
    pub fn posting_count(&self) -> usize {
        self.posting_count
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    pub fn postings(&self, term: &str) -> Option<&[DocId]> {
        self.postings.get(term).map(Vec::as_slice)
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.postings.keys().map(String::as_str)
    }

    /// Copy the segment into the sorted layout a page is written with.
    pub fn snapshot(&self) -> PageIndex {
        self.postings
            .iter()
            .map(|(term, ids)| (term.clone(), ids.clone()))
            .collect()
    }

    pub fn clear(&mut self) {
        self.postings.clear();
        self.posting_count = 0;
    }
}
