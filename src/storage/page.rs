//! The on-disk page format.
//!
//! A page is an immutable snapshot of one flushed in-memory segment:
//!
//! ```json
//! { "id": 0, "index": { "cat": [1], "dog": [1] } }
//! ```
//!
//! Terms are kept in a sorted map so that a page always serializes to the
//! same bytes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::document::DocId;
use crate::error::Result;

/// Identifier of a page; assigned in flush order starting at 0.
pub type PageId = u64;

/// Term to posting list mapping stored in a page.
pub type PageIndex = BTreeMap<String, Vec<DocId>>;

/// One durable, immutable fragment of the inverted index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub index: PageIndex,
}

impl Page {
    pub fn new(id: PageId, index: PageIndex) -> Self {
        Page { id, index }
    }

    /// The posting list of `term`, if the page holds it.
    pub fn postings(&self, term: &str) -> Option<&[DocId]> {
        self.index.get(term).map(Vec::as_slice)
    }

    /// Number of distinct terms in the page.
    pub fn term_count(&self) -> usize {
        self.index.len()
    }

    /// Total number of postings in the page.
    pub fn posting_count(&self) -> usize {
        self.index.values().map(Vec::len).sum()
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RavenError;

    fn sample() -> Page {
        let mut index = PageIndex::new();
        index.insert("dog".to_string(), vec![1]);
        index.insert("cat".to_string(), vec![1, 3, 3]);
        Page::new(4, index)
    }

    #[test]
    fn test_json_layout() {
        let json = String::from_utf8(sample().to_json().unwrap()).unwrap();
        assert_eq!(json, r#"{"id":4,"index":{"cat":[1,3,3],"dog":[1]}}"#);
    }

    #[test]
    fn test_lookup() {
        let page = sample();
        assert_eq!(page.postings("cat"), Some(&[1, 3, 3][..]));
        assert_eq!(page.postings("bird"), None);
        assert_eq!(page.term_count(), 2);
        assert_eq!(page.posting_count(), 4);
        assert_eq!(page.terms().collect::<Vec<_>>(), vec!["cat", "dog"]);
    }

    #[test]
    fn test_corrupt_json() {
        let err = Page::from_json(br#"{"id":1,"index":{"cat":[1"#).unwrap_err();
        assert!(matches!(err, RavenError::Json(_)));

        let err = Page::from_json(br#"{"id":"one","index":{}}"#).unwrap_err();
        assert!(matches!(err, RavenError::Json(_)));
    }
}
