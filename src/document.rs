//! Documents handed to the index for ingestion.
//!
//! The index only needs an identifier and the raw text; storing and loading
//! documents is the job of an external document store.
//!
//! # Examples
//!
//! ```
//! use raven::document::Document;
//!
//! let doc = Document::new(1, "cat dog");
//! assert_eq!(doc.id, 1);
//! assert_eq!(doc.content, "cat dog");
//! ```

use serde::{Deserialize, Serialize};

/// Identifier of a document, assigned outside of the index.
pub type DocId = u64;

/// A document with its identifier and raw text content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Externally assigned identifier, treated as an opaque ordinal.
    pub id: DocId,

    /// Raw text content.
    pub content: String,
}

impl Document {
    /// Create a new document.
    pub fn new<S: Into<String>>(id: DocId, content: S) -> Self {
        Document {
            id,
            content: content.into(),
        }
    }
}
