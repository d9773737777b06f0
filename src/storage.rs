//! Durable storage for index pages.
//!
//! - [`page::Page`] is the JSON-serializable unit written at each flush.
//! - [`page_store::PageStore`] owns the page directory: it writes pages,
//!   lists them in id order and reads them back.
//!
//! # Example
//!
//! ```
//! use raven::storage::page::{Page, PageIndex};
//! use raven::storage::page_store::PageStore;
//!
//! # fn main() -> raven::error::Result<()> {
//! let dir = tempfile::tempdir()?;
//! let store = PageStore::open(dir.path())?;
//!
//! let mut index = PageIndex::new();
//! index.insert("cat".to_string(), vec![1]);
//! store.write_page(&Page::new(store.next_page_id()?, index))?;
//!
//! assert_eq!(store.page_ids()?, vec![0]);
//! assert_eq!(store.read_page(0)?.postings("cat"), Some(&[1][..]));
//! # Ok(())
//! # }
//! ```

pub mod page;
pub mod page_store;
