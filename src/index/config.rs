//! Configuration for the paged inverted index.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{RavenError, Result};
use crate::membership::scalable::MembershipFilterConfig;

/// Configuration of a [`PagedInvertedIndex`](super::paged::PagedInvertedIndex).
///
/// Fixed once the index is constructed.
///
/// # Example
///
/// ```
/// use raven::index::config::IndexConfig;
///
/// let config = IndexConfig::new("/tmp/raven-pages")
///     .max_segment_size(5_000)
///     .rebuild_filter_on_open(true);
///
/// assert_eq!(config.max_segment_size, 5_000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Cap on the number of *distinct terms* held in the in-memory segment.
    ///
    /// The flush trigger runs once per ingested token and writes a page as
    /// soon as the segment holds this many distinct terms. Repeated
    /// occurrences of a term do not count towards the cap.
    pub max_segment_size: usize,

    /// Directory holding the `page_<id>.json` files.
    pub page_directory: PathBuf,

    /// Sizing of the membership filter.
    pub filter: MembershipFilterConfig,

    /// Scan existing pages on construction to repopulate the membership
    /// filter. Without it, terms from pages written by an earlier process
    /// are reported absent until [`rebuild_filter`] is called.
    ///
    /// [`rebuild_filter`]: super::paged::PagedInvertedIndex::rebuild_filter
    pub rebuild_filter_on_open: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        IndexConfig {
            max_segment_size: 1000,
            page_directory: PathBuf::from("pages"),
            filter: MembershipFilterConfig::default(),
            rebuild_filter_on_open: false,
        }
    }
}

impl IndexConfig {
    /// Default configuration rooted at `page_directory`.
    pub fn new<P: AsRef<Path>>(page_directory: P) -> Self {
        IndexConfig {
            page_directory: page_directory.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    pub fn max_segment_size(mut self, max_segment_size: usize) -> Self {
        self.max_segment_size = max_segment_size;
        self
    }

    pub fn page_directory<P: AsRef<Path>>(mut self, page_directory: P) -> Self {
        self.page_directory = page_directory.as_ref().to_path_buf();
        self
    }

    pub fn filter(mut self, filter: MembershipFilterConfig) -> Self {
        self.filter = filter;
        self
    }

    pub fn rebuild_filter_on_open(mut self, rebuild: bool) -> Self {
        self.rebuild_filter_on_open = rebuild;
        self
    }

    /// Check the configuration for values the index cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.max_segment_size == 0 {
            return Err(RavenError::invalid_config(
                "max_segment_size must be positive",
            ));
        }
        if self.page_directory.as_os_str().is_empty() {
            return Err(RavenError::invalid_config(
                "page_directory must not be empty",
            ));
        }
        self.filter.validate()
    }
}
