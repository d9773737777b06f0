//! The paged inverted index engine.
//!
//! Postings accumulate in an [`InMemorySegment`] until it holds
//! `max_segment_size` distinct terms, at which point the segment is written
//! out as an immutable page and cleared. Every ingested term is also added to
//! a [`ScalableBloomFilter`] so that lookups for absent terms return without
//! reading any page.
//!
//! ```text
//! Document → Analyzer → tokens ─┬→ InMemorySegment ──flush──→ page_<id>.json
//!                               └→ ScalableBloomFilter
//!
//! search(term) → filter ──absent──→ []
//!                  └─maybe──→ scan all pages → dedup
//! ```
//!
//! Search only consults durable pages; postings still in the segment become
//! visible after the next flush.
//!
//! # Examples
//!
//! ```
//! use raven::document::Document;
//! use raven::index::config::IndexConfig;
//! use raven::index::paged::PagedInvertedIndex;
//!
//! # fn main() -> raven::error::Result<()> {
//! let dir = tempfile::tempdir()?;
//! let config = IndexConfig::new(dir.path()).max_segment_size(2);
//! let mut index = PagedInvertedIndex::new(config)?;
//!
//! index.ingest(&Document::new(1, "cat dog"), false)?;
//!
//! assert_eq!(index.next_page_id(), 1);
//! assert_eq!(index.search("cat"), vec![1]);
//! assert!(index.search("bird").is_empty());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use ahash::AHashSet;
use tracing::Span;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::analyzer::standard::StandardAnalyzer;
use crate::analysis::stopword_cleaner::StopwordCleaner;
use crate::document::{DocId, Document};
use crate::error::{RavenError, Result};
use crate::index::config::IndexConfig;
use crate::index::segment::InMemorySegment;
use crate::membership::scalable::ScalableBloomFilter;
use crate::storage::page::{Page, PageId};
use crate::storage::page_store::PageStore;

const TARGET: &str = "raven::index";

/// Single-writer inverted index persisted as JSON pages.
///
/// Mutating operations take `&mut self`; wrap the index in a
/// [`SharedPagedIndex`](super::shared::SharedPagedIndex) to use it from
/// several threads.
pub struct PagedInvertedIndex {
    config: IndexConfig,
    store: PageStore,
    segment: InMemorySegment,
    next_page_id: PageId,
    filter: ScalableBloomFilter,
    analyzer: Arc<dyn Analyzer>,
    naive: PipelineAnalyzer,
    cleaner: StopwordCleaner,
    span: Span,
    closed: bool,
}

impl PagedInvertedIndex {
    /// Open an index over `config.page_directory`, creating the directory
    /// if needed.
    ///
    /// Events are recorded under a span named `paged_index` carrying the
    /// page directory.
    pub fn new(config: IndexConfig) -> Result<Self> {
        let span = tracing::info_span!(
            target: TARGET,
            "paged_index",
            directory = %config.page_directory.display()
        );
        Self::with_span(config, span)
    }

    /// Open an index whose events are recorded under `span`.
    ///
    /// Page numbering resumes after the largest page id already in the
    /// directory.
    pub fn with_span(config: IndexConfig, span: Span) -> Result<Self> {
        config.validate()?;

        let entered = span.enter();
        let store = PageStore::open(&config.page_directory)?;
        let next_page_id = store.next_page_id()?;
        let filter = ScalableBloomFilter::new(config.filter.clone())?;

        tracing::info!(
            target: TARGET,
            next_page_id,
            max_segment_size = config.max_segment_size,
            "Opened paged index"
        );
        drop(entered);

        let rebuild = config.rebuild_filter_on_open;
        let mut index = PagedInvertedIndex {
            config,
            store,
            segment: InMemorySegment::new(),
            next_page_id,
            filter,
            analyzer: Arc::new(StandardAnalyzer::new()),
            naive: PipelineAnalyzer::naive(),
            cleaner: StopwordCleaner::new(),
            span,
            closed: false,
        };

        if rebuild {
            index.rebuild_filter()?;
        }

        Ok(index)
    }

    /// Replace the analyzer used when ingesting with `use_tokenizer` and by
    /// [`search_query`](Self::search_query).
    pub fn with_analyzer(mut self, analyzer: Arc<dyn Analyzer>) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Replace the membership filter, for instance with one restored from
    /// a snapshot.
    pub fn with_filter(mut self, filter: ScalableBloomFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Replace the query cleaner used by [`search_query`](Self::search_query).
    pub fn with_cleaner(mut self, cleaner: StopwordCleaner) -> Self {
        self.cleaner = cleaner;
        self
    }

    /// Index the terms of one document.
    ///
    /// Tokens come from the configured analyzer when `use_tokenizer` is
    /// set, otherwise from a lower-cased whitespace split. Each term is
    /// appended to the segment and added to the filter, then the flush
    /// trigger is evaluated.
    ///
    /// Only analyzer errors are returned. A failed flush is logged and
    /// leaves the segment intact; it is retried on the next token.
    pub fn ingest(&mut self, document: &Document, use_tokenizer: bool) -> Result<()> {
        self.check_closed()?;

        let span = self.span.clone();
        let _enter = span.enter();

        let tokens = if use_tokenizer {
            self.analyzer.analyze(&document.content)?
        } else {
            self.naive.analyze(&document.content)?
        };

        for token in tokens {
            if token.is_stopped() || token.is_empty() {
                continue;
            }

            self.segment.append(&token.text, document.id);
            self.filter.add(token.text.as_str());

            if self.segment.term_count() >= self.config.max_segment_size {
                tracing::debug!(
                    target: TARGET,
                    terms = self.segment.term_count(),
                    "Segment reached max_segment_size"
                );
                if let Err(e) = self.flush() {
                    tracing::warn!(
                        target: TARGET,
                        doc_id = document.id,
                        error = %e,
                        "Flush failed; keeping postings in memory"
                    );
                }
            }
        }

        Ok(())
    }

    /// Ingest `documents` in order.
    ///
    /// Stops at the first analyzer error; documents before it stay indexed.
    pub fn build_index<'a, I>(&mut self, documents: I, use_tokenizer: bool) -> Result<()>
    where
        I: IntoIterator<Item = &'a Document>,
    {
        for document in documents {
            self.ingest(document, use_tokenizer)?;
        }
        Ok(())
    }

    /// Write the segment as the next page and clear it.
    ///
    /// Returns the id of the written page, or `None` if the segment was
    /// empty. On failure neither the segment nor the page counter changes.
    pub fn flush(&mut self) -> Result<Option<PageId>> {
        self.check_closed()?;
        self.flush_segment()
    }

    fn flush_segment(&mut self) -> Result<Option<PageId>> {
        if self.segment.is_empty() {
            return Ok(None);
        }

        let span = self.span.clone();
        let _enter = span.enter();

        let following = self
            .next_page_id
            .checked_add(1)
            .ok_or_else(|| RavenError::storage("page id space exhausted"))?;

        let page = Page::new(self.next_page_id, self.segment.snapshot());
        match self.store.write_page(&page) {
            Ok(path) => {
                tracing::info!(
                    target: TARGET,
                    page_id = page.id,
                    terms = page.term_count(),
                    postings = self.segment.posting_count(),
                    path = %path.display(),
                    "Flushed segment"
                );
                self.next_page_id = following;
                self.segment.clear();
                Ok(Some(page.id))
            }
            Err(e) => {
                tracing::error!(
                    target: TARGET,
                    page_id = page.id,
                    error = %e,
                    "Failed to write page"
                );
                Err(e)
            }
        }
    }

    /// Ids of the documents containing `term`, without duplicates.
    ///
    /// Returns an empty list without touching disk when the filter reports
    /// the term absent. Otherwise every page is read; pages that cannot be
    /// read are logged and skipped. Result order is unspecified.
    pub fn search(&self, term: &str) -> Vec<DocId> {
        let _enter = self.span.enter();

        match self.filter.contains(term) {
            Ok(true) => {}
            Ok(false) => return Vec::new(),
            Err(e) => {
                tracing::warn!(
                    target: TARGET,
                    term,
                    error = %e,
                    "Membership filter failed; treating term as absent"
                );
                return Vec::new();
            }
        }

        let pages = match self.store.scan() {
            Ok(pages) => pages,
            Err(e) => {
                tracing::warn!(
                    target: TARGET,
                    term,
                    error = %e,
                    "Failed to list pages"
                );
                return Vec::new();
            }
        };

        let mut seen = AHashSet::new();
        let mut results = Vec::new();
        for (page_id, page) in pages {
            match page {
                Ok(page) => {
                    if let Some(ids) = page.postings(term) {
                        results.extend(ids.iter().copied().filter(|id| seen.insert(*id)));
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        target: TARGET,
                        page_id,
                        error = %e,
                        "Skipping unreadable page"
                    );
                }
            }
        }

        tracing::trace!(target: TARGET, term, hits = results.len(), "Searched pages");
        results
    }

    /// Search for every term of a free-text query.
    ///
    /// The query is stripped of stopwords for its detected language, then
    /// analyzed with the configured analyzer. Returns the union of the
    /// per-term results without duplicates.
    pub fn search_query(&self, query: &str) -> Result<Vec<DocId>> {
        let cleaned = self.cleaner.clean(query);
        let tokens = self.analyzer.analyze(&cleaned)?;

        let mut seen = AHashSet::new();
        let mut results = Vec::new();
        let mut searched = AHashSet::new();
        for token in tokens {
            if token.is_stopped() || token.is_empty() || !searched.insert(token.text.clone()) {
                continue;
            }
            results.extend(
                self.search(&token.text)
                    .into_iter()
                    .filter(|id| seen.insert(*id)),
            );
        }

        Ok(results)
    }

    /// Add the terms of every existing page to the membership filter.
    ///
    /// The filter is not persisted, so an index opened over pages written
    /// by an earlier process reports their terms absent until this runs.
    /// Unreadable pages are logged and skipped. Returns the number of pages
    /// read.
    pub fn rebuild_filter(&mut self) -> Result<usize> {
        let span = self.span.clone();
        let _enter = span.enter();

        let mut pages_read = 0;
        for (page_id, page) in self.store.scan()? {
            match page {
                Ok(page) => {
                    for term in page.terms() {
                        self.filter.add(term);
                    }
                    pages_read += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        target: TARGET,
                        page_id,
                        error = %e,
                        "Skipping unreadable page during filter rebuild"
                    );
                }
            }
        }

        tracing::info!(
            target: TARGET,
            pages = pages_read,
            terms = self.filter.len(),
            generations = self.filter.generation_count(),
            "Rebuilt membership filter"
        );
        Ok(pages_read)
    }

    /// Flush any buffered postings and close the index.
    ///
    /// Later calls to [`ingest`](Self::ingest) and [`flush`](Self::flush)
    /// fail; searches still work. Closing twice is a no-op.
    pub fn close(&mut self) -> Result<Option<PageId>> {
        if self.closed {
            return Ok(None);
        }

        let flushed = self.flush_segment()?;
        self.closed = true;

        {
            let _enter = self.span.enter();
            tracing::info!(target: TARGET, pages = self.next_page_id, "Closed paged index");
        }
        self.span = Span::none();

        Ok(flushed)
    }

    fn check_closed(&self) -> Result<()> {
        if self.closed {
            return Err(RavenError::index("Index is closed"));
        }
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Postings not yet flushed.
    pub fn segment(&self) -> &InMemorySegment {
        &self.segment
    }

    /// Id the next flushed page will get.
    pub fn next_page_id(&self) -> PageId {
        self.next_page_id
    }

    pub fn filter(&self) -> &ScalableBloomFilter {
        &self.filter
    }

    pub fn page_store(&self) -> &PageStore {
        &self.store
    }

    pub fn analyzer(&self) -> &Arc<dyn Analyzer> {
        &self.analyzer
    }

    pub fn span(&self) -> &Span {
        &self.span
    }
}

impl std::fmt::Debug for PagedInvertedIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagedInvertedIndex")
            .field("page_directory", &self.config.page_directory)
            .field("max_segment_size", &self.config.max_segment_size)
            .field("next_page_id", &self.next_page_id)
            .field("segment_terms", &self.segment.term_count())
            .field("filter_terms", &self.filter.len())
            .field("analyzer", &self.analyzer.name())
            .field("closed", &self.closed)
            .finish()
    }
}
