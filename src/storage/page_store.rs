//! File-backed page store.
//!
//! Pages live in a single directory as `page_<id>.json`. Files are written
//! once and never rewritten or deleted; files in the directory that do not
//! follow the naming scheme are ignored.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{RavenError, Result};
use crate::storage::page::{Page, PageId};

const PAGE_PREFIX: &str = "page_";
const PAGE_SUFFIX: &str = ".json";
const TEMP_SUFFIX: &str = ".tmp";

/// Reads and writes pages in one directory.
#[derive(Debug, Clone)]
pub struct PageStore {
    directory: PathBuf,
}

impl PageStore {
    /// Open the store, creating the directory if it doesn't exist.
    pub fn open<P: AsRef<Path>>(directory: P) -> Result<Self> {
        let directory = directory.as_ref().to_path_buf();

        if !directory.exists() {
            fs::create_dir_all(&directory).map_err(|e| {
                RavenError::storage(format!(
                    "Failed to create page directory {}: {e}",
                    directory.display()
                ))
            })?;
        }

        if !directory.is_dir() {
            return Err(RavenError::storage(format!(
                "Path is not a directory: {}",
                directory.display()
            )));
        }

        Ok(PageStore { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the file holding page `id`.
    pub fn page_path(&self, id: PageId) -> PathBuf {
        self.directory.join(format!("{PAGE_PREFIX}{id}{PAGE_SUFFIX}"))
    }

    /// Parse a page id out of a file name such as `page_12.json`.
    ///
    /// Only the canonical spelling of an id is accepted, so `page_01.json`
    /// or `page_+1.json` never alias page 1.
    pub fn parse_page_file_name(name: &str) -> Option<PageId> {
        let digits = name.strip_prefix(PAGE_PREFIX)?.strip_suffix(PAGE_SUFFIX)?;
        let id: PageId = digits.parse().ok()?;
        (id.to_string() == digits).then_some(id)
    }

    /// Write a page.
    ///
    /// The page is written to a temporary file, synced and renamed into
    /// place, so a page file is either complete or absent. Refuses to
    /// overwrite an existing page.
    pub fn write_page(&self, page: &Page) -> Result<PathBuf> {
        let path = self.page_path(page.id);
        if path.exists() {
            return Err(RavenError::storage(format!(
                "Page {} already exists at {}",
                page.id,
                path.display()
            )));
        }

        let data = page.to_json()?;
        let temp_path = self
            .directory
            .join(format!("{PAGE_PREFIX}{}{PAGE_SUFFIX}{TEMP_SUFFIX}", page.id));

        let written = Self::write_synced(&temp_path, &data)
            .and_then(|_| fs::rename(&temp_path, &path).map_err(RavenError::from));
        if let Err(e) = written {
            // Best effort; a stale temp file is ignored by page listing.
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        Ok(path)
    }

    fn write_synced(path: &Path, data: &[u8]) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(data)?;
        let file = writer
            .into_inner()
            .map_err(|e| RavenError::from(e.into_error()))?;
        file.sync_all()?;
        Ok(())
    }

    /// Read page `id`.
    pub fn read_page(&self, id: PageId) -> Result<Page> {
        let page = self.read_page_at(self.page_path(id))?;
        if page.id != id {
            return Err(RavenError::storage(format!(
                "Page file for id {id} contains page {}",
                page.id
            )));
        }
        Ok(page)
    }

    /// Read and decode the page file at `path`.
    pub fn read_page_at<P: AsRef<Path>>(&self, path: P) -> Result<Page> {
        let bytes = fs::read(path.as_ref())?;
        Page::from_json(&bytes)
    }

    /// Ids of all page files, ascending.
    pub fn page_ids(&self) -> Result<Vec<PageId>> {
        let mut ids = Vec::new();

        for entry in fs::read_dir(&self.directory)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(id) = entry
                .file_name()
                .to_str()
                .and_then(Self::parse_page_file_name)
            {
                ids.push(id);
            }
        }

        ids.sort_unstable();
        Ok(ids)
    }

    /// The id the next flushed page should get: one past the largest
    /// existing id, or 0 for an empty directory.
    pub fn next_page_id(&self) -> Result<PageId> {
        match self.page_ids()?.last() {
            None => Ok(0),
            Some(&last) => last
                .checked_add(1)
                .ok_or_else(|| RavenError::storage("page id space exhausted")),
        }
    }

    /// Lazily read every page in id order.
    ///
    /// Listing errors fail the call; per-page errors are yielded alongside
    /// the page id so the caller can skip them.
    pub fn scan(&self) -> Result<impl Iterator<Item = (PageId, Result<Page>)> + '_> {
        let ids = self.page_ids()?;
        Ok(ids.into_iter().map(move |id| (id, self.read_page(id))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::page::PageIndex;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, PageStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = PageStore::open(temp_dir.path().join("pages")).unwrap();
        (temp_dir, store)
    }

    fn page(id: PageId, terms: &[(&str, &[u64])]) -> Page {
        let index: PageIndex = terms
            .iter()
            .map(|(t, ids)| (t.to_string(), ids.to_vec()))
            .collect();
        Page::new(id, index)
    }

    #[test]
    fn test_open_creates_directory() {
        let (temp_dir, store) = create_test_store();
        assert!(temp_dir.path().join("pages").is_dir());
        assert_eq!(store.page_ids().unwrap(), Vec::<PageId>::new());
        assert_eq!(store.next_page_id().unwrap(), 0);
    }

    #[test]
    fn test_open_rejects_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("not_a_dir");
        fs::write(&file_path, b"x").unwrap();

        assert!(matches!(
            PageStore::open(&file_path),
            Err(RavenError::Storage(_))
        ));
    }

    #[test]
    fn test_write_and_read() {
        let (_temp_dir, store) = create_test_store();
        let written = page(0, &[("cat", &[1]), ("dog", &[1])]);

        let path = store.write_page(&written).unwrap();
        assert_eq!(path, store.directory().join("page_0.json"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            r#"{"id":0,"index":{"cat":[1],"dog":[1]}}"#
        );

        // Pages are immutable, so repeated reads agree.
        let first = store.read_page(0).unwrap();
        let second = store.read_page(0).unwrap();
        assert_eq!(first, written);
        assert_eq!(first, second);
    }

    #[test]
    fn test_never_overwrites() {
        let (_temp_dir, store) = create_test_store();
        store.write_page(&page(0, &[("cat", &[1])])).unwrap();

        let err = store.write_page(&page(0, &[("dog", &[2])])).unwrap_err();
        assert!(matches!(err, RavenError::Storage(_)));
        assert_eq!(store.read_page(0).unwrap().postings("cat"), Some(&[1][..]));
    }

    #[test]
    fn test_page_ids_sorted_and_filtered() {
        let (_temp_dir, store) = create_test_store();
        for id in [2, 0, 10, 1] {
            store.write_page(&page(id, &[("t", &[id])])).unwrap();
        }
        fs::write(store.directory().join("notes.txt"), b"ignored").unwrap();
        fs::write(store.directory().join("page_3.json.tmp"), b"partial").unwrap();
        fs::create_dir(store.directory().join("page_4.json")).unwrap();

        assert_eq!(store.page_ids().unwrap(), vec![0, 1, 2, 10]);
        assert_eq!(store.next_page_id().unwrap(), 11);
    }

    #[test]
    fn test_parse_page_file_name() {
        assert_eq!(PageStore::parse_page_file_name("page_0.json"), Some(0));
        assert_eq!(PageStore::parse_page_file_name("page_42.json"), Some(42));
        assert_eq!(PageStore::parse_page_file_name("page_x.json"), None);
        assert_eq!(PageStore::parse_page_file_name("page_1.json.tmp"), None);
        assert_eq!(PageStore::parse_page_file_name("segment_1.json"), None);
    }

    #[test]
    fn test_non_canonical_names_are_ignored() {
        let (_temp_dir, store) = create_test_store();
        store.write_page(&page(0, &[("a", &[1])])).unwrap();
        store.write_page(&page(1, &[("a", &[2])])).unwrap();
        for alias in ["page_00.json", "page_01.json", "page_+1.json"] {
            fs::write(store.directory().join(alias), br#"{"id":9,"index":{}}"#).unwrap();
        }

        assert_eq!(store.page_ids().unwrap(), vec![0, 1]);
        assert_eq!(store.read_page(1).unwrap().postings("a"), Some(&[2][..]));
        assert_eq!(store.scan().unwrap().count(), 2);
        assert_eq!(PageStore::parse_page_file_name("page_00.json"), None);
        assert_eq!(PageStore::parse_page_file_name("page_+1.json"), None);
    }

    #[test]
    fn test_next_page_id_exhausted() {
        let (_temp_dir, store) = create_test_store();
        fs::write(store.page_path(PageId::MAX), br#"{"id":0,"index":{}}"#).unwrap();

        assert_eq!(store.page_ids().unwrap(), vec![PageId::MAX]);
        assert!(matches!(
            store.next_page_id(),
            Err(RavenError::Storage(_))
        ));
    }

    #[test]
    fn test_scan_yields_errors_per_page() {
        let (_temp_dir, store) = create_test_store();
        store.write_page(&page(0, &[("a", &[1])])).unwrap();
        fs::write(store.page_path(1), b"{not json").unwrap();
        store.write_page(&page(2, &[("a", &[2])])).unwrap();

        let results: Vec<(PageId, bool)> = store
            .scan()
            .unwrap()
            .map(|(id, page)| (id, page.is_ok()))
            .collect();

        assert_eq!(results, vec![(0, true), (1, false), (2, true)]);
    }

    #[test]
    fn test_mismatched_page_id() {
        let (_temp_dir, store) = create_test_store();
        fs::write(store.page_path(5), br#"{"id":6,"index":{}}"#).unwrap();

        assert!(matches!(store.read_page(5), Err(RavenError::Storage(_))));
    }
}
