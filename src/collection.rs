//! Running collection state and its on-disk document
//!
//! A collection is the period-scoped aggregate of merged articles: the content
//! pages of every article in merge order, a table of contents section kept
//! after them, and one [`TocEntry`] per merge. It is persisted as a single JSON
//! document and validated on load, so a file that was truncated or edited by
//! hand is reported as a `MergeError` instead of silently producing wrong page
//! numbers.
//!
//! # Invariants
//!
//! - Entries tile the content pages: the first entry starts on page 1, each
//!   entry starts one page after the previous one ends, and the last entry ends
//!   on the last content page.
//! - `page_count` in the document equals the number of stored content pages.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PressError;
use crate::render::PagedDocument;

/// Format tag of persisted collections
pub const COLLECTION_FORMAT: &str = "blog-press-collection";

/// Current collection document version
pub const COLLECTION_VERSION: u32 = 1;

/// Length of the entry digest in bytes before hex encoding
const DIGEST_LEN: usize = 16;

/// Table of contents entry for one merged article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    pub title: String,
    pub start_page: usize,
    pub end_page: usize,
    pub identifier: String,
    pub digest: String,
}

impl TocEntry {
    /// Number of pages the entry covers, at least one
    pub fn page_span(&self) -> usize {
        self.end_page.saturating_sub(self.start_page).saturating_add(1)
    }
}

/// Content digest recorded in a [`TocEntry`]
///
/// First 128 bits of the BLAKE3 hash, hex encoded.
pub fn digest(bytes: &[u8]) -> String {
    let hash = blake3::hash(bytes);
    hex::encode(&hash.as_bytes()[..DIGEST_LEN])
}

/// Serialized form of a collection
#[derive(Debug, Serialize, Deserialize)]
struct CollectionDocument {
    format: String,
    version: u32,
    page_count: usize,
    entries: Vec<TocEntry>,
    pages: Vec<String>,
    #[serde(default)]
    toc_pages: Vec<String>,
}

/// Period-scoped collection of merged articles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    path: PathBuf,
    entries: Vec<TocEntry>,
    pages: Vec<String>,
    toc_pages: Vec<String>,
}

impl Collection {
    /// A collection with no entries, to be persisted at `path`
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Vec::new(),
            pages: Vec::new(),
            toc_pages: Vec::new(),
        }
    }

    /// Load the collection at `path`
    ///
    /// A missing file is the first merge of the period and yields an empty
    /// collection.
    ///
    /// # Errors
    ///
    /// - `PressError::MergeError`: the file exists but cannot be read, is not a
    ///   collection document, or violates the page accounting invariants
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PressError> {
        let path = path.into();
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no collection yet, starting empty");
                return Ok(Self::empty(path));
            }
            Err(e) => {
                return Err(PressError::MergeError(format!(
                    "Cannot read collection {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        Self::from_json(path, &bytes)
    }

    /// Decode and validate a collection document
    pub fn from_json(path: impl Into<PathBuf>, bytes: &[u8]) -> Result<Self, PressError> {
        let path = path.into();
        let document: CollectionDocument = serde_json::from_slice(bytes).map_err(|e| {
            PressError::MergeError(format!("Corrupt collection {}: {}", path.display(), e))
        })?;
        validate(&document).map_err(|reason| {
            PressError::MergeError(format!("Invalid collection {}: {}", path.display(), reason))
        })?;

        Ok(Self {
            path,
            entries: document.entries,
            pages: document.pages,
            toc_pages: document.toc_pages,
        })
    }

    /// Encode as a collection document
    pub fn to_json(&self) -> Result<Vec<u8>, PressError> {
        let document = CollectionDocument {
            format: COLLECTION_FORMAT.to_string(),
            version: COLLECTION_VERSION,
            page_count: self.pages.len(),
            entries: self.entries.clone(),
            pages: self.pages.clone(),
            toc_pages: self.toc_pages.clone(),
        };
        serde_json::to_vec_pretty(&document).map_err(|e| {
            PressError::MergeError(format!(
                "Cannot serialize collection {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[TocEntry] {
        &self.entries
    }

    /// Content pages in merge order, covers included
    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    pub fn toc_pages(&self) -> &[String] {
        &self.toc_pages
    }

    /// Number of content pages; the table of contents is not counted
    pub fn cumulative_page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_identifier(&self, identifier: &str) -> bool {
        self.entries.iter().any(|entry| entry.identifier == identifier)
    }

    /// The collection as one paged document: content pages, then the TOC
    pub fn to_paged_document(&self) -> PagedDocument {
        PagedDocument::new(
            self.pages
                .iter()
                .chain(self.toc_pages.iter())
                .cloned()
                .collect(),
        )
    }

    pub(crate) fn append_pages(&mut self, pages: Vec<String>) {
        self.pages.extend(pages);
    }

    pub(crate) fn push_entry(&mut self, entry: TocEntry) {
        self.entries.push(entry);
    }

    pub(crate) fn replace_toc(&mut self, toc_pages: Vec<String>) {
        self.toc_pages = toc_pages;
    }
}

fn validate(document: &CollectionDocument) -> Result<(), String> {
    if document.format != COLLECTION_FORMAT {
        return Err(format!("unexpected format tag '{}'", document.format));
    }
    if document.version != COLLECTION_VERSION {
        return Err(format!("unsupported version {}", document.version));
    }
    if document.page_count != document.pages.len() {
        return Err(format!(
            "page count {} does not match {} stored pages",
            document.page_count,
            document.pages.len()
        ));
    }

    let mut expected_start = 1;
    for entry in &document.entries {
        if entry.start_page != expected_start {
            return Err(format!(
                "entry '{}' starts on page {}, expected {}",
                entry.identifier, entry.start_page, expected_start
            ));
        }
        if entry.end_page < entry.start_page {
            return Err(format!(
                "entry '{}' ends before it starts ({}-{})",
                entry.identifier, entry.start_page, entry.end_page
            ));
        }
        expected_start = entry.end_page.checked_add(1).ok_or_else(|| {
            format!(
                "entry '{}' ends on page {}, past any addressable page",
                entry.identifier, entry.end_page
            )
        })?;
    }

    // expected_start begins at 1 and only grows, so this never underflows
    let covered = expected_start.saturating_sub(1);
    if covered != document.pages.len() {
        return Err(format!(
            "entries cover {} pages but the collection holds {}",
            covered,
            document.pages.len()
        ));
    }
    Ok(())
}
