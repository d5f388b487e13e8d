//! Page-aware collection merging
//!
//! Merging appends one rendered article to a collection, optionally preceded
//! by a cover page, records its page range and regenerates the table of
//! contents from every entry. Cover and TOC are rendered through the same
//! [`Renderer`] as articles, into a scratch directory that lives only for the
//! duration of one merge.
//!
//! Persistence is split in two so callers can inspect a merge before it
//! becomes visible:
//!
//! 1. [`Aggregator::stage`] computes the new collection and writes it to a
//!    synced temporary file next to the target.
//! 2. [`StagedCollection::commit`] renames that file over the target.
//!
//! Dropping a [`StagedCollection`] removes the temporary file and leaves the
//! original collection byte-for-byte untouched.
//!
//! ```rust,no_run
//! use blog_press::aggregator::Aggregator;
//! use blog_press::layout::TextRenderer;
//! use blog_press::render::RenderedArticle;
//!
//! # fn main() -> Result<(), blog_press::error::PressError> {
//! let aggregator = Aggregator::new(TextRenderer::new());
//! let article = RenderedArticle::from_pages("post", vec!["page one".into()]);
//! let collection = aggregator.merge_into(
//!     "collection-20240309.json".as_ref(),
//!     &article,
//!     "A post",
//!     "Ada",
//!     true,
//!     true,
//! )?;
//! assert_eq!(collection.entries().len(), 1);
//! # Ok(())
//! # }
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{NamedTempFile, TempDir};
use tracing::{debug, info};

use crate::collection::{Collection, TocEntry, digest};
use crate::document::ContentBlock;
use crate::error::PressError;
use crate::render::{PagedDocument, RenderedArticle, Renderer};
use crate::style::HeadingLevel;

/// Heading of the generated table of contents
pub const TOC_HEADING: &str = "Table of Contents";

/// Blocks of a cover page
pub fn cover_blocks(title: &str, author: &str) -> Vec<ContentBlock> {
    vec![
        ContentBlock::heading(HeadingLevel::H1, format!("Title: {title}")),
        ContentBlock::heading(HeadingLevel::H2, format!("Author: {author}")),
    ]
}

/// Blocks of a table of contents covering `entries`
pub fn toc_blocks(entries: &[TocEntry]) -> Vec<ContentBlock> {
    let mut blocks = Vec::with_capacity(entries.len() + 1);
    blocks.push(ContentBlock::heading(HeadingLevel::H1, TOC_HEADING));
    for entry in entries {
        let range = if entry.page_span() == 1 {
            format!("page {}", entry.start_page)
        } else {
            format!("pages {}-{}", entry.start_page, entry.end_page)
        };
        blocks.push(ContentBlock::paragraph(format!("{}, {}", entry.title, range)));
    }
    blocks
}

/// Merges rendered articles into collections
#[derive(Debug)]
pub struct Aggregator<R: Renderer> {
    renderer: R,
    scratch_root: Option<PathBuf>,
}

impl<R: Renderer> Aggregator<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            scratch_root: None,
        }
    }

    /// Create per-merge scratch directories under `root` instead of the
    /// system temporary directory
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Open the collection at `path` and merge `article` into it
    ///
    /// # Errors
    ///
    /// - `PressError::MergeError`: the existing collection is corrupt, the
    ///   article's pages do not match its page count, or persisting failed
    /// - `PressError::RenderError`: rendering the cover or TOC failed
    /// - `PressError::IoError`: the scratch directory could not be created
    pub fn merge_into(
        &self,
        path: &Path,
        article: &RenderedArticle,
        title: &str,
        author: &str,
        want_cover: bool,
        want_toc: bool,
    ) -> Result<Collection, PressError> {
        let collection = Collection::open(path)?;
        self.merge(collection, article, title, author, want_cover, want_toc)
    }

    /// Merge `article` into `collection` and persist the result
    pub fn merge(
        &self,
        collection: Collection,
        article: &RenderedArticle,
        title: &str,
        author: &str,
        want_cover: bool,
        want_toc: bool,
    ) -> Result<Collection, PressError> {
        self.stage(collection, article, title, author, want_cover, want_toc)?
            .commit()
    }

    /// Compute the merged collection and write it beside the target, without
    /// replacing the target yet
    pub fn stage(
        &self,
        mut collection: Collection,
        article: &RenderedArticle,
        title: &str,
        author: &str,
        want_cover: bool,
        want_toc: bool,
    ) -> Result<StagedCollection, PressError> {
        let article_pages = article.pages().map_err(|e| {
            PressError::MergeError(format!("Cannot merge '{}': {}", article.identifier, e))
        })?;
        if article_pages.is_empty() {
            return Err(PressError::MergeError(format!(
                "Cannot merge '{}': article has no pages",
                article.identifier
            )));
        }

        let scratch = self.scratch_dir()?;
        let start_page = collection.cumulative_page_count() + 1;

        if want_cover {
            let cover = self.render_scratch(&scratch, "cover", &cover_blocks(title, author))?;
            collection.append_pages(cover);
        }
        collection.append_pages(article_pages);
        let end_page = collection.cumulative_page_count();

        collection.push_entry(TocEntry {
            title: title.to_string(),
            start_page,
            end_page,
            identifier: article.identifier.clone(),
            digest: digest(&article.bytes),
        });

        // A TOC that does not list every entry is worse than none
        let toc = if want_toc {
            self.render_scratch(&scratch, "toc", &toc_blocks(collection.entries()))?
        } else {
            Vec::new()
        };
        collection.replace_toc(toc);

        debug!(
            identifier = %article.identifier,
            start_page,
            end_page,
            "staging collection"
        );
        let temp = write_temp(&collection)?;
        Ok(StagedCollection { collection, temp })
    }

    fn scratch_dir(&self) -> Result<TempDir, PressError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("blog-press-scratch-");
        let scratch = match &self.scratch_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        };
        scratch.map_err(|e| PressError::IoError(format!("Cannot create scratch directory: {e}")))
    }

    /// Render blocks into the scratch directory and load the pages back
    fn render_scratch(
        &self,
        scratch: &TempDir,
        stem: &str,
        blocks: &[ContentBlock],
    ) -> Result<Vec<String>, PressError> {
        let destination = scratch
            .path()
            .join(format!("{}.{}", stem, self.renderer.extension()));
        let page_count = self.renderer.render(blocks, &destination)?;
        let document = PagedDocument::read(&destination)?;
        if document.page_count() != page_count {
            return Err(PressError::RenderError(format!(
                "Renderer reported {} {} pages but wrote {}",
                page_count,
                stem,
                document.page_count()
            )));
        }
        Ok(document.into_pages())
    }
}

/// A merged collection written to a temporary file, not yet visible at its
/// path
#[derive(Debug)]
pub struct StagedCollection {
    collection: Collection,
    temp: NamedTempFile,
}

impl StagedCollection {
    /// The collection as it will look once committed
    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    /// Atomically replace the target file with the staged collection
    pub fn commit(self) -> Result<Collection, PressError> {
        let path = self.collection.path().to_path_buf();
        self.temp.persist(&path).map_err(|e| {
            PressError::MergeError(format!(
                "Cannot replace collection {}: {}",
                path.display(),
                e.error
            ))
        })?;

        info!(
            path = %path.display(),
            entries = self.collection.entries().len(),
            pages = self.collection.cumulative_page_count(),
            toc_pages = self.collection.toc_pages().len(),
            "collection updated"
        );
        Ok(self.collection)
    }
}

fn write_temp(collection: &Collection) -> Result<NamedTempFile, PressError> {
    let target = collection.path();
    let parent = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let merge_error = |e: std::io::Error| {
        PressError::MergeError(format!("Cannot stage collection {}: {}", target.display(), e))
    };

    fs::create_dir_all(parent).map_err(merge_error)?;
    let bytes = collection.to_json()?;
    let mut temp = tempfile::Builder::new()
        .prefix(".collection-")
        .suffix(".json")
        .tempfile_in(parent)
        .map_err(merge_error)?;
    temp.write_all(&bytes).map_err(merge_error)?;
    temp.as_file().sync_all().map_err(merge_error)?;
    Ok(temp)
}
