//! End-to-end processing of one source URL
//!
//! ```text
//! URL -> validate -> classify
//!          Binary: fetch -> store as-is
//!          Markup: fetch -> extract -> name -> render -> merge into collection
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, info};
use url::Url;

use crate::aggregator::Aggregator;
use crate::collection::{Collection, TocEntry};
use crate::config::PressOptions;
use crate::error::PressError;
use crate::extractor::Extractor;
use crate::fetch::{Fetched, Fetcher, SourceKind, parse_source_url};
use crate::naming::{FilenameGenerator, collection_name};
use crate::render::{RenderedArticle, Renderer};

/// What happened to the collection after an article was rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionUpdate {
    /// Collection merging is switched off
    Disabled,
    /// The article was appended
    Merged { path: PathBuf, entry: TocEntry },
    /// The collection already lists this identifier
    SkippedDuplicate { path: PathBuf },
}

/// Result of processing one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PressOutcome {
    /// A binary source stored without extraction
    Stored { path: PathBuf, bytes: usize },
    /// An article extracted and rendered
    Rendered {
        path: PathBuf,
        title: String,
        author: String,
        blocks: usize,
        page_count: usize,
        collection: CollectionUpdate,
    },
}

impl PressOutcome {
    /// Path of the artifact written for the source
    pub fn path(&self) -> &Path {
        match self {
            PressOutcome::Stored { path, .. } | PressOutcome::Rendered { path, .. } => path,
        }
    }
}

/// Article pipeline bound to a fetcher and a renderer
pub struct Press<F: Fetcher, R: Renderer> {
    fetcher: F,
    aggregator: Aggregator<R>,
    extractor: Extractor,
    options: PressOptions,
    output_dir: PathBuf,
    collection_dir: PathBuf,
}

impl<F: Fetcher, R: Renderer> Press<F, R> {
    /// Artifacts and collections are written to the current directory unless
    /// configured otherwise
    pub fn new(fetcher: F, renderer: R, options: PressOptions) -> Self {
        let extractor = Extractor::with_options(options.extract_options());
        Self {
            fetcher,
            aggregator: Aggregator::new(renderer),
            extractor,
            options,
            output_dir: PathBuf::from("."),
            collection_dir: PathBuf::from("."),
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_collection_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.collection_dir = dir.into();
        self
    }

    pub fn options(&self) -> &PressOptions {
        &self.options
    }

    /// Path of the collection covering `date`
    pub fn collection_path(&self, date: NaiveDate) -> PathBuf {
        self.collection_dir
            .join(collection_name(date, self.options.period))
    }

    /// Fetch and process `url`
    ///
    /// `name_override` replaces the URL-derived (or identity-derived) part of
    /// the artifact name.
    ///
    /// # Errors
    ///
    /// - `PressError::InvalidUrl`: `url` is not an absolute http(s) URL
    /// - `PressError::FetchError`: retrieval failed
    /// - `PressError::RenderError`: the renderer failed
    /// - `PressError::MergeError`: the collection is corrupt or could not be
    ///   replaced; the rendered artifact is kept
    /// - `PressError::IoError`: an output directory or stored file could not be
    ///   written
    pub fn process(
        &self,
        url: &str,
        date: NaiveDate,
        name_override: Option<&str>,
    ) -> Result<PressOutcome, PressError> {
        let url = parse_source_url(url)?;
        let kind = SourceKind::classify(&url);
        let fetched = self.fetcher.fetch(&url)?;

        match kind.binary_extension() {
            Some(extension) => self.store_binary(&url, &fetched, extension, date, name_override),
            None => self.process_fetched(&url, &fetched, date, name_override),
        }
    }

    /// Process markup that was already retrieved for `url`
    pub fn process_fetched(
        &self,
        url: &Url,
        fetched: &Fetched,
        date: NaiveDate,
        name_override: Option<&str>,
    ) -> Result<PressOutcome, PressError> {
        let document =
            self.extractor
                .extract_bytes(&fetched.bytes, fetched.content_type.as_deref(), url.as_str());
        if document.is_empty() {
            debug!(%url, "no content found, rendering a blank page");
        }

        let title = document.title_or_unknown().to_string();
        let author = document.author_or_unknown().to_string();
        let renderer = self.aggregator.renderer();
        let naming = FilenameGenerator::new(renderer.extension());
        let name = if self.options.identity_naming {
            naming.name_for_identity(date, &title, &author, name_override)
        } else {
            naming.name_for(url.as_str(), date, name_override)
        };

        create_dir(&self.output_dir)?;
        let destination = self.output_dir.join(&name);
        let article = RenderedArticle::render(renderer, &document.blocks, name, &destination)?;
        info!(
            path = %destination.display(),
            blocks = document.blocks.len(),
            pages = article.page_count,
            profile = ?document.profile,
            "article rendered"
        );

        let collection = self.add_to_collection(&article, &title, &author, date)?;

        Ok(PressOutcome::Rendered {
            path: destination,
            title,
            author,
            blocks: document.blocks.len(),
            page_count: article.page_count,
            collection,
        })
    }

    fn add_to_collection(
        &self,
        article: &RenderedArticle,
        title: &str,
        author: &str,
        date: NaiveDate,
    ) -> Result<CollectionUpdate, PressError> {
        if !self.options.auto_add_to_collection {
            return Ok(CollectionUpdate::Disabled);
        }

        let path = self.collection_path(date);
        let collection = Collection::open(&path)?;
        if self.options.deduplicate && collection.contains_identifier(&article.identifier) {
            info!(
                path = %path.display(),
                identifier = %article.identifier,
                "collection already holds article, skipping merge"
            );
            return Ok(CollectionUpdate::SkippedDuplicate { path });
        }

        let merged = self.aggregator.merge(
            collection,
            article,
            title,
            author,
            self.options.include_cover,
            self.options.include_toc,
        )?;
        let entry = merged.entries().last().cloned().ok_or_else(|| {
            PressError::MergeError(format!("Merge into {} recorded no entry", path.display()))
        })?;
        Ok(CollectionUpdate::Merged { path, entry })
    }

    fn store_binary(
        &self,
        url: &Url,
        fetched: &Fetched,
        extension: &str,
        date: NaiveDate,
        name_override: Option<&str>,
    ) -> Result<PressOutcome, PressError> {
        let name = FilenameGenerator::new(extension).name_for(url.as_str(), date, name_override);
        create_dir(&self.output_dir)?;
        let path = self.output_dir.join(name);
        fs::write(&path, &fetched.bytes).map_err(|e| {
            PressError::IoError(format!("Cannot write {}: {}", path.display(), e))
        })?;

        info!(path = %path.display(), bytes = fetched.bytes.len(), "stored binary source");
        Ok(PressOutcome::Stored {
            path,
            bytes: fetched.bytes.len(),
        })
    }
}

fn create_dir(dir: &Path) -> Result<(), PressError> {
    fs::create_dir_all(dir)
        .map_err(|e| PressError::IoError(format!("Cannot create {}: {}", dir.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::TextRenderer;
    use std::collections::HashMap;

    struct MapFetcher(HashMap<String, Fetched>);

    impl Fetcher for MapFetcher {
        fn fetch(&self, url: &Url) -> Result<Fetched, PressError> {
            self.0
                .get(url.as_str())
                .cloned()
                .ok_or_else(|| PressError::FetchError(format!("{url}: HTTP 404 Not Found")))
        }
    }

    fn fetcher(pages: &[(&str, &str)]) -> MapFetcher {
        MapFetcher(
            pages
                .iter()
                .map(|(url, body)| {
                    (
                        url.to_string(),
                        Fetched {
                            bytes: body.as_bytes().to_vec(),
                            content_type: Some("text/html; charset=utf-8".to_string()),
                        },
                    )
                })
                .collect(),
        )
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    const POST: &str = r#"<html><head><title>Hello</title><meta name="author" content="Ada"></head>
        <body><main><h1>Hello</h1><p>First paragraph.</p></main></body></html>"#;

    #[test]
    fn test_invalid_url_rejected_before_fetch() {
        let press = Press::new(fetcher(&[]), TextRenderer::new(), PressOptions::default());
        assert!(matches!(
            press.process("example.com/post", date(), None),
            Err(PressError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_fetch_error_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let press = Press::new(fetcher(&[]), TextRenderer::new(), PressOptions::default())
            .with_output_dir(dir.path());
        assert!(matches!(
            press.process("https://example.com/missing", date(), None),
            Err(PressError::FetchError(_))
        ));
    }

    #[test]
    fn test_collection_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let options = PressOptions {
            auto_add_to_collection: false,
            ..PressOptions::default()
        };
        let press = Press::new(
            fetcher(&[("https://example.com/post", POST)]),
            TextRenderer::new(),
            options,
        )
        .with_output_dir(dir.path())
        .with_collection_dir(dir.path());

        let outcome = press.process("https://example.com/post", date(), None).unwrap();

        match outcome {
            PressOutcome::Rendered { collection, .. } => {
                assert_eq!(collection, CollectionUpdate::Disabled)
            }
            other => panic!("Expected Rendered, got {other:?}"),
        }
        assert!(!press.collection_path(date()).exists());
    }

    #[test]
    fn test_identity_naming() {
        let dir = tempfile::tempdir().unwrap();
        let options = PressOptions {
            identity_naming: true,
            ..PressOptions::default()
        };
        let press = Press::new(
            fetcher(&[("https://example.com/post", POST)]),
            TextRenderer::new(),
            options,
        )
        .with_output_dir(dir.path())
        .with_collection_dir(dir.path());

        let outcome = press.process("https://example.com/post", date(), None).unwrap();
        assert_eq!(outcome.path(), dir.path().join("2024-03-09 Ada Hello.txt"));
    }
}
