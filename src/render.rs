//! Renderer interface and the paged artifact format
//!
//! A renderer turns a block sequence into a paginated artifact and reports how
//! many pages it produced. That count is load-bearing: collection tables of
//! contents are computed from it, so the artifact written to disk must decode
//! to exactly that many pages.
//!
//! # Artifact format
//!
//! A paged artifact is UTF-8 text in which every page is terminated by a form
//! feed (U+000C), so a single blank page is distinguishable from no pages at
//! all. Page text never contains a form feed itself, since block text is
//! whitespace-collapsed during extraction.

use std::fs;
use std::path::Path;

use crate::document::ContentBlock;
use crate::error::PressError;

/// Page terminator in the artifact encoding
pub const PAGE_BREAK: char = '\u{000C}';

/// Paginating engine
///
/// Implementations must be reusable: one session renders the article, then
/// possibly a cover and a table of contents through the same renderer.
pub trait Renderer {
    /// Render `blocks` to `destination` and return the number of pages written
    ///
    /// An empty block sequence still produces a valid artifact (a blank page).
    fn render(&self, blocks: &[ContentBlock], destination: &Path) -> Result<usize, PressError>;

    /// File extension of the artifacts this renderer writes
    fn extension(&self) -> &str;
}

impl<R: Renderer + ?Sized> Renderer for &R {
    fn render(&self, blocks: &[ContentBlock], destination: &Path) -> Result<usize, PressError> {
        (**self).render(blocks, destination)
    }

    fn extension(&self) -> &str {
        (**self).extension()
    }
}

/// Decoded paged artifact
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagedDocument {
    pages: Vec<String>,
}

impl PagedDocument {
    pub fn new(pages: Vec<String>) -> Self {
        Self { pages }
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    pub fn into_pages(self) -> Vec<String> {
        self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Encode as UTF-8 with a form feed after every page
    pub fn encode(&self) -> Vec<u8> {
        let mut encoded = String::with_capacity(self.pages.iter().map(|p| p.len() + 1).sum());
        for page in &self.pages {
            encoded.push_str(page);
            encoded.push(PAGE_BREAK);
        }
        encoded.into_bytes()
    }

    /// Decode an artifact; empty input decodes to zero pages
    ///
    /// A missing terminator after the last page is tolerated.
    pub fn decode(bytes: &[u8]) -> Result<Self, PressError> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }

        let text = std::str::from_utf8(bytes).map_err(|e| {
            PressError::RenderError(format!(
                "Artifact is not valid UTF-8 at byte {}",
                e.valid_up_to()
            ))
        })?;

        Ok(Self {
            pages: text.split_terminator(PAGE_BREAK).map(str::to_string).collect(),
        })
    }

    /// Read and decode an artifact file
    pub fn read(path: &Path) -> Result<Self, PressError> {
        let bytes = fs::read(path).map_err(|e| {
            PressError::RenderError(format!("Cannot read artifact {}: {}", path.display(), e))
        })?;
        Self::decode(&bytes)
    }
}

/// A rendered article, owned by the caller until handed to the aggregator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArticle {
    pub identifier: String,
    pub page_count: usize,
    pub bytes: Vec<u8>,
}

impl RenderedArticle {
    /// Build an article from already paginated text
    pub fn from_pages(identifier: impl Into<String>, pages: Vec<String>) -> Self {
        let document = PagedDocument::new(pages);
        Self {
            identifier: identifier.into(),
            page_count: document.page_count(),
            bytes: document.encode(),
        }
    }

    /// Render `blocks` to `destination` and load the result
    pub fn render<R: Renderer>(
        renderer: &R,
        blocks: &[ContentBlock],
        identifier: impl Into<String>,
        destination: &Path,
    ) -> Result<Self, PressError> {
        let page_count = renderer.render(blocks, destination)?;
        let bytes = fs::read(destination).map_err(|e| {
            PressError::RenderError(format!(
                "Cannot read rendered artifact {}: {}",
                destination.display(),
                e
            ))
        })?;

        Ok(Self {
            identifier: identifier.into(),
            page_count,
            bytes,
        })
    }

    /// Decode the artifact, checking it against the reported page count
    pub fn pages(&self) -> Result<Vec<String>, PressError> {
        let document = PagedDocument::decode(&self.bytes)?;
        if document.page_count() != self.page_count {
            return Err(PressError::RenderError(format!(
                "Article '{}' reports {} pages but its artifact holds {}",
                self.identifier,
                self.page_count,
                document.page_count()
            )));
        }
        Ok(document.into_pages())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_encode_terminates_pages_with_form_feed() {
        let document = PagedDocument::new(pages(&["one", "two"]));
        assert_eq!(document.encode(), b"one\x0ctwo\x0c");
    }

    #[test]
    fn test_single_blank_page_survives_round_trip() {
        let document = PagedDocument::new(pages(&[""]));
        assert_eq!(PagedDocument::decode(&document.encode()).unwrap().page_count(), 1);
    }

    #[test]
    fn test_decode_keeps_blank_pages() {
        let document = PagedDocument::decode(b"\x0cmiddle\x0c\x0c").unwrap();
        assert_eq!(document.pages(), pages(&["", "middle", ""]).as_slice());
    }

    #[test]
    fn test_decode_tolerates_missing_final_terminator() {
        let document = PagedDocument::decode(b"one\x0ctwo").unwrap();
        assert_eq!(document.pages(), pages(&["one", "two"]).as_slice());
    }

    #[test]
    fn test_decode_empty_is_zero_pages() {
        assert_eq!(PagedDocument::decode(b"").unwrap().page_count(), 0);
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        assert!(matches!(
            PagedDocument::decode(b"\xff\xfe"),
            Err(PressError::RenderError(_))
        ));
    }

    #[test]
    fn test_rendered_article_page_count_mismatch() {
        let mut article = RenderedArticle::from_pages("a", pages(&["p1", "p2"]));
        assert_eq!(article.pages().unwrap().len(), 2);

        article.page_count = 3;
        match article.pages() {
            Err(PressError::RenderError(message)) => assert!(message.contains("reports 3 pages")),
            other => panic!("Expected RenderError, got {other:?}"),
        }
    }
}
