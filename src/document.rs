//! Content blocks and extracted documents

use crate::profile::SourceProfile;
use crate::style::{BlockKind, HeadingLevel, StyleProfile, style_for};

/// Title used when none could be extracted
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Author used when none could be extracted
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// A single typed unit of content with its resolved style
///
/// Blocks are immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentBlock {
    kind: BlockKind,
    text: String,
    style: &'static StyleProfile,
}

impl ContentBlock {
    /// Create a block, resolving its style through the registry
    pub fn new(kind: BlockKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            style: style_for(kind),
        }
    }

    pub fn heading(level: HeadingLevel, text: impl Into<String>) -> Self {
        Self::new(BlockKind::Heading(level), text)
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(BlockKind::Paragraph, text)
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn style(&self) -> &'static StyleProfile {
        self.style
    }
}

/// Result of running the extractor over one article
#[derive(Debug, Clone, Default)]
pub struct ExtractedDocument {
    pub title: Option<String>,
    pub author: Option<String>,
    pub profile: SourceProfile,
    pub blocks: Vec<ContentBlock>,
}

impl ExtractedDocument {
    /// Title, or "Unknown Title" when none was found
    pub fn title_or_unknown(&self) -> &str {
        self.title.as_deref().unwrap_or(UNKNOWN_TITLE)
    }

    /// Author, or "Unknown Author" when none was found
    pub fn author_or_unknown(&self) -> &str {
        self.author.as_deref().unwrap_or(UNKNOWN_AUTHOR)
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Kinds of all blocks in document order
    pub fn kinds(&self) -> Vec<BlockKind> {
        self.blocks.iter().map(ContentBlock::kind).collect()
    }
}
