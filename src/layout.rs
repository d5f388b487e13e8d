//! Plain-text page layout
//!
//! `TextRenderer` typesets blocks onto fixed-size pages. Each block is wrapped
//! to the number of glyphs its font size allows across the text column, lines
//! advance by the profile's leading, and blocks are separated by the profile's
//! space-after. A block that does not fit on the current page continues on the
//! next one; a heading is never left alone at the bottom of a page.
//!
//! ```rust
//! use blog_press::document::ContentBlock;
//! use blog_press::layout::TextRenderer;
//!
//! let renderer = TextRenderer::new();
//! let pages = renderer.layout(&[ContentBlock::paragraph("Short text.")]);
//! assert_eq!(pages.len(), 1);
//! assert!(pages[0].contains("Short text."));
//! ```

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::document::ContentBlock;
use crate::error::PressError;
use crate::render::{PagedDocument, Renderer};
use crate::style::{BlockKind, StyleProfile};

/// Average glyph advance as a fraction of the font size
const AVERAGE_GLYPH_WIDTH: f32 = 0.5;

/// Page size and margins in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl PageGeometry {
    /// US Letter with one-inch margins
    pub const LETTER: PageGeometry = PageGeometry {
        width: 612.0,
        height: 792.0,
        margin: 72.0,
    };

    fn text_width(&self) -> f32 {
        (self.width - 2.0 * self.margin).max(0.0)
    }

    fn text_height(&self) -> f32 {
        (self.height - 2.0 * self.margin).max(0.0)
    }

    /// Glyphs per line for a style
    fn columns(&self, style: &StyleProfile) -> usize {
        let glyph = (style.font_size * AVERAGE_GLYPH_WIDTH).max(1.0);
        ((self.text_width() / glyph).floor() as usize).max(1)
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::LETTER
    }
}

/// Reference renderer producing paged plain-text artifacts
#[derive(Debug, Clone, Default)]
pub struct TextRenderer {
    geometry: PageGeometry,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn geometry(&self) -> PageGeometry {
        self.geometry
    }

    /// Lay blocks out into page texts; never returns zero pages
    pub fn layout(&self, blocks: &[ContentBlock]) -> Vec<String> {
        let mut pages = PageBuilder::new(self.geometry.text_height());

        for (index, block) in blocks.iter().enumerate() {
            let style = block.style();
            let lines = wrap(block.text(), self.geometry.columns(style));

            // Keep a heading together with the first line of what follows
            let mut needed = style.leading * lines.len() as f32;
            if matches!(block.kind(), BlockKind::Heading(_))
                && let Some(next) = blocks.get(index + 1)
            {
                needed += next.style().leading;
            }
            if needed <= pages.capacity && !pages.fits(needed) {
                pages.break_page();
            }

            for line in lines {
                pages.push_line(line, style.leading);
            }
            pages.push_space(style.space_after);
        }

        pages.finish()
    }
}

impl Renderer for TextRenderer {
    fn render(&self, blocks: &[ContentBlock], destination: &Path) -> Result<usize, PressError> {
        let document = PagedDocument::new(self.layout(blocks));
        fs::write(destination, document.encode()).map_err(|e| {
            PressError::RenderError(format!("Cannot write {}: {}", destination.display(), e))
        })?;

        debug!(
            destination = %destination.display(),
            blocks = blocks.len(),
            pages = document.page_count(),
            "rendered artifact"
        );
        Ok(document.page_count())
    }

    fn extension(&self) -> &str {
        "txt"
    }
}

/// Accumulates lines into pages, tracking the vertical cursor in points
struct PageBuilder {
    capacity: f32,
    cursor: f32,
    current: Vec<String>,
    pages: Vec<String>,
}

impl PageBuilder {
    fn new(capacity: f32) -> Self {
        Self {
            capacity,
            cursor: 0.0,
            current: Vec::new(),
            pages: Vec::new(),
        }
    }

    fn fits(&self, height: f32) -> bool {
        self.cursor + height <= self.capacity
    }

    fn push_line(&mut self, line: String, leading: f32) {
        if !self.current.is_empty() && !self.fits(leading) {
            self.break_page();
        }
        self.current.push(line);
        self.cursor += leading;
    }

    /// Vertical space between blocks, rendered as one blank line
    fn push_space(&mut self, space: f32) {
        if self.current.is_empty() {
            return;
        }
        if self.fits(space) {
            self.current.push(String::new());
            self.cursor += space;
        } else {
            self.break_page();
        }
    }

    fn break_page(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let mut lines = std::mem::take(&mut self.current);
        while lines.last().is_some_and(String::is_empty) {
            lines.pop();
        }
        self.pages.push(lines.join("\n"));
        self.cursor = 0.0;
    }

    fn finish(mut self) -> Vec<String> {
        self.break_page();
        if self.pages.is_empty() {
            self.pages.push(String::new());
        }
        self.pages
    }
}

/// Greedy word wrap; words longer than a line are split
fn wrap(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_len = 0;

    for word in text.split_whitespace() {
        let chars: Vec<char> = word.chars().collect();
        for chunk in chars.chunks(columns) {
            let needed = if line_len == 0 { chunk.len() } else { line_len + 1 + chunk.len() };
            if needed > columns && line_len > 0 {
                lines.push(std::mem::take(&mut line));
                line_len = 0;
            }
            if line_len > 0 {
                line.push(' ');
                line_len += 1;
            }
            line.extend(chunk);
            line_len += chunk.len();
        }
    }

    if line_len > 0 {
        lines.push(line);
    }
    lines
}
