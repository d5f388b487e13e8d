//! Block kinds and their rendering style profiles
//!
//! Every content block carries a reference to one of nine fixed style
//! profiles: six heading levels, body text and reference-list text. All
//! profiles share one font family; size, leading and color vary, with size
//! decreasing as the heading level increases.
//!
//! ```rust
//! use blog_press::style::{style_for, BlockKind, HeadingLevel};
//!
//! let h1 = style_for(BlockKind::Heading(HeadingLevel::H1));
//! let body = style_for(BlockKind::Paragraph);
//! assert!(h1.font_size > body.font_size);
//! assert_eq!(h1.font_family, body.font_family);
//! ```

use std::fmt;

/// Font family shared by every profile
pub const FONT_FAMILY: &str = "Times-Roman";

/// Heading level, always within `1..=6`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    pub const H1: HeadingLevel = HeadingLevel(1);
    pub const H2: HeadingLevel = HeadingLevel(2);

    /// Create a heading level, rejecting anything outside `1..=6`
    pub fn new(level: u8) -> Option<Self> {
        (1..=6).contains(&level).then_some(HeadingLevel(level))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

/// Kind of a content block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Heading(HeadingLevel),
    Paragraph,
    Reference,
}

impl BlockKind {
    /// Classify an HTML tag name, `None` for tags that never become blocks
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "p" => Some(BlockKind::Paragraph),
            "li" => Some(BlockKind::Reference),
            _ => tag
                .strip_prefix('h')
                .and_then(|digits| digits.parse::<u8>().ok())
                .and_then(HeadingLevel::new)
                .map(BlockKind::Heading),
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockKind::Heading(level) => write!(f, "h{}", level.get()),
            BlockKind::Paragraph => write!(f, "paragraph"),
            BlockKind::Reference => write!(f, "reference"),
        }
    }
}

/// RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    pub const GREY: Color = Color { r: 128, g: 128, b: 128 };
}

/// Rendering style for one block kind (all lengths in points)
#[derive(Debug, PartialEq)]
pub struct StyleProfile {
    pub name: &'static str,
    pub font_family: &'static str,
    pub font_size: f32,
    pub leading: f32,
    pub space_after: f32,
    pub color: Color,
}

const fn profile(
    name: &'static str,
    font_size: f32,
    leading: f32,
    space_after: f32,
    color: Color,
) -> StyleProfile {
    StyleProfile {
        name,
        font_family: FONT_FAMILY,
        font_size,
        leading,
        space_after,
        color,
    }
}

static HEADINGS: [StyleProfile; 6] = [
    profile("h1", 24.0, 28.8, 12.0, Color::BLACK),
    profile("h2", 18.0, 21.6, 12.0, Color::GREY),
    profile("h3", 16.0, 19.2, 10.0, Color::GREY),
    profile("h4", 14.0, 16.8, 8.0, Color::GREY),
    profile("h5", 13.0, 15.6, 6.0, Color::GREY),
    profile("h6", 12.5, 15.0, 6.0, Color::GREY),
];

static BODY: StyleProfile = profile("body", 12.0, 18.0, 18.0, Color::BLACK);

static REFERENCE: StyleProfile = profile("reference", 10.0, 13.0, 6.0, Color::GREY);

/// Look up the style profile for a block kind
pub fn style_for(kind: BlockKind) -> &'static StyleProfile {
    match kind {
        BlockKind::Heading(level) => &HEADINGS[usize::from(level.get() - 1)],
        BlockKind::Paragraph => &BODY,
        BlockKind::Reference => &REFERENCE,
    }
}
