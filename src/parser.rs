//! HTML5 parsing using html5ever
//!
//! Article markup from the open web is routinely malformed. html5ever follows
//! the WHATWG tree-construction algorithm, so unclosed and misnested tags are
//! repaired the same way a browser would repair them. What is rejected is a
//! body that is not text at all: undecodable bytes, or decoded text carrying
//! NUL characters (a binary payload, or UTF-16 served without a BOM).
//!
//! # Examples
//!
//! ```rust
//! use blog_press::parser::parse_markup;
//!
//! // Unclosed tags are repaired, not rejected
//! let dom = parse_markup("<main><h1>Hello<p>World");
//! assert!(!dom.document.children.borrow().is_empty());
//! ```

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::RcDom;

use crate::charset::decode_markup;
use crate::error::PressError;

/// Parse already-decoded markup into a DOM tree
///
/// Scripts are never executed; `<script>` and `<noscript>` elements stay in the
/// tree until the extractor strips them.
pub fn parse_markup(markup: &str) -> RcDom {
    parse_document(RcDom::default(), Default::default()).one(markup)
}

/// Decode raw bytes and parse them into a DOM tree
///
/// # Errors
///
/// - `PressError::EncodingError`: the bytes are invalid for the detected charset
/// - `PressError::ParseError`: the decoded body contains NUL characters
pub fn parse_markup_bytes(markup: &[u8], content_type: Option<&str>) -> Result<RcDom, PressError> {
    let decoded = decode_markup(markup, content_type)?;
    if let Some(offset) = decoded.find('\0') {
        return Err(PressError::ParseError(format!(
            "NUL character at offset {offset}, body is not text markup"
        )));
    }
    Ok(parse_markup(&decoded))
}
