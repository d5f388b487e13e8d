//! Title and author extraction
//!
//! This is the secondary extraction path used by features that need to name
//! an article (cover pages, table of contents entries, identity-based file
//! names). It runs over the unstripped tree, because author boxes are exactly
//! the regions the block extractor removes.
//!
//! # Sources
//!
//! - Title: `og:title` / `twitter:title` meta > `<title>` element
//! - Author: `<meta name="author">` > first `rel="author"` element > first
//!   element whose class names an author container (`author-name`, `byline`)
//!
//! ```rust
//! use blog_press::metadata::MetadataExtractor;
//! use blog_press::parser::parse_markup;
//!
//! let dom = parse_markup(r#"<title>Post</title><span class="byline">By Ada</span>"#);
//! let metadata = MetadataExtractor::new().extract(&dom);
//!
//! assert_eq!(metadata.title.as_deref(), Some("Post"));
//! assert_eq!(metadata.author.as_deref(), Some("Ada"));
//! ```

use markup5ever_rcdom::{Handle, NodeData, RcDom};
use std::cell::Ref;

/// Class markers of elements that hold an author name
const AUTHOR_CONTAINER_MARKERS: &[&str] = &["author-name", "byline"];

/// Title and author of an article
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ArticleMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
}

/// Extracts [`ArticleMetadata`] from a DOM tree
#[derive(Debug, Default)]
pub struct MetadataExtractor;

impl MetadataExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract title and author; either may be absent
    pub fn extract(&self, dom: &RcDom) -> ArticleMetadata {
        let mut metadata = ArticleMetadata::default();
        let mut meta_title = None;

        self.traverse_for_meta(&dom.document, &mut meta_title, &mut metadata.author);

        metadata.title = meta_title
            .or_else(|| self.find_first(&dom.document, &|name, _| name == "title"))
            .and_then(non_empty);

        if metadata.author.is_none() {
            metadata.author = self
                .find_first(&dom.document, &|_, attrs| {
                    get_attr(attrs, "rel").is_some_and(|rel| {
                        rel.split_ascii_whitespace().any(|token| token == "author")
                    })
                })
                .or_else(|| {
                    self.find_first(&dom.document, &|_, attrs| {
                        get_attr(attrs, "class").is_some_and(|class| {
                            AUTHOR_CONTAINER_MARKERS
                                .iter()
                                .any(|marker| class.contains(marker))
                        })
                    })
                });
        }
        metadata.author = metadata
            .author
            .map(|author| strip_by_prefix(&author))
            .and_then(non_empty);

        metadata
    }

    /// Collect title and author from `<meta>` tags, first match wins
    fn traverse_for_meta(
        &self,
        node: &Handle,
        title: &mut Option<String>,
        author: &mut Option<String>,
    ) {
        if let NodeData::Element {
            ref name,
            ref attrs,
            ..
        } = node.data
            && name.local.as_ref() == "meta"
        {
            let attrs = attrs.borrow();
            let key = get_attr(&attrs, "property").or_else(|| get_attr(&attrs, "name"));
            if let Some(content) = get_attr(&attrs, "content") {
                match key.as_deref() {
                    Some("og:title") | Some("twitter:title") if title.is_none() => {
                        *title = Some(collapse_whitespace(&content));
                    }
                    Some("author") if author.is_none() => {
                        *author = Some(collapse_whitespace(&content));
                    }
                    _ => {}
                }
            }
        }

        for child in node.children.borrow().iter() {
            self.traverse_for_meta(child, title, author);
        }
    }

    /// Text of the first element (document order) accepted by `predicate`
    fn find_first(
        &self,
        node: &Handle,
        predicate: &dyn Fn(&str, &Ref<Vec<html5ever::Attribute>>) -> bool,
    ) -> Option<String> {
        if let NodeData::Element {
            ref name,
            ref attrs,
            ..
        } = node.data
            && predicate(name.local.as_ref(), &attrs.borrow())
        {
            let mut text = String::new();
            collect_text(node, &mut text);
            let text = collapse_whitespace(&text);
            // `<link rel="author">` and friends carry no text, keep looking
            if !text.is_empty() {
                return Some(text);
            }
        }

        node.children
            .borrow()
            .iter()
            .find_map(|child| self.find_first(child, predicate))
    }
}

/// Get attribute value from element
pub(crate) fn get_attr(attrs: &Ref<Vec<html5ever::Attribute>>, name: &str) -> Option<String> {
    attrs
        .iter()
        .find(|attr| attr.name.local.as_ref() == name)
        .map(|attr| attr.value.to_string())
}

/// Append the text content of a node and its descendants
pub(crate) fn collect_text(node: &Handle, output: &mut String) {
    match node.data {
        NodeData::Text { ref contents } => output.push_str(&contents.borrow()),
        NodeData::Element { .. } | NodeData::Document => {
            for child in node.children.borrow().iter() {
                collect_text(child, output);
            }
        }
        _ => {}
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_by_prefix(author: &str) -> String {
    let trimmed = author.trim();
    match trimmed.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("by ") => trimmed[3..].trim().to_string(),
        _ => trimmed.to_string(),
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}
