//! Content extraction - turns article markup into ordered content blocks
//!
//! # Pipeline
//!
//! 1. **Parse** the markup with html5ever and read title/author from the
//!    untouched tree
//! 2. **Strip noise**: `script`, `style`, `aside`, `noscript` and `template`
//!    elements, plus any element whose class or id names a configured
//!    unwanted-element marker, are detached from the tree with their
//!    descendants
//! 3. **Select the region**: the first `<main>` (or `role="main"`) element,
//!    otherwise the whole document
//! 4. **Walk** the region depth-first, left-to-right. Every heading and
//!    paragraph becomes one block whose text is cleaned of zero-width spaces
//!    and noise glyphs
//! 5. **Filter**: blocks containing any unwanted phrase as a substring are
//!    dropped
//! 6. **References**: encyclopedia sources get their reference list appended
//!    after the content
//!
//! Block order always equals document order; nothing is sorted or regrouped.
//!
//! # Degradation
//!
//! Extraction never fails. Empty markup, or markup without headings and
//! paragraphs, yields an empty block sequence. Bytes that cannot be decoded
//! or parsed become a single paragraph of their tag-free text.
//!
//! # Example
//!
//! ```rust
//! use blog_press::extractor::Extractor;
//! use blog_press::style::{BlockKind, HeadingLevel};
//!
//! let markup = r#"
//!     <nav><p>Home | About</p></nav>
//!     <main>
//!       <h1>Title</h1>
//!       <p>First paragraph.</p>
//!       <aside><p>Related posts</p></aside>
//!       <p>This site uses Akismet to reduce spam.</p>
//!     </main>
//! "#;
//!
//! let doc = Extractor::new().extract(markup, "https://blog.example.com/title");
//! assert_eq!(
//!     doc.kinds(),
//!     vec![BlockKind::Heading(HeadingLevel::H1), BlockKind::Paragraph]
//! );
//! assert_eq!(doc.blocks[1].text(), "First paragraph.");
//! ```

use markup5ever_rcdom::{Handle, NodeData, RcDom};
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, warn};

use crate::document::{ContentBlock, ExtractedDocument};
use crate::metadata::{MetadataExtractor, collect_text, get_attr};
use crate::parser::{parse_markup, parse_markup_bytes};
use crate::profile::SourceProfile;
use crate::style::{BlockKind, HeadingLevel};

/// Elements removed with all their descendants before traversal
const NON_CONTENT_ELEMENTS: &[&str] = &["script", "style", "aside", "noscript", "template"];

/// Elements never removed by marker matching, whatever their class says
const PROTECTED_ELEMENTS: &[&str] = &["html", "body"];

/// Class substrings identifying a references container
const REFERENCE_CONTAINER_MARKERS: &[&str] = &["references", "reflist"];

/// Class of the span holding a reference's text without its backlinks
const REFERENCE_TEXT_CLASS: &str = "reference-text";

/// Heading placed before appended references
pub const REFERENCES_HEADING: &str = "References";

/// Phrases dropped by default
pub const DEFAULT_UNWANTED_PHRASES: &[&str] = &[
    "This site uses Akismet to reduce spam",
    "Learn how your comment data is processed",
    "Leave a Reply",
    "Share this:",
    "Like this:",
];

/// Class/id markers removed by default
pub const DEFAULT_UNWANTED_ELEMENT_MARKERS: &[&str] = &[
    "author-box",
    "sharedaddy",
    "jp-relatedposts",
    "comments-area",
    "comment-respond",
];

/// Extraction options
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Blocks containing any of these (case-sensitive substring) are dropped
    pub unwanted_phrases: Vec<String>,
    /// Elements whose class token or id equals one of these are removed
    pub unwanted_element_markers: Vec<String>,
    /// Deepest heading level kept as a heading; deeper headings become paragraphs
    pub max_heading_level: u8,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            unwanted_phrases: DEFAULT_UNWANTED_PHRASES
                .iter()
                .map(|phrase| phrase.to_string())
                .collect(),
            unwanted_element_markers: DEFAULT_UNWANTED_ELEMENT_MARKERS
                .iter()
                .map(|marker| marker.to_string())
                .collect(),
            max_heading_level: 6,
        }
    }
}

/// Article content extractor
///
/// Stateless apart from its options; one extractor can process any number
/// of documents.
pub struct Extractor {
    options: ExtractOptions,
    metadata: MetadataExtractor,
}

impl Extractor {
    /// Create an extractor with the default phrase and marker lists
    pub fn new() -> Self {
        Self::with_options(ExtractOptions::default())
    }

    /// Create an extractor with custom options
    ///
    /// Empty phrases and markers are discarded, since an empty substring would
    /// match every block.
    pub fn with_options(mut options: ExtractOptions) -> Self {
        options.unwanted_phrases.retain(|phrase| !phrase.is_empty());
        options
            .unwanted_element_markers
            .retain(|marker| !marker.trim().is_empty());
        options.max_heading_level = options.max_heading_level.clamp(1, 6);

        Self {
            options,
            metadata: MetadataExtractor::new(),
        }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract blocks from decoded markup
    pub fn extract(&self, markup: &str, source_url: &str) -> ExtractedDocument {
        if markup.trim().is_empty() {
            debug!(source = source_url, "empty markup, no content found");
            return ExtractedDocument {
                profile: SourceProfile::classify(source_url),
                ..Default::default()
            };
        }

        let dom = parse_markup(markup);
        self.extract_dom(&dom, source_url)
    }

    /// Extract blocks from raw fetched bytes
    ///
    /// The charset is detected from the BOM, the Content-Type header and
    /// `<meta>` tags. Undecodable bytes degrade to a single plain-text
    /// paragraph.
    pub fn extract_bytes(
        &self,
        markup: &[u8],
        content_type: Option<&str>,
        source_url: &str,
    ) -> ExtractedDocument {
        if markup.iter().all(u8::is_ascii_whitespace) {
            return self.extract("", source_url);
        }

        match parse_markup_bytes(markup, content_type) {
            Ok(dom) => self.extract_dom(&dom, source_url),
            Err(err) => {
                warn!(
                    source = source_url,
                    error = %err,
                    "markup could not be parsed, degrading to plain text"
                );
                self.extract_plain_text(&String::from_utf8_lossy(markup), source_url)
            }
        }
    }

    /// Extract blocks from an already parsed tree
    ///
    /// The tree is modified: noise elements are detached from it.
    pub fn extract_dom(&self, dom: &RcDom, source_url: &str) -> ExtractedDocument {
        let profile = SourceProfile::classify(source_url);
        let metadata = self.metadata.extract(dom);

        self.strip_noise(&dom.document);

        let region = find_main_region(&dom.document).unwrap_or_else(|| dom.document.clone());
        let mut blocks = Vec::new();
        self.collect_blocks(&region, &mut blocks);

        if profile.wants_references() {
            self.append_references(&dom.document, &mut blocks);
        }

        if blocks.is_empty() {
            debug!(source = source_url, "no content found");
        } else {
            debug!(source = source_url, blocks = blocks.len(), ?profile, "extracted blocks");
        }

        ExtractedDocument {
            title: metadata.title,
            author: metadata.author,
            profile,
            blocks,
        }
    }

    /// Treat text as one unclassified paragraph (markup tags removed)
    fn extract_plain_text(&self, text: &str, source_url: &str) -> ExtractedDocument {
        static SCRIPT_OR_STYLE: OnceLock<Option<Regex>> = OnceLock::new();
        static TAG: OnceLock<Option<Regex>> = OnceLock::new();

        let mut plain = text.to_string();
        if let Some(regex) = SCRIPT_OR_STYLE
            .get_or_init(|| {
                Regex::new(r"(?is)<(?:script|style)\b[^>]*>.*?</(?:script|style)\s*>").ok()
            })
            .as_ref()
        {
            plain = regex.replace_all(&plain, " ").into_owned();
        }
        if let Some(regex) = TAG.get_or_init(|| Regex::new(r"<[^>]*>").ok()).as_ref() {
            plain = regex.replace_all(&plain, " ").into_owned();
        }
        plain.retain(|c| !c.is_control() || c.is_whitespace());

        let mut blocks = Vec::new();
        self.push_block(BlockKind::Paragraph, &plain, &mut blocks);

        ExtractedDocument {
            profile: SourceProfile::classify(source_url),
            blocks,
            ..Default::default()
        }
    }

    /// Detach non-content elements from the tree, recursively
    fn strip_noise(&self, node: &Handle) {
        node.children
            .borrow_mut()
            .retain(|child| !self.is_noise(child));

        for child in node.children.borrow().iter() {
            self.strip_noise(child);
        }
    }

    fn is_noise(&self, node: &Handle) -> bool {
        let NodeData::Element {
            ref name,
            ref attrs,
            ..
        } = node.data
        else {
            return false;
        };

        let tag = name.local.as_ref();
        if NON_CONTENT_ELEMENTS.contains(&tag) {
            return true;
        }
        if PROTECTED_ELEMENTS.contains(&tag) {
            return false;
        }

        let attrs = attrs.borrow();
        let class = get_attr(&attrs, "class").unwrap_or_default();
        let id = get_attr(&attrs, "id").unwrap_or_default();

        self.options.unwanted_element_markers.iter().any(|marker| {
            id == *marker
                || class
                    .split_ascii_whitespace()
                    .any(|token| token == marker.as_str())
        })
    }

    /// Walk a region in document order, emitting heading and paragraph blocks
    fn collect_blocks(&self, node: &Handle, blocks: &mut Vec<ContentBlock>) {
        if let NodeData::Element { ref name, .. } = node.data
            && let Some(kind) = self.classify(name.local.as_ref())
        {
            let mut raw = String::new();
            collect_text(node, &mut raw);
            self.push_block(kind, &raw, blocks);
            return;
        }

        for child in node.children.borrow().iter() {
            self.collect_blocks(child, blocks);
        }
    }

    /// Block kind for a tag inside the content region
    fn classify(&self, tag: &str) -> Option<BlockKind> {
        match BlockKind::from_tag(tag)? {
            BlockKind::Heading(level) if level.get() > self.options.max_heading_level => {
                Some(BlockKind::Paragraph)
            }
            // List items only become blocks inside a references container
            BlockKind::Reference => None,
            kind => Some(kind),
        }
    }

    /// Clean, filter and append one block
    fn push_block(&self, kind: BlockKind, raw: &str, blocks: &mut Vec<ContentBlock>) {
        let text = clean_text(raw);
        if text.is_empty() {
            return;
        }

        if let Some(phrase) = self
            .options
            .unwanted_phrases
            .iter()
            .find(|phrase| text.contains(phrase.as_str()))
        {
            debug!(%kind, phrase = phrase.as_str(), "dropping block with unwanted phrase");
            return;
        }

        blocks.push(ContentBlock::new(kind, text));
    }

    /// Append the first references container's items as reference blocks
    fn append_references(&self, document: &Handle, blocks: &mut Vec<ContentBlock>) {
        let Some(container) = find_element(document, &|tag, class| {
            tag != "html"
                && tag != "body"
                && REFERENCE_CONTAINER_MARKERS
                    .iter()
                    .any(|marker| class.contains(marker))
        }) else {
            debug!("no references container found");
            return;
        };

        let mut items = Vec::new();
        collect_list_items(&container, &mut items);

        let mut references = Vec::new();
        for item in &items {
            self.push_block(BlockKind::Reference, &reference_text(item), &mut references);
        }

        if references.is_empty() {
            return;
        }

        // The heading is filtered like any other block; the items stand on their own
        self.push_block(BlockKind::Heading(HeadingLevel::H2), REFERENCES_HEADING, blocks);
        blocks.extend(references);
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Remove zero-width spaces and noise glyphs, then collapse whitespace
///
/// ```rust
/// use blog_press::extractor::clean_text;
///
/// assert_eq!(clean_text("Hello\u{200b}World"), "HelloWorld");
/// assert_eq!(clean_text("  ■ Breaking   news ∆ "), "Breaking news");
/// ```
pub fn clean_text(raw: &str) -> String {
    static NOISE: OnceLock<Option<Regex>> = OnceLock::new();
    let noise = NOISE.get_or_init(|| Regex::new("[\u{200B}\u{FEFF}■∆]").ok());

    let stripped = match noise.as_ref() {
        Some(regex) => regex.replace_all(raw, ""),
        None => raw.into(),
    };

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First `<main>` or `role="main"` element in document order
fn find_main_region(node: &Handle) -> Option<Handle> {
    if let NodeData::Element {
        ref name,
        ref attrs,
        ..
    } = node.data
        && (name.local.as_ref() == "main"
            || get_attr(&attrs.borrow(), "role").is_some_and(|role| role == "main"))
    {
        return Some(node.clone());
    }

    node.children.borrow().iter().find_map(find_main_region)
}

/// First element in document order accepted by `predicate(tag, class)`
fn find_element(node: &Handle, predicate: &dyn Fn(&str, &str) -> bool) -> Option<Handle> {
    if let NodeData::Element {
        ref name,
        ref attrs,
        ..
    } = node.data
    {
        let class = get_attr(&attrs.borrow(), "class").unwrap_or_default();
        if predicate(name.local.as_ref(), &class) {
            return Some(node.clone());
        }
    }

    node.children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, predicate))
}

/// Collect `li` elements in document order without descending into them
fn collect_list_items(node: &Handle, items: &mut Vec<Handle>) {
    for child in node.children.borrow().iter() {
        match child.data {
            NodeData::Element { ref name, .. } if name.local.as_ref() == "li" => {
                items.push(child.clone());
            }
            _ => collect_list_items(child, items),
        }
    }
}

/// Text of a reference item, without its `^` backlinks
fn reference_text(item: &Handle) -> String {
    let mut text = String::new();
    match find_element(item, &|_, class| {
        class
            .split_ascii_whitespace()
            .any(|token| token == REFERENCE_TEXT_CLASS)
    }) {
        Some(span) => collect_text(&span, &mut text),
        None => collect_text(item, &mut text),
    }

    text.trim_start_matches(|c: char| c == '^' || c.is_whitespace())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const BLOG_URL: &str = "https://blog.example.com/2024/01/post";
    const WIKI_URL: &str = "https://en.wikipedia.org/wiki/Typesetting";

    fn extract(markup: &str) -> ExtractedDocument {
        Extractor::new().extract(markup, BLOG_URL)
    }

    fn texts(doc: &ExtractedDocument) -> Vec<&str> {
        doc.blocks.iter().map(ContentBlock::text).collect()
    }

    fn h(level: u8) -> BlockKind {
        BlockKind::Heading(HeadingLevel::new(level).unwrap())
    }

    #[test]
    fn test_order_preserved() {
        let doc = extract("<h1>A</h1><p>b</p><p>c</p><h2>D</h2><p>e</p>");
        assert_eq!(
            doc.kinds(),
            vec![h(1), BlockKind::Paragraph, BlockKind::Paragraph, h(2), BlockKind::Paragraph]
        );
        assert_eq!(texts(&doc), vec!["A", "b", "c", "D", "e"]);
    }

    #[test]
    fn test_headings_and_paragraphs_interleave_in_document_order() {
        // Headings are not hoisted above paragraphs that precede them
        let doc = extract("<p>intro</p><h2>Later heading</h2><p>outro</p>");
        assert_eq!(texts(&doc), vec!["intro", "Later heading", "outro"]);
    }

    #[test]
    fn test_unwanted_phrase_dropped_as_substring() {
        let doc = extract(
            "<p>Keep me.</p><p>Note: This site uses Akismet to reduce spam. Learn more.</p><p>Me too.</p>",
        );
        assert_eq!(texts(&doc), vec!["Keep me.", "Me too."]);
    }

    #[test]
    fn test_phrase_matching_is_case_sensitive() {
        let doc = extract("<p>this site uses akismet to reduce spam</p>");
        assert_eq!(doc.blocks.len(), 1);
    }

    #[test]
    fn test_zero_width_space_removed() {
        let doc = extract("<p>Hello\u{200b}World</p>");
        assert_eq!(texts(&doc), vec!["HelloWorld"]);
    }

    #[test]
    fn test_noise_glyphs_removed() {
        let doc = extract("<h2>■ Section ∆</h2><p>∆</p>");
        assert_eq!(texts(&doc), vec!["Section"]);
    }

    #[test]
    fn test_whitespace_collapsed() {
        let doc = extract("<p>  Text   with\n   newlines\tand tabs </p>");
        assert_eq!(texts(&doc), vec!["Text with newlines and tabs"]);
    }

    #[test]
    fn test_inline_formatting_flattened() {
        let doc = extract(r#"<p>Read <a href="/x">the <em>docs</em></a> <strong>now</strong>.</p>"#);
        assert_eq!(texts(&doc), vec!["Read the docs now."]);
    }

    #[test]
    fn test_empty_markup_yields_empty_document() {
        assert!(extract("").is_empty());
        assert!(extract("   \n  ").is_empty());
    }

    #[test]
    fn test_markup_without_blocks_yields_empty_document() {
        let doc = extract("<div><span>loose text</span><ul><li>item</li></ul></div>");
        assert!(doc.is_empty());
    }

    #[test]
    fn test_non_content_elements_removed() {
        let doc = extract(
            r#"<main>
                <script>var p = "<p>alert</p>";</script>
                <style>p { color: red }</style>
                <p>Visible</p>
                <aside><p>Sidebar</p></aside>
                <noscript><p>Enable JS</p></noscript>
            </main>"#,
        );
        assert_eq!(texts(&doc), vec!["Visible"]);
    }

    #[test]
    fn test_unwanted_element_markers_removed() {
        let doc = extract(
            r#"<main>
                <p>Body</p>
                <div class="author-box wide"><h3>About Ada</h3><p>Ada writes things.</p></div>
                <div id="comment-respond"><p>Leave a comment</p></div>
            </main>"#,
        );
        assert_eq!(texts(&doc), vec!["Body"]);
    }

    #[test]
    fn test_marker_matches_class_tokens_not_substrings() {
        let doc = extract(r#"<div class="author-boxed-quote"><p>Quoted</p></div>"#);
        assert_eq!(texts(&doc), vec!["Quoted"]);
    }

    #[test]
    fn test_marker_on_body_does_not_remove_document() {
        let options = ExtractOptions {
            unwanted_element_markers: vec!["single-post".to_string()],
            ..Default::default()
        };
        let doc = Extractor::with_options(options)
            .extract(r#"<body class="single-post"><p>Body</p></body>"#, BLOG_URL);
        assert_eq!(texts(&doc), vec!["Body"]);
    }

    #[test]
    fn test_main_region_selected() {
        let doc = extract(
            r#"<header><h1>Site name</h1></header>
               <main><h1>Post</h1><p>Content</p></main>
               <footer><p>Copyright</p></footer>"#,
        );
        assert_eq!(texts(&doc), vec!["Post", "Content"]);
    }

    #[test]
    fn test_role_main_region_selected() {
        let doc = extract(
            r#"<div><p>Banner</p></div><div role="main"><p>Content</p></div>"#,
        );
        assert_eq!(texts(&doc), vec!["Content"]);
    }

    #[test]
    fn test_first_main_wins() {
        let doc = extract("<main><p>First</p></main><main><p>Second</p></main>");
        assert_eq!(texts(&doc), vec!["First"]);
    }

    #[test]
    fn test_falls_back_to_whole_document() {
        let doc = extract("<div><h1>Title</h1></div><section><p>Text</p></section>");
        assert_eq!(texts(&doc), vec!["Title", "Text"]);
    }

    #[test]
    fn test_all_heading_levels_styled() {
        let doc = extract("<h1>1</h1><h2>2</h2><h3>3</h3><h4>4</h4><h5>5</h5><h6>6</h6>");
        let names: Vec<&str> = doc.blocks.iter().map(|b| b.style().name).collect();
        assert_eq!(names, vec!["h1", "h2", "h3", "h4", "h5", "h6"]);
    }

    #[test]
    fn test_headings_beyond_max_level_become_paragraphs() {
        let options = ExtractOptions {
            max_heading_level: 2,
            ..Default::default()
        };
        let doc = Extractor::with_options(options).extract("<h2>Kept</h2><h3>Demoted</h3>", BLOG_URL);
        assert_eq!(doc.kinds(), vec![h(2), BlockKind::Paragraph]);
        assert_eq!(doc.blocks[1].style().name, "body");
    }

    #[test]
    fn test_empty_phrase_ignored() {
        let options = ExtractOptions {
            unwanted_phrases: vec![String::new()],
            ..Default::default()
        };
        let doc = Extractor::with_options(options).extract("<p>Survives</p>", BLOG_URL);
        assert_eq!(texts(&doc), vec!["Survives"]);
    }

    #[test]
    fn test_metadata_read_before_stripping() {
        let doc = extract(
            r#"<head><title>Post title</title></head>
               <body><div class="author-box"><span class="author-name">Ada</span><p>Bio</p></div>
               <p>Text</p></body>"#,
        );
        assert_eq!(doc.title.as_deref(), Some("Post title"));
        assert_eq!(doc.author.as_deref(), Some("Ada"));
        assert_eq!(texts(&doc), vec!["Text"]);
    }

    #[test]
    fn test_wikipedia_references_appended() {
        let markup = r##"
            <main>
              <h1>Typesetting</h1>
              <p>Typesetting is the composition of text.</p>
              <div class="reflist">
                <ol class="references">
                  <li id="cite_note-1"><span class="mw-cite-backlink"><a href="#r1">^</a></span>
                      <span class="reference-text">Smith, <i>Type</i>, 1999.</span></li>
                  <li id="cite_note-2">^ Jones, Letters, 2004.</li>
                </ol>
              </div>
            </main>"##;
        let doc = Extractor::new().extract(markup, WIKI_URL);

        assert_eq!(doc.profile, SourceProfile::Encyclopedia);
        assert_eq!(
            doc.kinds(),
            vec![h(1), BlockKind::Paragraph, h(2), BlockKind::Reference, BlockKind::Reference]
        );
        assert_eq!(
            texts(&doc),
            vec![
                "Typesetting",
                "Typesetting is the composition of text.",
                "References",
                "Smith, Type, 1999.",
                "Jones, Letters, 2004.",
            ]
        );
        assert_eq!(doc.blocks[3].style().name, "reference");
    }

    #[test]
    fn test_references_heading_obeys_unwanted_phrases() {
        let extractor = Extractor::with_options(ExtractOptions {
            unwanted_phrases: vec!["References".to_string()],
            ..ExtractOptions::default()
        });
        let markup = r#"<p>Body</p><ol class="references"><li>Smith 1999</li></ol>"#;
        let doc = extractor.extract(markup, WIKI_URL);

        assert_eq!(texts(&doc), vec!["Body", "Smith 1999"]);
        assert_eq!(doc.kinds(), vec![BlockKind::Paragraph, BlockKind::Reference]);
    }

    #[test]
    fn test_references_ignored_for_articles() {
        let markup = r#"<p>Body</p><ol class="references"><li>Cited</li></ol>"#;
        let doc = extract(markup);
        assert_eq!(texts(&doc), vec!["Body"]);
    }

    #[test]
    fn test_empty_references_add_no_heading() {
        let markup = r#"<p>Body</p><ol class="references"></ol>"#;
        let doc = Extractor::new().extract(markup, WIKI_URL);
        assert_eq!(texts(&doc), vec!["Body"]);
    }

    #[test]
    fn test_extract_bytes_transcodes() {
        let doc = Extractor::new().extract_bytes(
            b"<p>Caf\xE9 cr\xE8me</p>",
            Some("text/html; charset=windows-1252"),
            BLOG_URL,
        );
        assert_eq!(texts(&doc), vec!["Café crème"]);
    }

    #[test]
    fn test_extract_bytes_degrades_to_single_paragraph() {
        let doc = Extractor::new().extract_bytes(
            b"<h1>Broken</h1><script>x()</script><p>caf\xC3\x28 text</p>",
            Some("text/html; charset=utf-8"),
            BLOG_URL,
        );
        assert_eq!(doc.kinds(), vec![BlockKind::Paragraph]);
        let text = doc.blocks[0].text();
        assert!(text.starts_with("Broken"), "{text}");
        assert!(text.ends_with("text"), "{text}");
        assert!(!text.contains("x()"), "{text}");
        assert!(!text.contains('<'), "{text}");
    }

    #[test]
    fn test_extract_bytes_meta_utf16_read_as_utf8() {
        let doc = Extractor::new().extract_bytes(
            b"<html><head><meta charset=\"utf-16\"></head><body><p>Hello world</p></body></html>",
            None,
            BLOG_URL,
        );
        assert_eq!(texts(&doc), vec!["Hello world"]);
    }

    #[test]
    fn test_extract_bytes_utf16_without_bom_degrades_to_text() {
        let markup: Vec<u8> = "<p>Hello</p>"
            .encode_utf16()
            .flat_map(u16::to_le_bytes)
            .collect();
        let doc = Extractor::new().extract_bytes(&markup, None, BLOG_URL);
        assert_eq!(doc.kinds(), vec![BlockKind::Paragraph]);
        assert_eq!(texts(&doc), vec!["Hello"]);
    }

    #[test]
    fn test_extract_bytes_empty() {
        assert!(Extractor::new().extract_bytes(b"", None, BLOG_URL).is_empty());
    }

    proptest! {
        #[test]
        fn prop_block_order_matches_markup_order(
            nodes in prop::collection::vec(
                (prop::sample::select(vec!["h1", "h2", "h3", "p"]), "[a-z]{1,12}"),
                0..20,
            )
        ) {
            let markup: String = nodes
                .iter()
                .map(|(tag, text)| format!("<{tag}>{text}</{tag}>"))
                .collect();

            let doc = extract(&markup);

            let expected_kinds: Vec<BlockKind> = nodes
                .iter()
                .map(|(tag, _)| BlockKind::from_tag(tag).unwrap())
                .collect();
            let expected_texts: Vec<&str> = nodes.iter().map(|(_, text)| text.as_str()).collect();
            prop_assert_eq!(doc.kinds(), expected_kinds);
            prop_assert_eq!(texts(&doc), expected_texts);
        }

        #[test]
        fn prop_unwanted_phrase_never_survives(
            before in "[a-zA-Z ]{0,30}",
            after in "[a-zA-Z ]{0,30}",
        ) {
            let markup = format!(
                "<p>{before}This site uses Akismet to reduce spam{after}</p><p>kept</p>"
            );
            let doc = extract(&markup);
            prop_assert!(doc.blocks.iter().all(|b| !b.text().contains("Akismet")));
            prop_assert_eq!(texts(&doc), vec!["kept"]);
        }

        #[test]
        fn prop_cleaned_text_has_no_zero_width_space(
            parts in prop::collection::vec("[a-z]{1,5}", 1..6)
        ) {
            let markup = format!("<p>{}</p>", parts.join("\u{200b}"));
            let doc = extract(&markup);
            prop_assert_eq!(texts(&doc), vec![parts.concat()]);
        }
    }
}
