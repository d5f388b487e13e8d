//! Blog Press - web articles to paginated documents and periodic collections
//!
//! This library extracts the readable content of a web article into an
//! ordered sequence of styled blocks, renders it into a paginated artifact and
//! merges successive articles into a running collection with a page-indexed
//! table of contents.
//!
//! # Architecture
//!
//! The library is structured into several modules:
//! - `style`: Block kinds and their rendering style profiles
//! - `charset`: Character encoding detection and handling
//! - `parser`: HTML5 parsing using html5ever
//! - `metadata`: Title and author extraction
//! - `profile`: Source classification (article / encyclopedia)
//! - `extractor`: Noise removal and block extraction
//! - `render`: Renderer trait and the paged artifact format
//! - `layout`: Plain-text reference renderer
//! - `naming`: Artifact and collection names
//! - `collection`: Collection state and its persisted document
//! - `aggregator`: Page-aware merging with cover and table of contents
//! - `fetch`: Source retrieval and URL validation
//! - `config`: Session options
//! - `press`: End-to-end pipeline for one URL
//!
//! # Example
//!
//! ```rust
//! use blog_press::Extractor;
//!
//! let doc = Extractor::new().extract(
//!     "<main><h1>Hello</h1><p>Hello\u{200B}World</p></main>",
//!     "https://example.com/hello",
//! );
//! assert_eq!(doc.blocks[1].text(), "HelloWorld");
//! ```

// Module declarations
pub mod aggregator;
pub mod charset;
pub mod collection;
pub mod config;
pub mod document;
pub mod error;
pub mod extractor;
pub mod fetch;
pub mod layout;
pub mod metadata;
pub mod naming;
pub mod parser;
pub mod press;
pub mod profile;
pub mod render;
pub mod style;

// Re-export main types for convenience
pub use aggregator::{Aggregator, StagedCollection};
pub use collection::{Collection, TocEntry};
pub use config::PressOptions;
pub use document::{ContentBlock, ExtractedDocument};
pub use error::PressError;
pub use extractor::Extractor;
pub use fetch::{Fetched, Fetcher, SourceKind};
pub use layout::TextRenderer;
pub use naming::{FilenameGenerator, Period};
pub use press::{CollectionUpdate, Press, PressOutcome};
pub use render::{RenderedArticle, Renderer};
pub use style::{BlockKind, HeadingLevel, StyleProfile};

#[cfg(feature = "http")]
pub use fetch::HttpFetcher;
