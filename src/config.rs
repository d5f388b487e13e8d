//! Session configuration
//!
//! [`PressOptions`] is a plain value handed to [`crate::press::Press`]; nothing
//! in the crate reads global toggles. Options can be loaded from a TOML file in
//! which every key is optional:
//!
//! ```toml
//! include_toc = true
//! include_cover = false
//! auto_add_to_collection = true
//! identity_naming = false
//! deduplicate = true
//! period = "monthly"
//! max_heading_level = 3
//! unwanted_phrases = ["Subscribe to our newsletter"]
//! unwanted_element_markers = ["newsletter-signup"]
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PressError;
use crate::extractor::{DEFAULT_UNWANTED_ELEMENT_MARKERS, DEFAULT_UNWANTED_PHRASES, ExtractOptions};
use crate::naming::Period;

/// Options for a press session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PressOptions {
    /// Regenerate the collection's table of contents on each merge
    pub include_toc: bool,
    /// Put a title/author cover page before each merged article
    pub include_cover: bool,
    /// Merge each rendered article into the period's collection
    pub auto_add_to_collection: bool,
    /// Blocks containing any of these are dropped
    pub unwanted_phrases: BTreeSet<String>,
    /// Elements whose id or class token matches are removed with their subtree
    pub unwanted_element_markers: BTreeSet<String>,
    /// Name artifacts after date, author and title instead of the URL
    pub identity_naming: bool,
    /// Skip the merge when the collection already holds the identifier
    pub deduplicate: bool,
    /// Collection period
    pub period: Period,
    /// Deepest heading level kept as a heading
    pub max_heading_level: u8,
}

impl Default for PressOptions {
    fn default() -> Self {
        Self {
            include_toc: true,
            include_cover: true,
            auto_add_to_collection: true,
            unwanted_phrases: DEFAULT_UNWANTED_PHRASES.iter().map(|p| p.to_string()).collect(),
            unwanted_element_markers: DEFAULT_UNWANTED_ELEMENT_MARKERS
                .iter()
                .map(|m| m.to_string())
                .collect(),
            identity_naming: false,
            deduplicate: false,
            period: Period::Daily,
            max_heading_level: 6,
        }
    }
}

impl PressOptions {
    /// Parse options from TOML; missing keys keep their defaults
    pub fn from_toml_str(source: &str) -> Result<Self, PressError> {
        let options: Self = toml::from_str(source)
            .map_err(|e| PressError::ConfigError(format!("Invalid configuration: {e}")))?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a TOML file
    pub fn load(path: &Path) -> Result<Self, PressError> {
        let source = fs::read_to_string(path).map_err(|e| {
            PressError::ConfigError(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&source).map_err(|e| match e {
            PressError::ConfigError(message) => {
                PressError::ConfigError(format!("{}: {}", path.display(), message))
            }
            other => other,
        })
    }

    fn validate(&self) -> Result<(), PressError> {
        if !(1..=6).contains(&self.max_heading_level) {
            return Err(PressError::ConfigError(format!(
                "max_heading_level must be between 1 and 6, got {}",
                self.max_heading_level
            )));
        }
        Ok(())
    }

    /// Extractor options derived from this configuration
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            unwanted_phrases: self.unwanted_phrases.iter().cloned().collect(),
            unwanted_element_markers: self.unwanted_element_markers.iter().cloned().collect(),
            max_heading_level: self.max_heading_level,
        }
    }
}
