//! Source profile classification
//!
//! Some sources need extraction steps beyond the generic heading/paragraph
//! walk. Classification is a small rule table matched against the source URL,
//! so new profiles can be added here without touching the extractor core.

use serde::{Deserialize, Serialize};

/// Extraction profile of a source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceProfile {
    /// Ordinary article or blog post
    #[default]
    Article,
    /// Encyclopedia page with a references list appended after the content
    Encyclopedia,
}

/// A domain substring and the profile it selects
struct ProfileRule {
    needle: &'static str,
    profile: SourceProfile,
}

const RULES: &[ProfileRule] = &[ProfileRule {
    needle: "wikipedia.org",
    profile: SourceProfile::Encyclopedia,
}];

impl SourceProfile {
    /// Classify a source by its URL; the first matching rule wins
    pub fn classify(source_url: &str) -> Self {
        let lowered = source_url.to_ascii_lowercase();
        RULES
            .iter()
            .find(|rule| lowered.contains(rule.needle))
            .map_or(SourceProfile::Article, |rule| rule.profile)
    }

    /// Whether a references list should be appended after the main content
    pub fn wants_references(self) -> bool {
        matches!(self, SourceProfile::Encyclopedia)
    }
}
