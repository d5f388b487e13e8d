//! Error types for the press pipeline
//!
//! Extraction problems degrade gracefully and rarely surface here; fetch,
//! render and merge problems are returned to the caller verbatim.

use std::fmt;

/// Errors that can occur while fetching, rendering or merging an article
#[derive(Debug)]
pub enum PressError {
    /// Source unreachable or returned a non-success status
    FetchError(String),
    /// Malformed URL, rejected before any fetch attempt
    InvalidUrl(String),
    /// Markup could not be parsed at all
    ParseError(String),
    /// Character encoding error
    EncodingError(String),
    /// Renderer failed or reported an inconsistent page count
    RenderError(String),
    /// Existing collection unreadable or corrupt; the collection is left untouched
    MergeError(String),
    /// Configuration could not be read or parsed
    ConfigError(String),
    /// Filesystem error outside of a merge
    IoError(String),
}

impl PressError {
    /// Get numeric error code
    pub fn code(&self) -> u32 {
        match self {
            PressError::FetchError(_) => 1,
            PressError::InvalidUrl(_) => 2,
            PressError::ParseError(_) => 3,
            PressError::EncodingError(_) => 4,
            PressError::RenderError(_) => 5,
            PressError::MergeError(_) => 6,
            PressError::ConfigError(_) => 7,
            PressError::IoError(_) => 99,
        }
    }

    /// Whether the error leaves accumulated collection history at risk
    ///
    /// Merge errors are always fatal for the merge that raised them.
    pub fn is_fatal_for_merge(&self) -> bool {
        matches!(self, PressError::MergeError(_) | PressError::IoError(_))
    }
}

impl fmt::Display for PressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PressError::FetchError(msg) => write!(f, "Fetch error: {}", msg),
            PressError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
            PressError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            PressError::EncodingError(msg) => write!(f, "Encoding error: {}", msg),
            PressError::RenderError(msg) => write!(f, "Render error: {}", msg),
            PressError::MergeError(msg) => write!(f, "Merge error: {}", msg),
            PressError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            PressError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for PressError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            PressError::FetchError(String::new()),
            PressError::InvalidUrl(String::new()),
            PressError::ParseError(String::new()),
            PressError::EncodingError(String::new()),
            PressError::RenderError(String::new()),
            PressError::MergeError(String::new()),
            PressError::ConfigError(String::new()),
            PressError::IoError(String::new()),
        ];
        let mut codes: Vec<u32> = errors.iter().map(PressError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_display_is_verbatim() {
        let err = PressError::MergeError("collection.json is truncated".to_string());
        assert_eq!(err.to_string(), "Merge error: collection.json is truncated");
    }

    #[test]
    fn test_merge_errors_are_fatal() {
        assert!(PressError::MergeError("x".into()).is_fatal_for_merge());
        assert!(!PressError::ParseError("x".into()).is_fatal_for_merge());
    }
}
