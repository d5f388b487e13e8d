//! Artifact and collection naming
//!
//! Names are pure functions of their inputs: the same URL and date always give
//! the same identifier, so repeated same-day merges can be traced back to the
//! source they came from.
//!
//! ```rust
//! use blog_press::naming::FilenameGenerator;
//! use chrono::NaiveDate;
//!
//! let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
//! let name = FilenameGenerator::new("txt").name_for("https://example.com/post-1", date, None);
//! assert_eq!(name, "20240309_examplecompost1.txt");
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Default maximum length of the sanitized URL tail, in characters
pub const DEFAULT_MAX_TAIL_LEN: usize = 50;

/// Characters that may not appear in a file name component
const PATH_SEPARATORS: &[char] = &['/', '\\'];

static SCHEME_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
static NON_WORD_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();

fn scheme_pattern() -> Option<&'static Regex> {
    SCHEME_PATTERN
        .get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://").ok())
        .as_ref()
}

fn non_word_pattern() -> Option<&'static Regex> {
    NON_WORD_PATTERN
        .get_or_init(|| Regex::new(r"[^\w\s]").ok())
        .as_ref()
}

/// Derives deterministic identifiers for rendered artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameGenerator {
    extension: String,
    max_tail_len: usize,
}

impl FilenameGenerator {
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            max_tail_len: DEFAULT_MAX_TAIL_LEN,
        }
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// `{YYYYMMDD}_{tail}.{ext}`; an override replaces the URL-derived tail
    pub fn name_for(&self, url: &str, date: NaiveDate, override_tail: Option<&str>) -> String {
        let tail = match override_tail {
            Some(tail) => strip_path_separators(tail),
            None => self.sanitize_url_tail(url),
        };
        format!("{}_{}.{}", date.format("%Y%m%d"), tail, self.extension)
    }

    /// `{YYYY-MM-DD} {author} {title}.{ext}`; an override replaces the
    /// author/title identity
    pub fn name_for_identity(
        &self,
        date: NaiveDate,
        title: &str,
        author: &str,
        override_identity: Option<&str>,
    ) -> String {
        let identity = match override_identity {
            Some(identity) => strip_path_separators(identity),
            None => strip_path_separators(&format!("{author} {title}")),
        };
        format!(
            "{} {}.{}",
            date.format("%Y-%m-%d"),
            identity.trim(),
            self.extension
        )
    }

    /// Strip the scheme and every non-word, non-space character, then truncate
    pub fn sanitize_url_tail(&self, url: &str) -> String {
        let without_scheme = match scheme_pattern() {
            Some(pattern) => pattern.replace(url, ""),
            None => url.into(),
        };
        let sanitized = match non_word_pattern() {
            Some(pattern) => pattern.replace_all(&without_scheme, "").into_owned(),
            None => without_scheme
                .chars()
                .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
                .collect(),
        };
        sanitized.chars().take(self.max_tail_len).collect()
    }
}

/// Collection period granularity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Daily,
    Monthly,
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Daily => write!(f, "daily"),
            Period::Monthly => write!(f, "monthly"),
        }
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "daily" => Ok(Period::Daily),
            "monthly" => Ok(Period::Monthly),
            other => Err(format!("unknown period '{other}', expected daily or monthly")),
        }
    }
}

/// File name of the collection covering `date`
pub fn collection_name(date: NaiveDate, period: Period) -> String {
    match period {
        Period::Daily => format!("collection-{}.json", date.format("%Y%m%d")),
        Period::Monthly => format!("collection-{}.json", date.format("%Y%m")),
    }
}

fn strip_path_separators(value: &str) -> String {
    value.replace(PATH_SEPARATORS, "")
}
