//! Source retrieval
//!
//! The [`Fetcher`] trait is the seam between the pipeline and the network.
//! [`HttpFetcher`] (feature `http`) is the blocking reqwest implementation;
//! tests substitute an in-memory fetcher.

use url::Url;

use crate::error::PressError;

/// Raw bytes of a fetched source and the declared content type
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fetched {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Retrieves a source
pub trait Fetcher {
    /// # Errors
    ///
    /// - `PressError::FetchError`: the source is unreachable or answered with
    ///   a non-success status
    fn fetch(&self, url: &Url) -> Result<Fetched, PressError>;
}

impl<F: Fetcher + ?Sized> Fetcher for &F {
    fn fetch(&self, url: &Url) -> Result<Fetched, PressError> {
        (**self).fetch(url)
    }
}

/// How a source is processed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Markup to extract and render
    Markup,
    /// A finished document stored as-is, never extracted or merged
    Binary,
}

impl SourceKind {
    pub fn classify(url: &Url) -> Self {
        let path = url.path();
        let is_pdf = path
            .len()
            .checked_sub(4)
            .and_then(|start| path.get(start..))
            .is_some_and(|suffix| suffix.eq_ignore_ascii_case(".pdf"));
        if is_pdf {
            SourceKind::Binary
        } else {
            SourceKind::Markup
        }
    }

    /// File extension used when storing a binary source
    pub fn binary_extension(&self) -> Option<&'static str> {
        match self {
            SourceKind::Binary => Some("pdf"),
            SourceKind::Markup => None,
        }
    }
}

/// Parse and validate a source URL; only http and https are accepted
pub fn parse_source_url(raw: &str) -> Result<Url, PressError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| PressError::InvalidUrl(format!("'{}': {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        "http" | "https" => Err(PressError::InvalidUrl(format!("'{}': missing host", raw))),
        scheme => Err(PressError::InvalidUrl(format!(
            "'{}': unsupported scheme '{}'",
            raw, scheme
        ))),
    }
}

#[cfg(feature = "http")]
pub use http::HttpFetcher;

#[cfg(feature = "http")]
mod http {
    use std::time::Duration;

    use reqwest::blocking::Client;
    use reqwest::header::CONTENT_TYPE;
    use tracing::debug;
    use url::Url;

    use super::{Fetched, Fetcher};
    use crate::error::PressError;

    const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
    const USER_AGENT: &str = concat!("blog-press/", env!("CARGO_PKG_VERSION"));

    /// Blocking HTTP fetcher
    #[derive(Debug, Clone)]
    pub struct HttpFetcher {
        client: Client,
    }

    impl HttpFetcher {
        pub fn new() -> Result<Self, PressError> {
            Self::with_timeout(DEFAULT_TIMEOUT)
        }

        pub fn with_timeout(timeout: Duration) -> Result<Self, PressError> {
            let client = Client::builder()
                .user_agent(USER_AGENT)
                .timeout(timeout)
                .build()
                .map_err(|e| PressError::FetchError(format!("Cannot build HTTP client: {e}")))?;
            Ok(Self { client })
        }
    }

    impl Fetcher for HttpFetcher {
        fn fetch(&self, url: &Url) -> Result<Fetched, PressError> {
            let response = self
                .client
                .get(url.clone())
                .send()
                .map_err(|e| PressError::FetchError(format!("{url}: {e}")))?;

            let status = response.status();
            if !status.is_success() {
                return Err(PressError::FetchError(format!("{url}: HTTP {status}")));
            }

            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string);
            let bytes = response
                .bytes()
                .map_err(|e| PressError::FetchError(format!("{url}: {e}")))?
                .to_vec();

            debug!(%url, bytes = bytes.len(), content_type = ?content_type, "fetched source");
            Ok(Fetched {
                bytes,
                content_type,
            })
        }
    }
}
