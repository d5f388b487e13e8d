//! Character encoding detection and decoding for fetched markup
//!
//! Fetched articles arrive as raw bytes. Before they can be parsed they are
//! decoded to UTF-8 using the first encoding found by this cascade:
//!
//! 1. **Byte order mark** at the start of the body
//! 2. **Content-Type header** `charset` parameter
//! 3. **`<meta>` declaration** in the first kilobyte of markup (a UTF-16
//!    label found there means UTF-8)
//! 4. **UTF-8** as the default
//!
//! # Examples
//!
//! ```rust
//! use blog_press::charset::detect_encoding;
//!
//! let encoding = detect_encoding(Some("text/html; charset=ISO-8859-1"), b"<p>Caf\xE9</p>");
//! assert_eq!(encoding.name(), "windows-1252");
//!
//! let encoding = detect_encoding(None, b"<p>plain</p>");
//! assert_eq!(encoding.name(), "UTF-8");
//! ```

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use std::sync::OnceLock;

use crate::error::PressError;

/// Maximum bytes scanned for a `<meta>` charset declaration
const META_SCAN_LIMIT: usize = 1024;

/// Pick the encoding for a markup body
///
/// Unknown labels at any level are ignored and the cascade continues, so the
/// result is always a usable encoding.
pub fn detect_encoding(content_type: Option<&str>, markup: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(markup) {
        return encoding;
    }

    if let Some(label) = content_type.and_then(charset_from_content_type)
        && let Some(encoding) = Encoding::for_label(label.as_bytes())
    {
        return encoding;
    }

    // A declaration read through an ASCII-compatible prescan cannot be UTF-16
    if let Some(label) = charset_from_meta(markup)
        && let Some(encoding) = Encoding::for_label(label.as_bytes())
    {
        return encoding.output_encoding();
    }

    UTF_8
}

/// Decode a markup body to UTF-8
///
/// Decoding is strict: a body that is not valid in its detected encoding is an
/// `EncodingError`, which the extractor turns into a degraded document.
pub fn decode_markup(markup: &[u8], content_type: Option<&str>) -> Result<String, PressError> {
    let encoding = detect_encoding(content_type, markup);

    // BOM sniffing already picked the encoding, strip the mark itself
    let body = match Encoding::for_bom(markup) {
        Some((_, bom_len)) => &markup[bom_len..],
        None => markup,
    };

    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .map(|decoded| decoded.into_owned())
        .ok_or_else(|| {
            PressError::EncodingError(format!(
                "Invalid byte sequence for charset '{}'",
                encoding.name()
            ))
        })
}

/// Extract the `charset` parameter from a Content-Type header value
///
/// ```rust
/// use blog_press::charset::charset_from_content_type;
///
/// assert_eq!(charset_from_content_type("text/html; charset=\"utf-8\""), Some("utf-8".to_string()));
/// assert_eq!(charset_from_content_type("text/html"), None);
/// ```
pub fn charset_from_content_type(content_type: &str) -> Option<String> {
    static CHARSET_PARAM: OnceLock<Option<Regex>> = OnceLock::new();
    let regex = CHARSET_PARAM
        .get_or_init(|| Regex::new(r#"(?i)charset\s*=\s*"?([^";,\s]+)"?"#).ok())
        .as_ref()?;

    regex
        .captures(content_type)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extract a charset declared in a `<meta>` tag near the top of the markup
///
/// Both the HTML5 `<meta charset>` and the older `http-equiv` forms are
/// recognized.
pub fn charset_from_meta(markup: &[u8]) -> Option<String> {
    let head = String::from_utf8_lossy(&markup[..markup.len().min(META_SCAN_LIMIT)]);

    static META_CHARSET: OnceLock<Option<Regex>> = OnceLock::new();
    let regex = META_CHARSET
        .get_or_init(|| {
            Regex::new(
                r#"(?i)<meta\s+(?:charset\s*=\s*"?([^";>\s]+)|http-equiv\s*=\s*"?content-type"?\s+content\s*=\s*"?[^">]*charset\s*=\s*([^";>\s]+))"#,
            )
            .ok()
        })
        .as_ref()?;

    let caps = regex.captures(&head)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_content_type_charset_variants() {
        assert_eq!(
            charset_from_content_type("text/html; charset=UTF-8"),
            Some("UTF-8".to_string())
        );
        assert_eq!(
            charset_from_content_type("text/html;charset=windows-1252"),
            Some("windows-1252".to_string())
        );
        assert_eq!(
            charset_from_content_type("text/html; CHARSET=\"iso-8859-1\"; boundary=x"),
            Some("iso-8859-1".to_string())
        );
        assert_eq!(charset_from_content_type("text/html"), None);
        assert_eq!(charset_from_content_type(""), None);
    }

    #[test]
    fn test_meta_charset_html5_and_http_equiv() {
        let html5 = br#"<html><head><meta charset="Shift_JIS"></head></html>"#;
        assert_eq!(charset_from_meta(html5), Some("Shift_JIS".to_string()));

        let html4 = br#"<meta http-equiv="Content-Type" content="text/html; charset=ISO-8859-1">"#;
        assert_eq!(charset_from_meta(html4), Some("ISO-8859-1".to_string()));

        assert_eq!(charset_from_meta(b"<p>nothing declared</p>"), None);
    }

    #[test]
    fn test_meta_charset_beyond_scan_limit_is_ignored() {
        let mut html = "x".repeat(META_SCAN_LIMIT + 10).into_bytes();
        html.extend_from_slice(br#"<meta charset="big5">"#);
        assert_eq!(charset_from_meta(&html), None);
    }

    #[test]
    fn test_bom_wins_over_header() {
        let mut body = vec![0xEF, 0xBB, 0xBF];
        body.extend_from_slice(b"<p>hi</p>");
        let encoding = detect_encoding(Some("text/html; charset=windows-1252"), &body);
        assert_eq!(encoding, UTF_8);
    }

    #[test]
    fn test_meta_utf16_means_utf8() {
        for label in ["utf-16", "UTF-16LE", "utf-16be"] {
            let html = format!(r#"<html><head><meta charset="{label}"></head><p>hi</p></html>"#);
            assert_eq!(detect_encoding(None, html.as_bytes()), UTF_8, "{label}");
        }
        assert_eq!(
            decode_markup(br#"<meta charset="utf-16"><p>hi</p>"#, None).unwrap(),
            r#"<meta charset="utf-16"><p>hi</p>"#
        );
    }

    #[test]
    fn test_unknown_label_falls_through_to_default() {
        let encoding = detect_encoding(Some("text/html; charset=x-made-up"), b"<p>hi</p>");
        assert_eq!(encoding, UTF_8);
    }

    #[test]
    fn test_decode_transcodes_latin1() {
        let decoded = decode_markup(b"<p>Caf\xE9</p>", Some("text/html; charset=ISO-8859-1"))
            .expect("latin-1 body should decode");
        assert_eq!(decoded, "<p>Café</p>");
    }

    #[test]
    fn test_decode_strips_bom() {
        let mut body = vec![0xEF, 0xBB, 0xBF];
        body.extend_from_slice(b"<p>hi</p>");
        assert_eq!(decode_markup(&body, None).unwrap(), "<p>hi</p>");
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        match decode_markup(b"<p>\xC3\x28 broken</p>", Some("text/html; charset=utf-8")) {
            Err(PressError::EncodingError(message)) => assert!(message.contains("UTF-8")),
            other => panic!("Expected EncodingError, got {other:?}"),
        }
    }

    proptest! {
        #[test]
        fn prop_header_has_priority_over_meta(
            header in prop::sample::select(vec!["utf-8", "windows-1252", "shift_jis", "big5"]),
            meta in prop::sample::select(vec!["utf-8", "windows-1252", "shift_jis", "big5"]),
        ) {
            let content_type = format!("text/html; charset={header}");
            let html = format!(r#"<html><head><meta charset="{meta}"></head></html>"#);

            let detected = detect_encoding(Some(&content_type), html.as_bytes());
            prop_assert_eq!(detected, Encoding::for_label(header.as_bytes()).unwrap());
        }

        #[test]
        fn prop_ascii_markup_always_decodes(text in "[a-zA-Z0-9 <>/=]{0,200}") {
            prop_assert!(decode_markup(text.as_bytes(), None).is_ok());
        }
    }
}
