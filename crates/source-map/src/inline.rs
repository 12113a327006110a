//! Locating and decoding inline `sourceMappingURL` data URLs.

use crate::error::SourceMapError;
use base64::prelude::*;
use regex::Regex;
use std::sync::OnceLock;

fn annotation_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(
            r"/\*# sourceMappingURL=data:application/json;(?:charset=utf-8;)?base64,([^*]+)\*/",
        )
        .unwrap_or_else(|e| panic!("invalid sourceMappingURL regex: {e}"))
    })
}

/// Finds the base64 payload of the inline source map annotation in `text`.
///
/// The payload is returned trimmed of surrounding whitespace.
pub fn find_inline_payload(text: &str) -> Option<&str> {
    annotation_regex()
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|payload| payload.as_str().trim())
}

/// Decodes a base64 payload into the source map JSON text.
pub fn decode_inline_payload(payload: &str) -> Result<String, SourceMapError> {
    let bytes = BASE64_STANDARD.decode(payload.trim())?;
    Ok(String::from_utf8(bytes)?)
}
