//! Source map error types.

use thiserror::Error;

/// An error that occurred while locating or decoding an inline source map.
#[derive(Debug, Error)]
pub enum SourceMapError {
    /// The text carries no inline source map annotation.
    #[error("inline source map is not found")]
    Missing,

    /// The base64 payload could not be decoded.
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The decoded payload is not UTF-8.
    #[error("source map payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// The payload is not a source map document.
    #[error("invalid source map JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Only version 3 source maps are understood.
    #[error("unsupported source map version: {0}")]
    UnsupportedVersion(u32),

    /// The `mappings` stream is malformed.
    #[error("invalid mappings: {0}")]
    Mappings(#[from] MappingsError),
}

impl SourceMapError {
    /// Returns true if this error only reports a missing annotation.
    pub fn is_missing(&self) -> bool {
        matches!(self, SourceMapError::Missing)
    }
}

/// An error in the VLQ `mappings` stream.
///
/// Line numbers are 1-based generated lines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingsError {
    /// A character outside the base64 alphabet.
    #[error("invalid base64 digit {digit:?} on line {line}")]
    InvalidDigit {
        /// The offending character.
        digit: char,
        /// The generated line.
        line: u32,
    },

    /// A VLQ value ended with the continuation bit set.
    #[error("truncated VLQ value on line {line}")]
    Truncated {
        /// The generated line.
        line: u32,
    },

    /// A VLQ value does not fit in 32 bits.
    #[error("VLQ value overflows on line {line}")]
    Overflow {
        /// The generated line.
        line: u32,
    },

    /// A segment with a field count other than 1, 4 or 5.
    #[error("segment with {fields} fields on line {line}")]
    InvalidSegment {
        /// Number of fields found.
        fields: usize,
        /// The generated line.
        line: u32,
    },

    /// An accumulated field went negative.
    #[error("negative {field} on line {line}")]
    Negative {
        /// Name of the field.
        field: &'static str,
        /// The generated line.
        line: u32,
    },

    /// A segment references a source that is not listed in `sources`.
    #[error("source index {index} out of range on line {line}")]
    SourceOutOfRange {
        /// The referenced index.
        index: u32,
        /// The generated line.
        line: u32,
    },
}
