//! Error types.

use camino::Utf8PathBuf;
use source_map::SourceMapError;
use thiserror::Error;

/// An error from statically evaluating a compiled module.
#[derive(Debug, Error)]
pub enum EvaluateError {
    /// The module text is not valid JavaScript.
    #[error("parse error: {0}")]
    Parse(String),
}

/// An error while generating the declaration for one module.
///
/// Every variant is scoped to a single file; other files are unaffected.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The compiled module could not be evaluated.
    #[error("failed to evaluate {id}: {source}")]
    Evaluate {
        /// The module id.
        id: Utf8PathBuf,
        /// The underlying error.
        source: EvaluateError,
    },

    /// The stylesheet's inline source map is malformed.
    #[error("failed to decode source map of {id}: {source}")]
    SourceMap {
        /// The module id.
        id: Utf8PathBuf,
        /// The underlying error.
        source: SourceMapError,
    },

    /// The original stylesheet could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// The file path.
        path: Utf8PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// The declaration or its directory could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        /// The file path.
        path: Utf8PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
}

impl GenerateError {
    /// Returns true for a malformed source map, which hosts report as a
    /// warning rather than a failure.
    pub fn is_source_map(&self) -> bool {
        matches!(self, GenerateError::SourceMap { .. })
    }
}
