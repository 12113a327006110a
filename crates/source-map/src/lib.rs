//! Inline source map decoding and per-line reconciliation for compiled CSS.
//!
//! This crate turns the `sourceMappingURL=data:application/json;base64,...`
//! annotation that CSS tooling appends to a compiled stylesheet into a table
//! with one entry per generated line, each pointing at the original line (and
//! file) it came from.
//!
//! # Example
//!
//! ```
//! use source_map::{resolve, Strictness};
//!
//! let css = ".btn_a1b2 { color: red; }";
//! let lines = resolve(css, Strictness::Lenient).unwrap();
//!
//! // Without an inline map there is no line information.
//! assert!(lines.is_empty());
//! ```

mod error;
mod inline;
mod line_index;
mod map;
mod resolve;
mod vlq;

pub use error::{MappingsError, SourceMapError};
pub use inline::{decode_inline_payload, find_inline_payload};
pub use line_index::LineIndex;
pub use map::{Mapping, OriginalLocation, SourceMap};
pub use resolve::{resolve, resolve_map, LineMapping, Strictness};
pub use vlq::decode_mappings;
