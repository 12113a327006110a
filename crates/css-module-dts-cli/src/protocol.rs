//! JSON-lines transform protocol.
//!
//! A build hook sends one request per compiled module:
//!
//! ```text
//! {"id":"/app/src/button.module.css","code":"const __vite__css = ..."}
//! ```
//!
//! and receives one response per request, in completion order:
//!
//! ```text
//! {"id":"/app/src/button.module.css","status":"written","path":"/app/css-module-types/src/button.module.css.d.ts","keys":3}
//! ```

use camino::Utf8PathBuf;
use css_module_dts::{GenerateError, Outcome};
use serde::{Deserialize, Serialize};

/// A compiled module to declare.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct TransformRequest {
    /// Absolute path of the original module.
    pub id: Utf8PathBuf,
    /// The module text produced by the build tool.
    pub code: String,
}

/// What happened to a request.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Written,
    Unchanged,
    Skipped,
    /// No declaration was generated, but the build should carry on.
    Warning,
    Failed,
}

/// The answer to one request.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct TransformResponse {
    /// The request id; `None` when the request itself was unreadable.
    pub id: Option<Utf8PathBuf>,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Utf8PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keys: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TransformResponse {
    /// Builds the response for a finished request, logging failures.
    pub fn from_result(id: Utf8PathBuf, result: Result<Outcome, GenerateError>) -> Self {
        let (status, path, keys, error) = match result {
            Ok(Outcome::Skipped) => (Status::Skipped, None, None, None),
            Ok(Outcome::Written { path, keys }) => (Status::Written, Some(path), Some(keys), None),
            Ok(Outcome::Unchanged { path, keys }) => {
                (Status::Unchanged, Some(path), Some(keys), None)
            }
            Err(e) if e.is_source_map() => {
                tracing::warn!("skipping declaration: {}", e);
                (Status::Warning, None, None, Some(e.to_string()))
            }
            Err(e) => {
                tracing::error!("{}", e);
                (Status::Failed, None, None, Some(e.to_string()))
            }
        };

        Self {
            id: Some(id),
            status,
            path,
            keys,
            error,
        }
    }

    /// Builds the response for a line that is not a valid request.
    pub fn invalid(error: impl std::fmt::Display) -> Self {
        tracing::warn!("invalid request: {}", error);
        Self {
            id: None,
            status: Status::Failed,
            path: None,
            keys: None,
            error: Some(format!("invalid request: {error}")),
        }
    }
}

/// Parses a JSON-lines request stream. Blank lines are ignored.
///
/// Unparseable lines become failed responses instead of aborting the stream.
pub fn parse_requests(input: &str) -> Vec<Result<TransformRequest, TransformResponse>> {
    input
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(TransformResponse::invalid))
        .collect()
}
