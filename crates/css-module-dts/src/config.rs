//! Configuration loading.

use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use std::fs;

/// Name of the optional configuration file at the project root.
pub const CONFIG_FILE: &str = "css-module-dts.config.json";

/// Default directory for generated declarations, relative to the project root.
pub const DEFAULT_DTS_OUTPUT_DIR: &str = "css-module-types";

/// Generator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginConfig {
    /// Output directory of `*.module.css.d.ts` files, relative to the project
    /// root.
    pub dts_output_dir: String,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            dts_output_dir: DEFAULT_DTS_OUTPUT_DIR.to_string(),
        }
    }
}

impl PluginConfig {
    /// Loads configuration from `css-module-dts.config.json` in `project_root`.
    ///
    /// A missing file yields the defaults. An unreadable or invalid file is
    /// reported as a warning and also yields the defaults.
    pub fn load(project_root: &Utf8Path) -> Self {
        let config_path = project_root.join(CONFIG_FILE);
        if !config_path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&config_path)
            .map_err(|e| e.to_string())
            .and_then(|content| Self::from_json(&content).map_err(|e| e.to_string()))
        {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %config_path, "failed to parse config: {}", e);
                Self::default()
            }
        }
    }

    /// Parses configuration JSON. Comments are allowed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(&strip_json_comments(json))
    }
}

/// Where the comment stripper is inside a JSONC document.
#[derive(Debug, Clone, Copy)]
enum Scan {
    Code,
    String,
    Escape,
    LineComment,
    BlockComment,
}

/// Strips `//` and `/* */` comments outside of string literals.
///
/// Line comments keep their terminating newline so error positions from
/// `serde_json` still point at the right line.
fn strip_json_comments(jsonc: &str) -> String {
    let mut out = String::with_capacity(jsonc.len());
    let mut state = Scan::Code;
    let mut rest = jsonc.chars().peekable();

    while let Some(c) = rest.next() {
        let next = rest.peek().copied();
        state = match (state, c, next) {
            (Scan::Code, '/', Some('/')) => {
                rest.next();
                Scan::LineComment
            }
            (Scan::Code, '/', Some('*')) => {
                rest.next();
                Scan::BlockComment
            }
            (Scan::Code, '"', _) => {
                out.push(c);
                Scan::String
            }
            (Scan::String, '\\', _) => {
                out.push(c);
                Scan::Escape
            }
            (Scan::String, '"', _) => {
                out.push(c);
                Scan::Code
            }
            (Scan::Escape, _, _) => {
                out.push(c);
                Scan::String
            }
            (Scan::LineComment, '\n', _) => {
                out.push(c);
                Scan::Code
            }
            (Scan::BlockComment, '*', Some('/')) => {
                rest.next();
                Scan::Code
            }
            (Scan::LineComment | Scan::BlockComment, _, _) => state,
            (Scan::Code | Scan::String, _, _) => {
                out.push(c);
                state
            }
        };
    }

    out
}
