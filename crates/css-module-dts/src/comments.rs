//! Harvesting `/** ... */` doc comments from original stylesheets.

use regex::Regex;
use rustc_hash::FxHashMap;
use source_map::LineIndex;
use std::sync::OnceLock;
use text_size::TextSize;

fn doc_comment_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?s)/\*\*(.*?)\*/")
            .unwrap_or_else(|e| panic!("invalid doc comment regex: {e}"))
    })
}

/// A documentation comment in a CSS source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssDocComment {
    /// Text between `/**` and `*/`, trimmed.
    pub content: String,
    /// 1-indexed line of the closing `*/`.
    pub end_line: u32,
}

/// The doc comments of one file, indexed by the line they close on.
#[derive(Debug, Clone, Default)]
pub struct DocComments {
    by_end_line: FxHashMap<u32, CssDocComment>,
}

impl DocComments {
    /// Scans `source` for doc comments in textual order.
    ///
    /// When several comments close on the same line, the last one wins.
    pub fn extract(source: &str) -> Self {
        let index = LineIndex::new(source);
        let mut by_end_line = FxHashMap::default();

        for captures in doc_comment_regex().captures_iter(source) {
            let (Some(whole), Some(body)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            // The terminator never spans lines, so its last byte is on the closing line.
            let Some(end_line) = index.line_number(TextSize::from(whole.end() as u32 - 1)) else {
                continue;
            };

            by_end_line.insert(
                end_line,
                CssDocComment {
                    content: body.as_str().trim().to_string(),
                    end_line,
                },
            );
        }

        Self { by_end_line }
    }

    /// Returns the comment closing on a 1-indexed line.
    pub fn ending_on(&self, line: u32) -> Option<&CssDocComment> {
        self.by_end_line.get(&line)
    }

    /// Returns the number of indexed comments.
    pub fn len(&self) -> usize {
        self.by_end_line.len()
    }

    /// Returns true if no comments were found.
    pub fn is_empty(&self) -> bool {
        self.by_end_line.is_empty()
    }
}
