//! Per-line reconciliation of generated CSS with its original sources.

use crate::error::SourceMapError;
use crate::line_index::LineIndex;
use crate::map::SourceMap;
use serde::Serialize;
use std::collections::HashMap;

/// How to treat text without an inline source map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Log a warning and return an empty table.
    #[default]
    Lenient,
    /// Fail with [`SourceMapError::Missing`].
    Strict,
}

/// The best-known original location of one generated line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineMapping {
    /// 1-indexed generated line.
    pub generated_line: u32,
    /// Text of the generated line.
    pub generated_content: String,
    /// Source file of the line's first mapping.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// 1-indexed line in `source`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_line: Option<u32>,
    /// Text of `original_line`, when the map embeds the source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_content: Option<String>,
}

/// Resolves every line of `text` through its inline source map.
///
/// The result has exactly one entry per `\n`-separated line, numbered from 1.
/// Without an inline map the result is empty, or an error under
/// [`Strictness::Strict`].
pub fn resolve(text: &str, strictness: Strictness) -> Result<Vec<LineMapping>, SourceMapError> {
    match SourceMap::from_inline(text)? {
        Some(map) => Ok(resolve_map(&map, text)),
        None if strictness == Strictness::Strict => Err(SourceMapError::Missing),
        None => {
            tracing::warn!("inline source map is not found");
            Ok(Vec::new())
        }
    }
}

/// Resolves every line of `text` through an already decoded map.
pub fn resolve_map(map: &SourceMap, text: &str) -> Vec<LineMapping> {
    let index = LineIndex::new(text);
    let first_mappings = map.first_mapping_per_line();
    let mut contents = SourceContents::new(map);

    (0..index.line_count() as u32)
        .map(|line| {
            let generated_line = line + 1;
            let generated_content = index.line_text(line, text).unwrap_or_default().to_string();

            let original = first_mappings
                .get(&generated_line)
                .and_then(|mapping| mapping.original);
            let Some(original) = original else {
                return LineMapping {
                    generated_line,
                    generated_content,
                    source: None,
                    original_line: None,
                    original_content: None,
                };
            };

            let original_content = map
                .sources()
                .get(original.source as usize)
                .and_then(|name| contents.line(name, original.line))
                .map(str::to_string);

            LineMapping {
                generated_line,
                generated_content,
                source: map.source_name(original.source),
                original_line: Some(original.line),
                original_content,
            }
        })
        .collect()
}

/// Original source text, split into lines at most once per source name.
struct SourceContents<'a> {
    /// Later sources with the same name replace earlier ones.
    by_name: HashMap<&'a str, &'a str>,
    lines: HashMap<&'a str, Vec<&'a str>>,
}

impl<'a> SourceContents<'a> {
    fn new(map: &'a SourceMap) -> Self {
        let mut by_name = HashMap::new();
        for (index, name) in map.sources().iter().enumerate() {
            if let Some(content) = map
                .source_content(index as u32)
                .filter(|content| !content.is_empty())
            {
                by_name.insert(name.as_str(), content);
            }
        }

        Self {
            by_name,
            lines: HashMap::new(),
        }
    }

    /// Returns the 1-indexed `line` of the named source.
    fn line(&mut self, name: &'a str, line: u32) -> Option<&'a str> {
        let content = *self.by_name.get(name)?;
        let lines = self
            .lines
            .entry(name)
            .or_insert_with(|| content.split('\n').collect());
        lines.get((line as usize).checked_sub(1)?).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::prelude::*;
    use pretty_assertions::assert_eq;

    fn with_inline_map(css: &str, map_json: &str) -> String {
        format!(
            "{}\n/*# sourceMappingURL=data:application/json;base64,{} */",
            css,
            BASE64_STANDARD.encode(map_json)
        )
    }

    #[test]
    fn test_missing_map_lenient() {
        let lines = resolve(".a{}\n.b{}", Strictness::Lenient).unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn test_missing_map_strict() {
        let err = resolve(".a{}", Strictness::Strict).unwrap_err();
        assert!(err.is_missing());
    }

    #[test]
    fn test_malformed_json() {
        let text = with_inline_map(".a{}", "{not json");
        assert!(matches!(
            resolve(&text, Strictness::Lenient),
            Err(SourceMapError::Json(_))
        ));
    }

    #[test]
    fn test_dense_lines() {
        let text = with_inline_map(
            "._a_1 {\n  color: red;\n}",
            r#"{"version":3,"sources":["a.module.css"],"sourcesContent":[".a {\n  color: red;\n}"],"mappings":"AAAA;EACE;AACF"}"#,
        );
        let lines = resolve(&text, Strictness::Strict).unwrap();

        // Three CSS lines plus the annotation line.
        assert_eq!(lines.len(), 4);
        let numbers: Vec<u32> = lines.iter().map(|l| l.generated_line).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);

        assert_eq!(
            lines[1],
            LineMapping {
                generated_line: 2,
                generated_content: "  color: red;".to_string(),
                source: Some("a.module.css".to_string()),
                original_line: Some(2),
                original_content: Some("  color: red;".to_string()),
            }
        );
        assert_eq!(lines[2].original_content.as_deref(), Some("}"));
    }

    #[test]
    fn test_unmapped_line_has_no_source() {
        let text = with_inline_map(
            ".x{}\n.y{}",
            r#"{"version":3,"sources":["a.css"],"sourcesContent":[".x{}"],"mappings":"AAAA"}"#,
        );
        let lines = resolve(&text, Strictness::Lenient).unwrap();
        assert_eq!(lines[1].generated_content, ".y{}");
        assert_eq!(lines[1].source, None);
        assert_eq!(lines[1].original_line, None);
        assert_eq!(lines[1].original_content, None);
    }

    #[test]
    fn test_first_segment_on_line_wins() {
        // Two segments on generated line 1: original lines 3, then 1.
        let text = with_inline_map(
            "._a_1{} ._b_2{}",
            r#"{"version":3,"sources":["a.css"],"mappings":"AAEA,QAFA"}"#,
        );
        let lines = resolve(&text, Strictness::Strict).unwrap();
        assert_eq!(lines[0].original_line, Some(3));
    }

    #[test]
    fn test_generated_only_first_segment_leaves_line_unmapped() {
        let text = with_inline_map(
            "._a_1{}",
            r#"{"version":3,"sources":["a.css"],"mappings":"A,CAAA"}"#,
        );
        let lines = resolve(&text, Strictness::Strict).unwrap();
        assert_eq!(lines[0].original_line, None);
    }

    #[test]
    fn test_content_without_sources_content() {
        let text = with_inline_map(
            "._a_1{}",
            r#"{"version":3,"sources":["a.css"],"mappings":"AAAA"}"#,
        );
        let lines = resolve(&text, Strictness::Strict).unwrap();
        assert_eq!(lines[0].source.as_deref(), Some("a.css"));
        assert_eq!(lines[0].original_line, Some(1));
        assert_eq!(lines[0].original_content, None);
    }

    #[test]
    fn test_original_line_past_content() {
        let text = with_inline_map(
            "._a_1{}",
            r#"{"version":3,"sources":["a.css"],"sourcesContent":[".a{}"],"mappings":"AAKA"}"#,
        );
        let lines = resolve(&text, Strictness::Strict).unwrap();
        assert_eq!(lines[0].original_line, Some(6));
        assert_eq!(lines[0].original_content, None);
    }
}
