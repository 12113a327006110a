//! Correlating exported keys with generated lines.

use crate::comments::DocComments;
use crate::exports::{ExportEntry, ExportTable};
use source_map::LineMapping;

/// Correlates every exported key with the original line of its selector.
///
/// For each key, the first mapped line whose generated text contains
/// `.<hashed value>` provides `matched_line`. The match is a plain substring
/// test, so a hash that is a prefix of another selector can claim that
/// selector's line.
///
/// When `original_source` is given, the doc comment closing on the line just
/// above `matched_line` becomes the entry's comment.
///
/// The output has one entry per key, in table order, matched or not.
pub fn synthesize(
    exports: &ExportTable,
    mappings: &[LineMapping],
    original_source: Option<&str>,
) -> Vec<ExportEntry> {
    let comments = original_source.map(DocComments::extract);

    exports
        .iter()
        .map(|(rule, hashed_value)| {
            let matched_line = hashed_value.and_then(|value| find_original_line(mappings, value));
            let comment = matched_line
                .zip(comments.as_ref())
                .and_then(|(line, comments)| comments.ending_on(line.checked_sub(1)?))
                .map(|comment| comment.content.clone());

            ExportEntry {
                rule: rule.to_string(),
                hashed_value: hashed_value.map(str::to_string),
                matched_line,
                comment,
            }
        })
        .collect()
}

fn find_original_line(mappings: &[LineMapping], hashed_value: &str) -> Option<u32> {
    let selector = format!(".{hashed_value}");
    mappings
        .iter()
        .find(|mapping| {
            mapping.original_line.is_some() && mapping.generated_content.contains(&selector)
        })
        .and_then(|mapping| mapping.original_line)
}
