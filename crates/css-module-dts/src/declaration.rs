//! Rendering declaration files.

use crate::exports::ExportEntry;
use camino::Utf8Path;

/// Renders the `.d.ts` text for a module's entries.
///
/// Every key gets a doc comment linking to `module_path` (and to the matched
/// line, when known). Lines are joined with `\n`; there is no trailing newline.
pub fn render_declaration(entries: &[ExportEntry], module_path: &Utf8Path) -> String {
    let file_name = module_path.file_name().unwrap_or(module_path.as_str());
    let url_path = module_path.as_str().replace('\\', "/");
    let url_path = url_path.trim_start_matches('/');

    let mut lines = Vec::with_capacity(entries.len() * 2 + 3);
    lines.push("declare const styles: {".to_string());

    for entry in entries {
        let (line_suffix, anchor) = match entry.matched_line {
            Some(line) => (format!(":{line}"), format!("#L{line}")),
            None => (String::new(), String::new()),
        };
        let comment = match entry.comment.as_deref().map(str::trim) {
            Some(comment) if !comment.is_empty() => format!("```txt\n{comment}\n```\n"),
            _ => String::new(),
        };
        let value_type = match &entry.hashed_value {
            Some(value) => quote(value),
            None => "string".to_string(),
        };

        lines.push(format!(
            "  /** {comment} [👀👉 {file_name}{line_suffix}](file:///{url_path}{anchor}) */"
        ));
        lines.push(format!("  readonly {}: {};", quote(&entry.rule), value_type));
    }

    lines.push("};".to_string());
    lines.push("export = styles;".to_string());
    lines.join("\n")
}

/// Quotes a string as a JSON (and TypeScript) string literal.
fn quote(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}
