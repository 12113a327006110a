//! Output formatting.

use crate::cli::OutputFormat;
use crate::protocol::{Status, TransformResponse};
use serde::Serialize;

/// Counts of request outcomes for one run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Declarations written.
    pub written: usize,
    /// Declarations that already matched.
    pub unchanged: usize,
    /// Requests that were not CSS modules.
    pub skipped: usize,
    /// Modules left undeclared because of a bad source map.
    pub warnings: usize,
    /// Requests that failed.
    pub failed: usize,
}

impl Summary {
    /// Counts one response.
    pub fn record(&mut self, response: &TransformResponse) {
        match response.status {
            Status::Written => self.written += 1,
            Status::Unchanged => self.unchanged += 1,
            Status::Skipped => self.skipped += 1,
            Status::Warning => self.warnings += 1,
            Status::Failed => self.failed += 1,
        }
    }

    /// Returns true if any request failed.
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Formats the summary line.
    pub fn format(&self) -> String {
        let declarations = self.written + self.unchanged;
        let declaration_word = if declarations == 1 {
            "declaration"
        } else {
            "declarations"
        };
        let warning_word = if self.warnings == 1 {
            "warning"
        } else {
            "warnings"
        };

        format!(
            "====================================\ncss-module-dts: {} {} ({} written, {} unchanged), {} skipped, {} {}, {} failed",
            declarations,
            declaration_word,
            self.written,
            self.unchanged,
            self.skipped,
            self.warnings,
            warning_word,
            self.failed
        )
    }
}

impl FromIterator<TransformResponse> for Summary {
    fn from_iter<I: IntoIterator<Item = TransformResponse>>(iter: I) -> Self {
        let mut summary = Self::default();
        for response in iter {
            summary.record(&response);
        }
        summary
    }
}

/// A batch report in JSON form.
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    files: &'a [TransformResponse],
    summary: &'a Summary,
}

/// Formats batch results for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the responses of a batch run together with its summary.
    pub fn format(&self, responses: &[TransformResponse], summary: &Summary) -> String {
        match self.format {
            OutputFormat::Human => self.format_human(responses, summary),
            OutputFormat::Json => self.format_json(responses, summary),
        }
    }

    /// Formats as human-readable output. Skipped requests are not listed.
    fn format_human(&self, responses: &[TransformResponse], summary: &Summary) -> String {
        let mut output = String::new();

        for response in responses {
            let id = response
                .id
                .as_ref()
                .map(|id| id.as_str())
                .unwrap_or("<invalid request>");

            match response.status {
                Status::Skipped => continue,
                Status::Written | Status::Unchanged => {
                    let verb = if response.status == Status::Written {
                        "wrote"
                    } else {
                        "unchanged"
                    };
                    output.push_str(&format!(
                        "{} {} ({} keys)\n",
                        verb,
                        response.path.as_ref().map(|p| p.as_str()).unwrap_or(id),
                        response.keys.unwrap_or(0)
                    ));
                }
                Status::Warning | Status::Failed => {
                    let severity = if response.status == Status::Warning {
                        "Warning"
                    } else {
                        "Error"
                    };
                    output.push_str(&format!(
                        "{}\n{}: {}\n",
                        id,
                        severity,
                        response.error.as_deref().unwrap_or("unknown error")
                    ));
                }
            }
        }

        output.push_str(&summary.format());
        output
    }

    /// Formats as JSON output.
    fn format_json(&self, responses: &[TransformResponse], summary: &Summary) -> String {
        let report = JsonReport {
            files: responses,
            summary,
        };
        serde_json::to_string_pretty(&report).unwrap_or_default()
    }
}
