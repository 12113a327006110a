//! Line index for offset ↔ line/column conversion.

use text_size::TextSize;

/// A line and column position (0-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub(crate) struct LineCol {
    /// 0-indexed line number.
    pub(crate) line: u32,
    /// 0-indexed column (byte offset within the line).
    pub(crate) col: u32,
}

/// An index of line starts, built once per text.
///
/// Lines are separated by `\n` only; a `\r` before it stays part of the line,
/// matching how source map tooling counts lines.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// `line_starts[i]` is the offset where line `i` begins.
    line_starts: Vec<TextSize>,
    len: TextSize,
}

impl LineIndex {
    /// Creates a new line index from text.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::from(0)];
        line_starts.extend(
            text.match_indices('\n')
                .map(|(offset, _)| TextSize::from((offset + 1) as u32)),
        );

        Self {
            line_starts,
            len: TextSize::from(text.len() as u32),
        }
    }

    /// Returns the number of lines, counting a trailing empty line.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Converts a byte offset to a line/column position.
    ///
    /// Returns `None` if the offset is past the end of the text.
    pub(crate) fn line_col(&self, offset: TextSize) -> Option<LineCol> {
        if offset > self.len {
            return None;
        }

        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        };
        let col = u32::from(offset) - u32::from(self.line_starts[line]);

        Some(LineCol {
            line: line as u32,
            col,
        })
    }

    /// Returns the 1-indexed line that contains `offset`.
    pub fn line_number(&self, offset: TextSize) -> Option<u32> {
        self.line_col(offset).map(|line_col| line_col.line + 1)
    }

    /// Returns the text of a 0-indexed line, without its `\n`.
    pub fn line_text<'a>(&self, line: u32, text: &'a str) -> Option<&'a str> {
        let start = *self.line_starts.get(line as usize)?;
        let end = self
            .line_starts
            .get(line as usize + 1)
            .map(|&next| next - TextSize::from(1))
            .unwrap_or(self.len);
        text.get(usize::from(start)..usize::from(end))
    }
}
