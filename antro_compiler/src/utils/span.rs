//! Source location tracking for the Antro front end
//!
//! Tokens remember where they started; errors carry a line and, where one is
//! known, a span that `SourceMap` can render with a caret underline.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in source text with line, column, and character offset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// Character offset from start of input (0-based)
    pub offset: usize,
    /// Line number (1-based)
    pub line: u32,
    /// Column number (1-based)
    pub column: u32,
}

impl Position {
    pub fn new(offset: usize, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// Offset 0, line 1, column 1
    pub fn start() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// Advance position past one character
    pub fn advance(self, ch: char) -> Self {
        match ch {
            '\n' => Self {
                offset: self.offset + 1,
                line: self.line + 1,
                column: 1,
            },
            _ => Self {
                offset: self.offset + 1,
                line: self.line,
                column: self.column + 1,
            },
        }
    }

    /// Advance position past every character of `s`
    pub fn advance_str(self, s: &str) -> Self {
        s.chars().fold(self, |pos, ch| pos.advance(ch))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A span of source text from start to end position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Start position (inclusive)
    pub start: Position,
    /// End position (exclusive)
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(
            start.offset <= end.offset,
            "Span start must not be after end"
        );
        Self { start, end }
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    /// Single-character span
    pub fn single(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos.advance(' '),
        }
    }

    /// Span covering `text` when it begins at `start`
    pub fn covering(start: Position, text: &str) -> Self {
        if text.is_empty() {
            return Self::single(start);
        }
        Self {
            start,
            end: start.advance_str(text),
        }
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.offset >= self.start.offset && pos.offset < self.end.offset
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(
                f,
                "{}:{}-{}",
                self.start.line, self.start.column, self.end.column
            )
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Line index over a source text for rendering diagnostics
#[derive(Debug, Clone)]
pub struct SourceMap {
    source: String,
    /// Byte offsets of line starts
    line_starts: Vec<usize>,
}

impl SourceMap {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let mut line_starts = vec![0];
        for (offset, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(offset + 1);
            }
        }
        Self {
            source,
            line_starts,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Get a line of text by line number (1-based)
    pub fn get_line(&self, line_num: u32) -> Option<&str> {
        if line_num == 0 {
            return None;
        }

        let line_idx = (line_num - 1) as usize;
        let start = *self.line_starts.get(line_idx)?;
        let end = match self.line_starts.get(line_idx + 1) {
            Some(next) => next - 1,
            None => self.source.len(),
        };

        Some(self.source[start..end].trim_end_matches('\r'))
    }

    /// Format an error message with source context
    pub fn format_error(&self, span: &Span, message: &str) -> String {
        let mut result = String::new();

        result.push_str(&format!("error: {}\n", message));
        result.push_str(&format!(
            "  --> {}:{}\n",
            span.start.line, span.start.column
        ));

        if let Some(line) = self.get_line(span.start.line) {
            let line_num_str = span.start.line.to_string();
            let padding = " ".repeat(line_num_str.len());

            result.push_str(&format!("{} |\n", padding));
            result.push_str(&format!("{} | {}\n", line_num_str, line));

            let line_len = line.chars().count();
            let lead = (span.start.column as usize).saturating_sub(1).min(line_len);
            let caret_len = if span.start.line == span.end.line {
                span.len()
            } else {
                line_len - lead
            };

            result.push_str(&format!(
                "{} | {}{}\n",
                padding,
                " ".repeat(lead),
                "^".repeat(caret_len.max(1))
            ));
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_advance_tracks_lines() {
        let pos = Position::start().advance_str("ab\ncd");
        assert_eq!(pos.line, 2);
        assert_eq!(pos.column, 3);
        assert_eq!(pos.offset, 5);
    }

    #[test]
    fn test_span_covering_text() {
        let start = Position::new(4, 1, 5);
        let span = Span::covering(start, "retn");
        assert_eq!(span.len(), 4);
        assert_eq!(span.end.column, 9);
        assert!(span.contains(Position::new(7, 1, 8)));
        assert!(!span.contains(Position::new(8, 1, 9)));
    }

    #[test]
    fn test_source_map_lines() {
        let map = SourceMap::new("begin:\r\nend;");
        assert_eq!(map.line_count(), 2);
        assert_eq!(map.get_line(1), Some("begin:"));
        assert_eq!(map.get_line(2), Some("end;"));
        assert_eq!(map.get_line(3), None);
        assert_eq!(map.get_line(0), None);
    }

    #[test]
    fn test_format_error_underlines_span() {
        let map = SourceMap::new("def x int;\nbegin: retn 5; end;");
        let span = Span::covering(Position::new(23, 2, 13), "5");
        let rendered = map.format_error(&span, "expected variable");

        assert!(rendered.starts_with("error: expected variable"));
        assert!(rendered.contains("--> 2:13"));
        assert!(rendered.contains("2 | begin: retn 5; end;"));
        assert!(rendered.contains(&format!("  | {}^\n", " ".repeat(12))));
    }
}
