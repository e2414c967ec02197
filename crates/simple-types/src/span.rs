use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// A region of a script, from the first character to the last.
///
/// Lines and columns count from 1. Serialized field names match the flat
/// diagnostic layout: `line`, `column`, `end_line`, `end_column`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    #[serde(rename = "line")]
    pub start_line: u32,
    #[serde(rename = "column")]
    pub start_col: u32,
    pub end_line: u32,
    #[serde(rename = "end_column")]
    pub end_col: u32,
}

impl Span {
    pub fn new(start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        Self {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// A span that starts and ends at the same position.
    pub fn point(line: u32, col: u32) -> Self {
        Self::new(line, col, line, col)
    }

    /// The smallest span covering both `self` and `other`.
    pub fn merge(self, other: Span) -> Span {
        let (start_line, start_col) =
            (self.start_line, self.start_col).min((other.start_line, other.start_col));
        let (end_line, end_col) =
            (self.end_line, self.end_col).max((other.end_line, other.end_col));
        Span::new(start_line, start_col, end_line, end_col)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_col)
    }
}

/// One script's name and text, indexed by line for error reporting.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub source: String,
    /// Byte range of every line, terminator excluded.
    lines: Vec<Range<usize>>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        let source = source.into();
        let mut offset = 0;
        let lines = source
            .split('\n')
            .map(|text| {
                let range = offset..offset + text.trim_end_matches('\r').len();
                offset += text.len() + 1;
                range
            })
            .collect();
        Self {
            name: name.into(),
            source,
            lines,
        }
    }

    /// Text of the 1-based line `line_number`, without its line ending.
    pub fn line(&self, line_number: u32) -> Option<&str> {
        let index = (line_number as usize).checked_sub(1)?;
        let range = self.lines.get(index)?.clone();
        self.source.get(range)
    }

    /// Number of lines; a trailing newline opens one more, empty line.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// 1-based line and column of a byte offset.
    ///
    /// The line is found by binary search over the line index; columns
    /// count characters from the start of that line.
    pub fn position(&self, offset: usize) -> (u32, u32) {
        let index = self
            .lines
            .partition_point(|line| line.start <= offset)
            .saturating_sub(1);
        let start = self.lines.get(index).map_or(0, |line| line.start);
        let column = self
            .source
            .get(start..offset)
            .map_or(0, |text| text.chars().count());
        (index as u32 + 1, column as u32 + 1)
    }

    /// Span covering the byte range `start..end`.
    pub fn span(&self, start: usize, end: usize) -> Span {
        let (start_line, start_col) = self.position(start);
        let (end_line, end_col) = self.position(end);
        Span::new(start_line, start_col, end_line, end_col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_has_no_width() {
        assert_eq!(Span::point(4, 2), Span::new(4, 2, 4, 2));
    }

    #[test]
    fn test_merge_is_order_independent() {
        let assign = Span::new(1, 1, 1, 6);
        let call = Span::new(3, 4, 3, 12);
        assert_eq!(assign.merge(call), Span::new(1, 1, 3, 12));
        assert_eq!(call.merge(assign), assign.merge(call));
    }

    #[test]
    fn test_merge_overlapping_on_one_line() {
        let left = Span::new(2, 5, 2, 9);
        let right = Span::new(2, 7, 2, 14);
        assert_eq!(left.merge(right), Span::new(2, 5, 2, 14));
        assert_eq!(left.merge(Span::point(2, 6)), left);
    }

    #[test]
    fn test_display_shows_start() {
        assert_eq!(Span::new(12, 3, 14, 1).to_string(), "12:3");
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_string(&Span::new(2, 4, 2, 9)).unwrap();
        assert_eq!(json, r#"{"line":2,"column":4,"end_line":2,"end_column":9}"#);
    }

    #[test]
    fn test_lines_by_number() {
        let src = SourceFile::new("loop.ss", "i = 0;\nwhile i < 3 {\n    i = i + 1;\n}");
        assert_eq!(src.line_count(), 4);
        assert_eq!(src.line(2), Some("while i < 3 {"));
        assert_eq!(src.line(3), Some("    i = i + 1;"));
        assert_eq!(src.line(0), None);
        assert_eq!(src.line(5), None);
    }

    #[test]
    fn test_windows_line_endings_are_dropped() {
        let src = SourceFile::new("win.ss", "write(1);\r\nwrite(2);\r\n");
        assert_eq!(src.line(1), Some("write(1);"));
        assert_eq!(src.line(2), Some("write(2);"));
        assert_eq!(src.line(3), Some(""));
        assert_eq!(src.line_count(), 3);
    }

    #[test]
    fn test_empty_source_has_one_empty_line() {
        let src = SourceFile::new("empty.ss", "");
        assert_eq!(src.line_count(), 1);
        assert_eq!(src.line(1), Some(""));
    }

    #[test]
    fn test_position_of_offsets() {
        let src = SourceFile::new("pos.ss", "x = 1;\nwrite(x);\n");
        assert_eq!(src.position(0), (1, 1));
        assert_eq!(src.position(4), (1, 5));
        assert_eq!(src.position(6), (1, 7));
        assert_eq!(src.position(7), (2, 1));
        assert_eq!(src.position(13), (2, 7));
        assert_eq!(src.position(17), (3, 1));
    }

    #[test]
    fn test_position_counts_characters() {
        let src = SourceFile::new("utf8.ss", "s = \"é\"; t");
        // `é` is two bytes but one column.
        assert_eq!(src.position(src.source.len() - 1), (1, 10));
    }

    #[test]
    fn test_span_from_byte_range() {
        let src = SourceFile::new("span.ss", "a = 1;\nif a == 1 {\n}\n");
        assert_eq!(src.span(7, 20), Span::new(2, 1, 3, 2));
    }

    #[test]
    fn test_position_on_large_source() {
        let src = SourceFile::new("big.ss", "x = 1 + 2;\n".repeat(50_000));
        assert_eq!(src.position(11 * 49_999 + 4), (50_000, 5));
    }

    #[test]
    fn test_multibyte_text() {
        let src = SourceFile::new("utf8.ss", "s = \"héllo\";\nwrite(s);");
        assert_eq!(src.line(1), Some("s = \"héllo\";"));
        assert_eq!(src.line(2), Some("write(s);"));
    }
}
