use crate::{SourceFile, Span};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A syntax error reported by the parser.
///
/// Serializes flat: `file`, `message`, the span fields, `source_line`.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{file}:{span}: {message}")]
pub struct ParseError {
    /// Script name, or `<stdin>`.
    pub file: String,
    /// What the parser expected at this position.
    pub message: String,
    /// Where parsing stopped.
    #[serde(flatten)]
    pub span: Span,
    /// Text of the offending line, empty when past the end of input.
    pub source_line: String,
}

impl ParseError {
    /// Create a new error, copying the offending line out of `source`.
    pub fn new(source: &SourceFile, message: impl Into<String>, span: Span) -> Self {
        Self {
            file: source.name.clone(),
            message: message.into(),
            span,
            source_line: source.line(span.start_line).unwrap_or_default().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_captures_source_line() {
        let src = SourceFile::new("demo.ss", "x = 1;\ny = ;\n");
        let err = ParseError::new(&src, "expected expression", Span::point(2, 5));
        assert_eq!(err.source_line, "y = ;");
        assert_eq!(err.file, "demo.ss");
    }

    #[test]
    fn test_parse_error_display() {
        let src = SourceFile::new("demo.ss", "y = ;");
        let err = ParseError::new(&src, "expected expression", Span::point(1, 5));
        assert_eq!(err.to_string(), "demo.ss:1:5: expected expression");
    }

    #[test]
    fn test_parse_error_out_of_range_line() {
        let src = SourceFile::new("demo.ss", "x = 1;");
        let err = ParseError::new(&src, "unexpected end of input", Span::point(9, 1));
        assert_eq!(err.source_line, "");
    }

    #[test]
    fn test_parse_error_json_is_flat() {
        let src = SourceFile::new("demo.ss", "y = ;");
        let err = ParseError::new(&src, "expected expression", Span::new(1, 5, 1, 6));
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["line"], 1);
        assert_eq!(json["column"], 5);
        assert_eq!(json["source_line"], "y = ;");

        let back: ParseError = serde_json::from_value(json).unwrap();
        assert_eq!(back, err);
    }
}
