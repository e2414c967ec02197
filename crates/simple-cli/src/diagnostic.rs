//! Error reporting for the command-line runner.

use serde::Serialize;
use simple_eval::EvalError;
use simple_types::{ParseError, Span};
use std::io;
use thiserror::Error;

/// Anything that stops a script run.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("{error}")]
    Eval {
        file: String,
        error: EvalError,
        /// Innermost node that failed, when the evaluator recorded one.
        span: Option<Span>,
        source_line: Option<String>,
    },
}

impl CliError {
    /// Short machine-readable kind, shown as `error[<kind>]`.
    pub fn kind(&self) -> &'static str {
        match self {
            CliError::Io { .. } => "io",
            CliError::Parse(_) => "parse_error",
            CliError::Eval { error, .. } => error.kind().as_str(),
        }
    }

    /// Process exit status: 2 when the script could not be read, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Io { .. } => 2,
            CliError::Parse(_) | CliError::Eval { .. } => 1,
        }
    }

    pub fn diagnostic(&self) -> Diagnostic {
        match self {
            CliError::Io { path, source } => Diagnostic {
                kind: self.kind(),
                message: source.to_string(),
                file: Some(path.clone()),
                span: None,
                source_line: None,
            },
            CliError::Parse(err) => Diagnostic {
                kind: self.kind(),
                message: err.message.clone(),
                file: Some(err.file.clone()),
                span: Some(err.span),
                source_line: Some(err.source_line.clone()),
            },
            CliError::Eval {
                file,
                error,
                span,
                source_line,
            } => Diagnostic {
                kind: self.kind(),
                message: error.to_string(),
                file: Some(file.clone()),
                span: *span,
                source_line: source_line.clone(),
            },
        }
    }
}

/// Flat error record printed on stderr.
///
/// Parse errors always carry their location; runtime errors carry it when
/// the evaluator recorded the failing node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub kind: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(flatten)]
    pub span: Option<Span>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_line: Option<String>,
}

impl Diagnostic {
    /// Human-readable rendering, with a caret under the error column when
    /// the source line is known.
    pub fn render(&self) -> String {
        let mut text = format!("error[{}]: ", self.kind);
        match (&self.file, &self.span) {
            (Some(file), Some(span)) => text.push_str(&format!("{file}:{span}: ")),
            (Some(file), None) => text.push_str(&format!("{file}: ")),
            _ => {}
        }
        text.push_str(&self.message);

        if let (Some(span), Some(line)) = (&self.span, &self.source_line) {
            let gutter = span.start_line.to_string();
            let pad = " ".repeat(gutter.len());
            let indent = " ".repeat(span.start_col.saturating_sub(1) as usize);
            text.push_str(&format!("\n{pad} |\n{gutter} | {line}\n{pad} | {indent}^"));
        }
        text
    }

    pub fn to_json(&self) -> String {
        // Every field is a plain string or integer, so serialization cannot fail.
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"kind":"internal_error","message":"{e}"}}"#)
        })
    }
}
