use thiserror::Error;

use crate::api::{Diagnostic, Severity};
use crate::parser::Span;

/// Lexical error with the span of the offending text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("Unterminated string starting at line {line}, col {column}")]
    UnterminatedString { line: usize, column: usize },

    #[error("Unexpected character '{ch}' at line {line}, col {column}")]
    UnexpectedCharacter { ch: char, line: usize, column: usize },

    #[error("Unclosed block comment starting at line {line}, col {column}")]
    UnclosedComment { line: usize, column: usize },
}

impl LexError {
    pub fn new(kind: LexErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Convert to a Diagnostic for API boundary
    pub fn to_diagnostic(&self) -> Diagnostic {
        let (code, help) = match &self.kind {
            LexErrorKind::UnterminatedString { .. } => {
                ("L001", Some("Close the string with a matching '\"'"))
            }
            LexErrorKind::UnexpectedCharacter { .. } => ("L002", None),
            LexErrorKind::UnclosedComment { .. } => {
                ("L003", Some("Close the comment with '*/'"))
            }
        };

        Diagnostic {
            severity: Severity::Error,
            message: self.kind.to_string(),
            span: self.span.clone(),
            related: Vec::new(),
            help: help.map(str::to_string),
            code: Some(code.to_string()),
        }
    }
}
