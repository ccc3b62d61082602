use thiserror::Error;

use crate::api::{Diagnostic, Severity};
use crate::parser::Span;

/// Statement-level syntax error. The parser stops after the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub span: Span,
    /// Optional hint, e.g. a likely misspelled keyword.
    pub help: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
    /// A statement cannot start with this token.
    #[error("Unexpected token '{found}' at line {line}, col {column}")]
    UnexpectedToken {
        found: String,
        line: usize,
        column: usize,
    },

    #[error("Expected identifier after 'let' at line {line}, col {column}")]
    ExpectedIdentifier { line: usize, column: usize },

    #[error("Expected '=' after '{name}' at line {line}, col {column}")]
    ExpectedAssignment {
        name: String,
        line: usize,
        column: usize,
    },

    /// `line` is the line of the statement keyword.
    #[error("Missing ';' after {statement} statement at line {line}")]
    MissingSemicolon { statement: &'static str, line: usize },
}

impl SyntaxError {
    pub fn new(kind: SyntaxErrorKind, span: Span) -> Self {
        Self {
            kind,
            span,
            help: None,
        }
    }

    pub fn with_help(mut self, help: Option<String>) -> Self {
        self.help = help;
        self
    }

    /// Convert to a Diagnostic for API boundary
    pub fn to_diagnostic(&self) -> Diagnostic {
        let code = match self.kind {
            SyntaxErrorKind::UnexpectedToken { .. } => "S001",
            SyntaxErrorKind::ExpectedIdentifier { .. } => "S002",
            SyntaxErrorKind::ExpectedAssignment { .. } => "S003",
            SyntaxErrorKind::MissingSemicolon { .. } => "S004",
        };
        let help = self.help.clone().or_else(|| match self.kind {
            SyntaxErrorKind::MissingSemicolon { .. } => {
                Some("Terminate every statement with ';'".to_string())
            }
            _ => None,
        });

        Diagnostic {
            severity: Severity::Error,
            message: self.kind.to_string(),
            span: self.span.clone(),
            related: Vec::new(),
            help,
            code: Some(code.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_to_diagnostic() {
        let error = SyntaxError::new(
            SyntaxErrorKind::MissingSemicolon {
                statement: "print",
                line: 3,
            },
            Span::new(10, 11),
        );

        let diagnostic = error.to_diagnostic();
        assert_eq!(diagnostic.severity, Severity::Error);
        assert_eq!(diagnostic.message, "Missing ';' after print statement at line 3");
        assert_eq!(diagnostic.code, Some("S004".to_string()));
        assert!(diagnostic.help.is_some());
    }

    #[test]
    fn test_explicit_help_wins() {
        let error = SyntaxError::new(
            SyntaxErrorKind::UnexpectedToken {
                found: "prnt".to_string(),
                line: 1,
                column: 1,
            },
            Span::new(0, 4),
        )
        .with_help(Some("did you mean 'print'?".to_string()));

        let diagnostic = error.to_diagnostic();
        assert_eq!(diagnostic.message, "Unexpected token 'prnt' at line 1, col 1");
        assert_eq!(diagnostic.help.as_deref(), Some("did you mean 'print'?"));
    }
}
