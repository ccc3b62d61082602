use thiserror::Error;

use crate::api::{Diagnostic, RelatedInfo, Severity};
use crate::parser::Span;

/// Declaration or usage error found by the semantic pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct SemanticError {
    pub kind: SemanticErrorKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticErrorKind {
    #[error("Variable '{name}' is already declared")]
    AlreadyDeclared { name: String, first: Span },

    #[error("Variable '{name}' is not declared")]
    NotDeclared { name: String },

    /// A malformed expression left in the tree by the parser.
    #[error("{message}")]
    InvalidExpression { message: String },
}

impl SemanticError {
    pub fn new(kind: SemanticErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Convert to a Diagnostic for API boundary
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut related = Vec::new();
        let (code, help) = match &self.kind {
            SemanticErrorKind::AlreadyDeclared { first, .. } => {
                related.push(RelatedInfo {
                    span: first.clone(),
                    message: "first declared here".to_string(),
                });
                (
                    "E001",
                    Some("Pick a different name for the new variable".to_string()),
                )
            }
            SemanticErrorKind::NotDeclared { name } => {
                ("E002", Some(format!("Declare it first: let {} = ...;", name)))
            }
            SemanticErrorKind::InvalidExpression { .. } => ("E003", None),
        };

        Diagnostic {
            severity: Severity::Error,
            message: self.kind.to_string(),
            span: self.span.clone(),
            related,
            help,
            code: Some(code.to_string()),
        }
    }
}
