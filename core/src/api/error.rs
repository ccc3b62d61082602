//! Public error types for the stepwise API.
//!
//! Phase-specific errors (`LexError`, `SyntaxError`, `SemanticError`) are
//! converted to [`Diagnostic`]s at the API boundary. Callers that want a
//! `Result` get an [`Error`] from [`crate::api::CompileResult::into_result`].

use core::fmt;

use thiserror::Error;

use crate::parser::Span;

/// Public error type for a failed compilation.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The lexer rejected the source.
    #[error("Lexical analysis failed with {} error(s)", .diagnostics.len())]
    Lexical { diagnostics: Vec<Diagnostic> },

    /// The parser rejected the token stream. Holds at most one diagnostic.
    #[error("Syntax analysis failed with {} error(s)", .diagnostics.len())]
    Syntax { diagnostics: Vec<Diagnostic> },

    /// Declaration or usage errors, all of them.
    #[error("Semantic analysis failed with {} error(s)", .diagnostics.len())]
    Semantic { diagnostics: Vec<Diagnostic> },

    /// Anything else: a fault inside the pipeline or the store.
    #[error("Compilation failed: {0}")]
    Internal(String),
}

impl Error {
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Error::Lexical { diagnostics }
            | Error::Syntax { diagnostics }
            | Error::Semantic { diagnostics } => diagnostics,
            Error::Internal(_) => &[],
        }
    }
}

/// A diagnostic message (error, warning, or info) with source location.
///
/// Maps cleanly to LSP diagnostics for editor integration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity level (error, warning, info).
    pub severity: Severity,

    /// Primary diagnostic message.
    pub message: String,

    /// Byte range of the primary issue.
    pub span: Span,

    /// Related locations that provide additional context.
    pub related: Vec<RelatedInfo>,

    /// Optional help text suggesting how to fix the issue.
    pub help: Option<String>,

    /// Optional error code (e.g., "E001") for documentation lookup.
    pub code: Option<String>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)?;
        if let Some(code) = &self.code {
            write!(f, " [{}]", code)?;
        }
        if let Some(help) = &self.help {
            write!(f, "\nhelp: {}", help)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Related information for a diagnostic (e.g. "first declared here").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub span: Span,
    pub message: String,
}
