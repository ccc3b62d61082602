//! Code generation faults.

use thiserror::Error;

use crate::parser::Span;

/// Internal faults of the code generator.
///
/// None of these can be triggered by a program that passed semantic
/// analysis except register exhaustion; they surface as a generic
/// compilation failure rather than a phase failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodegenError {
    /// A malformed expression reached code generation.
    #[error("cannot generate code for malformed expression: {message}")]
    MalformedExpression { message: String, span: Span },

    /// The register counter overflowed.
    #[error("register counter exhausted")]
    RegistersExhausted,
}
