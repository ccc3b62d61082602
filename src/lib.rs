//! Stepwise - a teaching compiler that shows its work
//!
//! # Overview
//!
//! Stepwise compiles a tiny language of `let` declarations and `print`
//! statements into assembly for a toy register machine and then into 12-bit
//! machine words, recording a trace entry after every phase so front ends
//! can show the compilation step by step.
//!
//! # Quick Start
//!
//! ```
//! use stepwise::{Engine, EngineOptions};
//! use bumpalo::Bump;
//!
//! let engine = Engine::new(EngineOptions::default());
//!
//! // The AST is allocated in a per-compilation arena
//! let arena = Bump::new();
//! let result = engine.compile(&arena, "let x = 7;\nlet y = 66;\nprint (x + y);");
//!
//! let program = result.into_result().unwrap();
//! assert_eq!(
//!     program.machine_code_lines(),
//!     ["0001 0001 0111", "0001 0010 1111", "0011 0001 0010", "0010 0001 0000"]
//! );
//! ```
//!
//! # Errors
//!
//! Lexical, syntax and semantic errors stop the pipeline and come back as
//! diagnostics; [`render_error`] draws them against the source.

mod error_renderer;

pub use error_renderer::{
    render_error, render_error_to, render_error_to_string, render_error_to_string_no_color,
};

// Re-export public API from stepwise_core
pub use stepwise_core::api::{
    CompilationSnapshot, CompilationStore, CompileOptions, CompileResult, CompiledProgram,
    Diagnostic, Engine, EngineOptions, Error, InMemoryStore, Outcome, Phase, RecordId,
    RelatedInfo, Sample, Severity, StoreError, StoredCompilation, sample, samples,
};

// Re-export the pipeline building blocks
pub use stepwise_core::compiler::{Instruction, Register};
pub use stepwise_core::encoder::{MachineWord, encode, encode_lines};
pub use stepwise_core::lexer::{Token, TokenKind};
pub use stepwise_core::parser::{Expr, Program, Statement};
pub use stepwise_core::trace::{Stage, StagePayload, TraceRecord};
