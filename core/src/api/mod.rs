//! Public API for the stepwise compiler.
//!
//! [`Engine::compile`] runs the whole pipeline (lexing, parsing, semantic
//! analysis, code generation, machine-code encoding and suggestions) and
//! returns a [`CompileResult`] carrying either the artifacts or the errors
//! of the phase that stopped it, plus the step-by-step trace.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use stepwise_core::api::{Engine, EngineOptions, InMemoryStore, CompileOptions};
//!
//! let store = InMemoryStore::new();
//! let engine = Engine::new(EngineOptions::default()).with_store(&store);
//!
//! let arena = Bump::new();
//! let options = CompileOptions { save: true, ..CompileOptions::default() };
//! let result = engine.compile_with(&arena, "print \"hi\";", options);
//!
//! assert!(result.is_success());
//! assert_eq!(store.len(), 1);
//! ```

pub mod engine;
pub mod error;
pub mod options;
pub mod result;
pub mod samples;
pub mod store;

pub use engine::Engine;
pub use error::{Diagnostic, Error, RelatedInfo, Severity};
pub use options::{CompileOptions, EngineOptions};
pub use result::{CompileResult, CompiledProgram, Outcome, Phase};
pub use samples::{Sample, sample, samples};
pub use store::{
    CompilationSnapshot, CompilationStore, InMemoryStore, RecordId, StoreError, StoredCompilation,
};
