//! The stepwise compilation engine.

use std::panic::{self, AssertUnwindSafe};

use bumpalo::Bump;
use thiserror::Error;
use tracing::{debug, warn};

use super::{
    CompilationSnapshot, CompilationStore, CompileOptions, CompileResult, CompiledProgram,
    EngineOptions, Outcome, Phase, StoreError,
};
use crate::compiler::{self, CodegenError};
use crate::trace::{Stage, StagePayload, TraceRecorder};
use crate::{analyzer, encoder, lexer, parser, suggestions};

/// Runs the compilation pipeline.
///
/// The engine holds configuration and an optional store only. All
/// per-compilation state (trace, symbol tables, register counter) is created
/// inside each call, so one engine can serve many threads at once.
///
/// # Example
///
/// ```
/// use bumpalo::Bump;
/// use stepwise_core::api::{Engine, EngineOptions};
///
/// let engine = Engine::new(EngineOptions::default());
/// let arena = Bump::new();
/// let result = engine.compile(&arena, "let x = 7;\nlet y = 66;\nprint (x + y);");
///
/// let program = result.into_result().unwrap();
/// assert_eq!(program.assembly_lines(), ["MOV R1, 7", "MOV R2, 66", "ADD R1, R2", "OUT R1"]);
/// ```
#[derive(Default)]
pub struct Engine<'s> {
    options: EngineOptions,
    store: Option<&'s dyn CompilationStore>,
}

impl<'s> Engine<'s> {
    pub fn new(options: EngineOptions) -> Self {
        Self {
            options,
            store: None,
        }
    }

    /// Attach a store used when a compilation asks to be saved.
    pub fn with_store(mut self, store: &'s dyn CompilationStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Compile with the engine's default options.
    pub fn compile<'a>(&self, arena: &'a Bump, source: &'a str) -> CompileResult<'a> {
        self.compile_with(arena, source, self.options.default_compile_options)
    }

    /// Compile `source`, allocating the AST in `arena`.
    ///
    /// Never panics: internal faults, including panics inside a phase, come
    /// back as [`Outcome::Fault`] together with the partial trace.
    pub fn compile_with<'a>(
        &self,
        arena: &'a Bump,
        source: &'a str,
        options: CompileOptions,
    ) -> CompileResult<'a> {
        debug!(bytes = source.len(), save = options.save, "compilation started");
        let mut trace = TraceRecorder::new(options.trace_payloads);

        let run = panic::catch_unwind(AssertUnwindSafe(|| {
            Pipeline {
                arena,
                source,
                options,
                store: self.store,
                trace: &mut trace,
            }
            .run()
        }));

        let outcome = match run {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(fault)) => {
                warn!(%fault, "compilation fault");
                Outcome::Fault(fault.to_string())
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(%message, "panic during compilation");
                Outcome::Fault(message)
            }
        };

        CompileResult {
            outcome,
            steps: trace.into_records(),
        }
    }
}

#[derive(Debug, Error)]
enum Fault {
    #[error(transparent)]
    Codegen(#[from] CodegenError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// State for one invocation.
struct Pipeline<'a, 's, 't> {
    arena: &'a Bump,
    source: &'a str,
    options: CompileOptions,
    store: Option<&'s dyn CompilationStore>,
    trace: &'t mut TraceRecorder,
}

impl<'a> Pipeline<'a, '_, '_> {
    fn run(self) -> Result<Outcome<'a>, Fault> {
        let Pipeline {
            arena,
            source,
            options,
            store,
            trace,
        } = self;

        let (tokens, lex_errors) = lexer::tokenize(source);
        trace.record(
            Stage::LexicalAnalysis,
            if lex_errors.is_empty() {
                format!("Tokenized source into {} tokens", tokens.len())
            } else {
                format!("Found {} lexical error(s)", lex_errors.len())
            },
            StagePayload::Lexical {
                token_count: tokens.len(),
                error_count: lex_errors.len(),
            },
        );
        if !lex_errors.is_empty() {
            return Ok(Outcome::PhaseFailure {
                phase: Phase::Lexical,
                tokens,
                errors: lex_errors.iter().map(|e| e.to_diagnostic()).collect(),
            });
        }

        let (program, syntax_errors) = parser::parse(arena, &tokens);
        trace.record(
            Stage::SyntaxAnalysis,
            if syntax_errors.is_empty() {
                format!("Parsed {} statement(s)", program.len())
            } else {
                "Parsing stopped at the first syntax error".to_string()
            },
            StagePayload::Syntax {
                statement_count: program.len(),
                error_count: syntax_errors.len(),
            },
        );
        if !syntax_errors.is_empty() {
            return Ok(Outcome::PhaseFailure {
                phase: Phase::Syntax,
                tokens,
                errors: syntax_errors.iter().map(|e| e.to_diagnostic()).collect(),
            });
        }

        let (semantic_errors, declared) = analyzer::analyze_with_symbols(arena, program);
        trace.record(
            Stage::SemanticAnalysis,
            if semantic_errors.is_empty() {
                format!("Checked {} declaration(s)", declared.len())
            } else {
                format!("Found {} semantic error(s)", semantic_errors.len())
            },
            StagePayload::Semantic {
                error_count: semantic_errors.len(),
                declared: declared.iter().map(|name| name.to_string()).collect(),
            },
        );
        if !semantic_errors.is_empty() {
            return Ok(Outcome::PhaseFailure {
                phase: Phase::Semantic,
                tokens,
                errors: semantic_errors.iter().map(|e| e.to_diagnostic()).collect(),
            });
        }

        let assembly = compiler::generate(arena, program)?;
        trace.record(
            Stage::CodeGeneration,
            format!(
                "Generated {} instruction(s) using {} register(s)",
                assembly.instructions.len(),
                assembly.registers_used
            ),
            StagePayload::Codegen {
                instruction_count: assembly.instructions.len(),
                registers_used: assembly.registers_used,
            },
        );

        let machine_code = encoder::encode(&assembly.instructions);
        trace.record(
            Stage::MachineCodeGeneration,
            format!("Encoded {} machine word(s)", machine_code.len()),
            StagePayload::Encoding {
                word_count: machine_code.len(),
            },
        );

        let suggestions = suggestions::suggest(program, &assembly.instructions);
        trace.record(
            Stage::Suggestions,
            format!("Produced {} suggestion(s)", suggestions.len()),
            StagePayload::Suggestions {
                suggestion_count: suggestions.len(),
            },
        );

        let saved = match (options.save, store) {
            (true, Some(store)) => {
                let snapshot = CompilationSnapshot {
                    source,
                    tokens: &tokens,
                    ast: program,
                    assembly: &assembly.instructions,
                    machine_code: &machine_code,
                    compilation_steps: trace.records(),
                };
                let id = store.save(&snapshot)?;
                trace.record(
                    Stage::Persistence,
                    format!("Saved compilation {}", id),
                    StagePayload::Persistence { record_id: id.0 },
                );
                Some(id)
            }
            (true, None) => {
                warn!("save requested but no store is configured");
                None
            }
            (false, _) => None,
        };

        Ok(Outcome::Success(CompiledProgram {
            tokens,
            ast: program,
            assembly: assembly.instructions,
            machine_code,
            suggestions,
            saved,
        }))
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
