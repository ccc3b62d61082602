//! The outcome of one compilation and its wire shape.

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::api::{Diagnostic, Error, RecordId};
use crate::compiler::Instruction;
use crate::encoder::MachineWord;
use crate::lexer::Token;
use crate::parser::Program;
use crate::trace::TraceRecord;

/// The phases whose errors stop the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Lexical,
    Syntax,
    Semantic,
}

impl Phase {
    /// Label used in the `error` field of a failed result.
    pub fn failure_label(self) -> &'static str {
        match self {
            Phase::Lexical => "Lexical Analysis Failed",
            Phase::Syntax => "Syntax Analysis Failed",
            Phase::Semantic => "Semantic Analysis Failed",
        }
    }
}

/// Artifacts of a successful compilation.
#[derive(Debug, Clone)]
pub struct CompiledProgram<'a> {
    pub tokens: Vec<Token<'a>>,
    pub ast: Program<'a>,
    pub assembly: Vec<Instruction>,
    pub machine_code: Vec<MachineWord>,
    pub suggestions: Vec<String>,
    /// Set when the program was handed to a store.
    pub saved: Option<RecordId>,
}

impl CompiledProgram<'_> {
    pub fn assembly_lines(&self) -> Vec<String> {
        self.assembly.iter().map(|i| i.to_string()).collect()
    }

    pub fn machine_code_lines(&self) -> Vec<String> {
        self.machine_code.iter().map(|w| w.to_string()).collect()
    }
}

#[derive(Debug, Clone)]
pub enum Outcome<'a> {
    Success(CompiledProgram<'a>),
    /// A phase reported errors; later phases did not run.
    PhaseFailure {
        phase: Phase,
        tokens: Vec<Token<'a>>,
        errors: Vec<Diagnostic>,
    },
    /// An internal fault, including panics caught at the top level.
    Fault(String),
}

/// Result of `Engine::compile`: the outcome plus the trace recorded up to
/// the point where the pipeline stopped.
#[derive(Debug, Clone)]
pub struct CompileResult<'a> {
    pub outcome: Outcome<'a>,
    pub steps: Vec<TraceRecord>,
}

impl<'a> CompileResult<'a> {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success(_))
    }

    pub fn program(&self) -> Option<&CompiledProgram<'a>> {
        match &self.outcome {
            Outcome::Success(program) => Some(program),
            _ => None,
        }
    }

    /// Messages of the phase errors, empty unless a phase failed.
    pub fn error_messages(&self) -> Vec<String> {
        match &self.outcome {
            Outcome::PhaseFailure { errors, .. } => {
                errors.iter().map(|d| d.message.clone()).collect()
            }
            _ => Vec::new(),
        }
    }

    /// The `error` field of the wire shape, if any.
    pub fn error_label(&self) -> Option<String> {
        match &self.outcome {
            Outcome::Success(_) => None,
            Outcome::PhaseFailure { phase, .. } => Some(phase.failure_label().to_string()),
            Outcome::Fault(message) => Some(fault_label(message)),
        }
    }

    /// Drop the trace and convert to a `Result`.
    pub fn into_result(self) -> Result<CompiledProgram<'a>, Error> {
        match self.outcome {
            Outcome::Success(program) => Ok(program),
            Outcome::PhaseFailure {
                phase,
                errors: diagnostics,
                ..
            } => Err(match phase {
                Phase::Lexical => Error::Lexical { diagnostics },
                Phase::Syntax => Error::Syntax { diagnostics },
                Phase::Semantic => Error::Semantic { diagnostics },
            }),
            Outcome::Fault(message) => Err(Error::Internal(message)),
        }
    }
}

fn fault_label(message: &str) -> String {
    format!("Compilation failed: {}", message)
}

#[derive(serde::Serialize)]
struct SuccessData<'r, 'a> {
    tokens: &'r [Token<'a>],
    ast: Program<'a>,
    assembly: &'r [Instruction],
    machine_code: &'r [MachineWord],
    ai_suggestions: &'r [String],
    compilation_steps: &'r [TraceRecord],
}

#[derive(serde::Serialize)]
struct FailureData<'r, 'a> {
    tokens: &'r [Token<'a>],
    errors: Vec<&'r str>,
    compilation_steps: &'r [TraceRecord],
}

/// Serializes to one of three shapes:
///
/// ```text
/// {success: true,  data: {tokens, ast, assembly, machine_code, ai_suggestions, compilation_steps}}
/// {success: false, error: "<Phase> Analysis Failed", data: {tokens, errors, compilation_steps}}
/// {success: false, error: "Compilation failed: <message>", compilation_steps}
/// ```
impl Serialize for CompileResult<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.outcome {
            Outcome::Success(program) => {
                let mut state = serializer.serialize_struct("CompileResult", 2)?;
                state.serialize_field("success", &true)?;
                state.serialize_field(
                    "data",
                    &SuccessData {
                        tokens: &program.tokens,
                        ast: program.ast,
                        assembly: &program.assembly,
                        machine_code: &program.machine_code,
                        ai_suggestions: &program.suggestions,
                        compilation_steps: &self.steps,
                    },
                )?;
                state.end()
            }
            Outcome::PhaseFailure {
                phase,
                tokens,
                errors,
            } => {
                let mut state = serializer.serialize_struct("CompileResult", 3)?;
                state.serialize_field("success", &false)?;
                state.serialize_field("error", phase.failure_label())?;
                state.serialize_field(
                    "data",
                    &FailureData {
                        tokens,
                        errors: errors.iter().map(|d| d.message.as_str()).collect(),
                        compilation_steps: &self.steps,
                    },
                )?;
                state.end()
            }
            Outcome::Fault(message) => {
                let mut state = serializer.serialize_struct("CompileResult", 3)?;
                state.serialize_field("success", &false)?;
                state.serialize_field("error", &fault_label(message))?;
                state.serialize_field("compilation_steps", &self.steps)?;
                state.end()
            }
        }
    }
}
