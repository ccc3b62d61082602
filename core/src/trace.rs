//! Step-by-step record of one compilation.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

/// Pipeline stage a trace record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    LexicalAnalysis,
    SyntaxAnalysis,
    SemanticAnalysis,
    CodeGeneration,
    MachineCodeGeneration,
    Suggestions,
    Persistence,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::LexicalAnalysis => "lexical_analysis",
            Stage::SyntaxAnalysis => "syntax_analysis",
            Stage::SemanticAnalysis => "semantic_analysis",
            Stage::CodeGeneration => "code_generation",
            Stage::MachineCodeGeneration => "machine_code_generation",
            Stage::Suggestions => "suggestions",
            Stage::Persistence => "persistence",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured detail attached to a trace record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StagePayload {
    Lexical {
        token_count: usize,
        error_count: usize,
    },
    Syntax {
        statement_count: usize,
        error_count: usize,
    },
    Semantic {
        error_count: usize,
        declared: Vec<String>,
    },
    Codegen {
        instruction_count: usize,
        registers_used: u32,
    },
    Encoding {
        word_count: usize,
    },
    Suggestions {
        suggestion_count: usize,
    },
    Persistence {
        record_id: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceRecord {
    pub stage: Stage,
    pub timestamp: DateTime<Utc>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<StagePayload>,
}

/// Append-only list of trace records for a single invocation.
#[derive(Debug, Clone)]
pub struct TraceRecorder {
    records: Vec<TraceRecord>,
    with_payloads: bool,
}

impl TraceRecorder {
    pub fn new(with_payloads: bool) -> Self {
        Self {
            records: Vec::new(),
            with_payloads,
        }
    }

    pub fn record(&mut self, stage: Stage, message: impl Into<String>, payload: StagePayload) {
        let message = message.into();
        debug!(stage = %stage, "{}", message);
        self.records.push(TraceRecord {
            stage,
            timestamp: Utc::now(),
            message,
            payload: self.with_payloads.then_some(payload),
        });
    }

    pub fn records(&self) -> &[TraceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<TraceRecord> {
        self.records
    }
}

impl Default for TraceRecorder {
    fn default() -> Self {
        Self::new(true)
    }
}
