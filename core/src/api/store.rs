//! Persistence seam for successful compilations.

use core::fmt;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::compiler::Instruction;
use crate::encoder::MachineWord;
use crate::lexer::Token;
use crate::parser::Program;
use crate::trace::TraceRecord;

/// Identifier handed out by a store for a saved compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Everything a store receives about one successful compilation.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CompilationSnapshot<'r, 'a> {
    pub source: &'a str,
    pub tokens: &'r [Token<'a>],
    pub ast: Program<'a>,
    pub assembly: &'r [Instruction],
    pub machine_code: &'r [MachineWord],
    pub compilation_steps: &'r [TraceRecord],
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to serialize compilation: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Storage for compilations the caller asked to keep.
///
/// Shared by every invocation of an engine, so implementations must be
/// safe to call from several threads at once.
pub trait CompilationStore: Send + Sync {
    fn save(&self, snapshot: &CompilationSnapshot<'_, '_>) -> Result<RecordId, StoreError>;
}

/// A saved compilation as kept by [`InMemoryStore`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredCompilation {
    pub id: RecordId,
    pub saved_at: DateTime<Utc>,
    pub source: String,
    /// The snapshot rendered as JSON.
    pub document: serde_json::Value,
}

/// Thread-safe store keeping JSON snapshots in memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: Mutex<Vec<StoredCompilation>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: RecordId) -> Option<StoredCompilation> {
        let records = self.records.lock().ok()?;
        records.iter().find(|r| r.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map_or(0, |records| records.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Saved compilations, most recent first.
    pub fn history(&self) -> Vec<StoredCompilation> {
        match self.records.lock() {
            Ok(records) => records.iter().rev().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }
}

impl CompilationStore for InMemoryStore {
    fn save(&self, snapshot: &CompilationSnapshot<'_, '_>) -> Result<RecordId, StoreError> {
        let document = serde_json::to_value(snapshot)?;
        let mut records = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        let id = RecordId(records.len() as u64 + 1);
        records.push(StoredCompilation {
            id,
            saved_at: Utc::now(),
            source: snapshot.source.to_string(),
            document,
        });
        debug!(%id, "compilation saved");
        Ok(id)
    }
}
