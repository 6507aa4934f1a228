//! Patch error types
//!
//! Every variant is fatal for the whole batch: a partial set of structural
//! edits is never handed back.

use thiserror::Error;

use crate::shared::models::{ExtractorError, TextRange};

#[derive(Debug, Error)]
pub enum PatchError {
    /// Raw patch whose shape matches no known variant
    #[error("Invalid patch {op} {path}: {reason}")]
    InvalidPatch {
        op: String,
        path: String,
        reason: String,
    },

    /// Recognized path with an operation that has no defined effect
    #[error("Unsupported patch: {op} {path}")]
    Unsupported { op: String, path: String },

    #[error("Unknown node '{0}'")]
    UnknownNode(String),

    #[error("Unknown edge '{0}'")]
    UnknownEdge(String),

    /// The syntax backing a node or edge could not be re-located
    #[error("No editable syntax for {0}")]
    MissingLocation(String),

    #[error("Conflicting edits at {}..{} and {}..{}", first.start, first.end, second.start, second.end)]
    ConflictingEdits { first: TextRange, second: TextRange },

    /// Edit range outside the source text
    #[error("Edit {}..{} is out of bounds for a source of {len} bytes", range.start, range.end)]
    OutOfBounds { range: TextRange, len: usize },

    #[error("File '{0}' is not part of the program")]
    FileNotFound(String),

    #[error("Machine #{index} not found in '{file}'")]
    MachineNotFound { file: String, index: usize },
}

pub type PatchResult<T> = Result<T, PatchError>;

impl PatchError {
    pub fn invalid(op: impl ToString, path: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidPatch {
            op: op.to_string(),
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    pub fn unsupported(op: impl ToString, path: impl ToString) -> Self {
        Self::Unsupported {
            op: op.to_string(),
            path: path.to_string(),
        }
    }
}

impl From<PatchError> for ExtractorError {
    fn from(err: PatchError) -> Self {
        let file = match &err {
            PatchError::FileNotFound(file) | PatchError::MachineNotFound { file, .. } => Some(file.clone()),
            _ => None,
        };
        let converted = match &err {
            PatchError::FileNotFound(_) | PatchError::MachineNotFound { .. } => {
                ExtractorError::extraction(err.to_string())
            }
            _ => ExtractorError::patch(err.to_string()),
        };
        let converted = match file {
            Some(file) => converted.with_file(file),
            None => converted,
        };
        converted.with_source(err)
    }
}
