//! Error taxonomy shared by the ledger, the correction workflow and persistence.
use thiserror::Error;

/// Errors raised by score ledger operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScoreError {
    /// Malformed margin/side combination or a transition that does not apply.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// End index outside the ledger bounds.
    #[error("end index {index} out of range (ledger has {len} ends)")]
    OutOfRange { index: usize, len: usize },
    /// No persisted game under the requested key.
    #[error("no saved game under key {key:?}")]
    NotFound { key: String },
    /// Storage read or write failed; in-memory state is unaffected.
    #[error("persistence failure: {0}")]
    PersistenceFailure(String),
}

impl ScoreError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

pub type ScoreResult<T> = Result<T, ScoreError>;
