//! Error types for the fatigue engine

use thiserror::Error;

/// Fatigue engine error type
#[derive(Error, Debug)]
pub enum FatigueError {
    /// Vote references a proposal that is not part of the space
    #[error("delegate {delegate} voted on unknown proposal: {proposal_id}")]
    UnknownProposal { delegate: String, proposal_id: String },

    /// Same proposal id ingested twice with different creation timestamps
    #[error("proposal {proposal_id} has conflicting creation timestamps")]
    ProposalConflict { proposal_id: String },

    /// Configuration rejected by validation
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl FatigueError {
    /// Whether this error means the record set failed referential integrity.
    ///
    /// Integrity failures abort the whole space; nothing is analyzed.
    pub fn is_integrity(&self) -> bool {
        matches!(
            self,
            FatigueError::UnknownProposal { .. } | FatigueError::ProposalConflict { .. }
        )
    }
}

/// Result type for the fatigue engine
pub type EngineResult<T> = Result<T, FatigueError>;
