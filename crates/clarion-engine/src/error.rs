//! Engine error types

use clarion_domain::PropositionId;
use thiserror::Error;

/// Errors that can occur during analysis orchestration
#[derive(Error, Debug)]
pub enum EngineError {
    /// Proposition does not exist
    #[error("Proposition not found: {0}")]
    PropositionNotFound(PropositionId),

    /// Store error
    #[error("Store error: {0}")]
    Store(String),
}
