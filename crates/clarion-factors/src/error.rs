//! Error types for factor evaluation

use thiserror::Error;

/// Errors a single factor can raise
///
/// Factor errors are never fatal for an analysis run: the registry isolates
/// the failing factor, excludes it from aggregation, and records the
/// omission.
#[derive(Error, Debug)]
pub enum FactorError {
    /// A required input was missing or unusable
    #[error("Missing input: {0}")]
    MissingInput(String),

    /// The factor's internal computation failed
    #[error("Computation failed: {0}")]
    Computation(String),
}
