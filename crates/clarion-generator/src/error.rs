//! Error types for question generation

use thiserror::Error;

/// Errors that can occur while drafting a question
///
/// None of these are fatal for an analysis run: the orchestrator falls back
/// to the next strategy in the chain, and omits the question entirely only
/// when every strategy fails.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// The generation service failed
    #[error("LLM error: {0}")]
    Llm(String),

    /// The generation attempt exceeded its bounded timeout
    #[error("Generation timeout")]
    Timeout,

    /// The completion could not be parsed into a question
    #[error("Invalid completion format: {0}")]
    InvalidFormat(String),

    /// The completion was empty or contained no question text
    #[error("Empty completion")]
    EmptyCompletion,

    /// The strategy cannot draft for this factor context
    #[error("Strategy inapplicable: {0}")]
    Inapplicable(String),
}

impl From<serde_json::Error> for GenerationError {
    fn from(e: serde_json::Error) -> Self {
        GenerationError::InvalidFormat(e.to_string())
    }
}
