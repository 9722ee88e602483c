//! Analysis run state machine

use std::fmt;

/// The stages an analysis run moves through
///
/// Transitions are strictly forward; `Failed` is reachable from any stage.
/// The final state is carried on the run outcome for observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisState {
    /// Run accepted, nothing computed yet
    Pending,

    /// Factor battery is being evaluated
    Scoring,

    /// Aggregate decision has been made
    Decided,

    /// Clarifying questions are being drafted
    Generating,

    /// Drafted questions are being validated
    Validating,

    /// Analysis and questions are durably stored
    Persisted,

    /// Run aborted with an error
    Failed,
}

impl fmt::Display for AnalysisState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AnalysisState::Pending => "pending",
            AnalysisState::Scoring => "scoring",
            AnalysisState::Decided => "decided",
            AnalysisState::Generating => "generating",
            AnalysisState::Validating => "validating",
            AnalysisState::Persisted => "persisted",
            AnalysisState::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}
