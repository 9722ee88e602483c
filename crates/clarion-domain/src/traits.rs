//! Trait definitions for external interactions
//!
//! These traits mark the boundaries between domain logic and infrastructure.
//! Implementations live in `clarion-store` and `clarion-llm`.

use crate::analysis::ClarificationAnalysis;
use crate::ids::{PropositionId, RevisionGroupId};
use crate::observation::Observation;
use crate::proposition::Proposition;
use crate::question::ClarifyingQuestion;

/// Read access to propositions and their evidence
///
/// The analysis pipeline only ever reads through this trait; propositions
/// and observations are owned and mutated by collaborating systems.
pub trait PropositionStore {
    /// Error type for store operations
    type Error;

    /// Get one proposition version by id
    fn get_proposition(&self, id: PropositionId) -> Result<Option<Proposition>, Self::Error>;

    /// Get the current (highest-version) proposition of a revision group
    fn current_proposition(
        &self,
        group: RevisionGroupId,
    ) -> Result<Option<Proposition>, Self::Error>;

    /// All versions of a revision group, ordered by ascending version
    fn revision_history(&self, group: RevisionGroupId) -> Result<Vec<Proposition>, Self::Error>;

    /// Observations linked to a proposition, newest first
    fn observations_for(&self, id: PropositionId) -> Result<Vec<Observation>, Self::Error>;
}

/// Persistence for analyses and their questions
pub trait AnalysisStore {
    /// Error type for store operations
    type Error;

    /// Atomically replace the analysis and questions for one proposition
    /// version
    ///
    /// Deletes any prior analysis (and its questions) for the same
    /// (revision_group, version) and writes the new set as a single unit.
    /// Partial writes must never be observable to readers.
    fn replace_analysis(
        &mut self,
        analysis: &ClarificationAnalysis,
        questions: &[ClarifyingQuestion],
    ) -> Result<(), Self::Error>;

    /// The authoritative analysis for the revision group a proposition
    /// belongs to
    ///
    /// Resolves through the proposition's revision group to its current
    /// version; historical analyses of older versions are never returned.
    fn analysis_for(
        &self,
        id: PropositionId,
    ) -> Result<Option<ClarificationAnalysis>, Self::Error>;

    /// Questions persisted for the current version of the proposition's
    /// revision group, in generation order
    fn questions_for(&self, id: PropositionId) -> Result<Vec<ClarifyingQuestion>, Self::Error>;
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (`clarion-llm`). The interface is
/// synchronous; async callers wrap invocations in `spawn_blocking` with a
/// bounded timeout.
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate a text completion for the given prompt
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;
}
