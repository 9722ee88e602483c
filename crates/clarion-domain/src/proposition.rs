//! Proposition - a versioned belief statement about a user

use crate::ids::{PropositionId, RevisionGroupId};

/// A proposition - one version of a belief the system holds about a user
///
/// Propositions evolve: each revision creates a new version under the same
/// revision group. Within a group exactly one version is current (the one
/// with the highest version number); older versions are immutable history.
/// This subsystem reads propositions, it never mutates them.
#[derive(Debug, Clone, PartialEq)]
pub struct Proposition {
    /// Unique identifier for this version
    pub id: PropositionId,

    /// The belief statement itself
    pub text: String,

    /// Why the system believes it (may be absent for older data)
    pub reasoning: Option<String>,

    /// Confidence on a 1.0-10.0 scale, absent when never scored
    pub confidence: Option<f64>,

    /// Staleness measure in [0,1]; higher means the belief has gone cold
    pub decay: Option<f64>,

    /// Identifier shared by all versions of this evolving belief
    pub revision_group: RevisionGroupId,

    /// Monotonically increasing version within the revision group
    pub version: u32,

    /// Number of observations backing this proposition
    pub observation_count: u32,

    /// When this version was created (seconds since Unix epoch)
    pub created_at: u64,

    /// When this version was last touched (seconds since Unix epoch)
    pub updated_at: u64,
}

impl Proposition {
    /// Create a new first-version proposition
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: PropositionId,
        text: String,
        reasoning: Option<String>,
        confidence: Option<f64>,
        revision_group: RevisionGroupId,
        observation_count: u32,
        created_at: u64,
    ) -> Self {
        Self {
            id,
            text,
            reasoning,
            confidence,
            decay: None,
            revision_group,
            version: 1,
            observation_count,
            created_at,
            updated_at: created_at,
        }
    }

    /// Build the next version of this proposition with revised text
    ///
    /// The new version carries the same revision group and an incremented
    /// version number; the original is left untouched as history.
    pub fn revised(&self, text: String, reasoning: Option<String>, now: u64) -> Self {
        Self {
            id: PropositionId::new(),
            text,
            reasoning,
            confidence: self.confidence,
            decay: self.decay,
            revision_group: self.revision_group,
            version: self.version + 1,
            observation_count: self.observation_count,
            created_at: now,
            updated_at: now,
        }
    }
}
