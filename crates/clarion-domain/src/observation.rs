//! Observations - read-only evidence backing propositions

use crate::ids::ObservationId;

/// A recorded piece of user activity that supports one or more propositions
///
/// Observation capture and lifecycle belong to collaborating systems; this
/// subsystem only ever reads observation content.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Unique identifier
    pub id: ObservationId,

    /// Observation content as captured
    pub content: String,

    /// When the observation was recorded (seconds since Unix epoch)
    pub created_at: u64,
}

/// A citation into an observation, attached to a clarifying question
///
/// Every evidence reference must be traceable to an observation that was
/// actually passed to the generator; strategies never invent evidence.
#[derive(Debug, Clone, PartialEq)]
pub struct EvidenceRef {
    /// The cited observation
    pub observation_id: ObservationId,

    /// Snippet of the observation content, truncated for display
    pub snippet: String,
}

impl EvidenceRef {
    /// Build a citation from an observation, truncating content to `max_len`
    pub fn from_observation(obs: &Observation, max_len: usize) -> Self {
        let snippet = if obs.content.len() > max_len {
            let mut end = max_len;
            while !obs.content.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}...", &obs.content[..end])
        } else {
            obs.content.clone()
        };

        Self {
            observation_id: obs.id,
            snippet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evidence_ref_truncates_long_content() {
        let obs = Observation {
            id: ObservationId::new(),
            content: "x".repeat(500),
            created_at: 0,
        };

        let evidence = EvidenceRef::from_observation(&obs, 200);
        assert_eq!(evidence.snippet.len(), 203); // 200 chars + "..."
        assert!(evidence.snippet.ends_with("..."));
    }

    #[test]
    fn test_evidence_ref_keeps_short_content() {
        let obs = Observation {
            id: ObservationId::new(),
            content: "opened settings".to_string(),
            created_at: 0,
        };

        let evidence = EvidenceRef::from_observation(&obs, 200);
        assert_eq!(evidence.snippet, "opened settings");
    }

    #[test]
    fn test_evidence_ref_respects_char_boundaries() {
        let obs = Observation {
            id: ObservationId::new(),
            content: "héllo wörld".repeat(30),
            created_at: 0,
        };

        // Must not panic on a multi-byte boundary
        let evidence = EvidenceRef::from_observation(&obs, 101);
        assert!(evidence.snippet.ends_with("..."));
    }
}
