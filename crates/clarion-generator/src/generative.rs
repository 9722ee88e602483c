//! LLM-backed drafting strategy

use std::fmt::Display;
use std::sync::Arc;

use clarion_domain::traits::LlmProvider;
use clarion_domain::GenerationMethod;
use tracing::debug;

use crate::context::{QuestionContext, QuestionDraft};
use crate::error::GenerationError;
use crate::parser::parse_draft_response;
use crate::prompt::PromptBuilder;
use crate::strategy::DraftStrategy;

/// Drafts clarifying questions by prompting a language model
///
/// Builds a structured prompt from the factor context, sends it to the
/// provider, and parses the JSON reply. Citations the model invents are
/// filtered out during parsing, so every draft's evidence traces back to
/// real observations.
pub struct GenerativeStrategy<L> {
    provider: Arc<L>,
}

impl<L> GenerativeStrategy<L>
where
    L: LlmProvider,
    L::Error: Display,
{
    /// Create a strategy backed by the given provider
    pub fn new(provider: Arc<L>) -> Self {
        Self { provider }
    }
}

impl<L> DraftStrategy for GenerativeStrategy<L>
where
    L: LlmProvider + Send + Sync,
    L::Error: Display,
{
    fn method(&self) -> GenerationMethod {
        GenerationMethod::Generative
    }

    fn draft(&self, ctx: &QuestionContext) -> Result<QuestionDraft, GenerationError> {
        if ctx.requires_evidence && ctx.evidence.is_empty() {
            return Err(GenerationError::Inapplicable(format!(
                "factor '{}' requires evidence but none was provided",
                ctx.factor_name
            )));
        }

        let prompt = PromptBuilder::new(ctx).build();
        debug!(
            factor = %ctx.factor_name,
            prompt_len = prompt.len(),
            "drafting question via language model"
        );

        let response = self
            .provider
            .generate(&prompt)
            .map_err(|e| GenerationError::Llm(e.to_string()))?;

        parse_draft_response(&response, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clarion_domain::{EvidenceRef, ObservationId, PropositionId};
    use clarion_llm::MockProvider;

    fn ctx(evidence: Vec<EvidenceRef>, requires_evidence: bool) -> QuestionContext {
        QuestionContext {
            proposition_id: PropositionId::new(),
            proposition_text: "User works late at night".to_string(),
            proposition_reasoning: Some("commits cluster after midnight".to_string()),
            factor_name: "hedging_language".to_string(),
            factor_id: 3,
            factor_score: 0.6,
            factor_rationale: "stated with hedging language".to_string(),
            requires_evidence,
            evidence,
        }
    }

    #[test]
    fn test_generative_draft_parses_provider_reply() {
        let provider = Arc::new(MockProvider::new(
            r#"{"question": "Do you usually work late at night?", "reasoning": "hedged wording", "evidence_ids": []}"#,
        ));
        let strategy = GenerativeStrategy::new(provider.clone());

        let draft = strategy.draft(&ctx(Vec::new(), false)).unwrap();
        assert_eq!(draft.question, "Do you usually work late at night?");
        assert_eq!(draft.method, GenerationMethod::Generative);
        assert_eq!(provider.call_count(), 1);
    }

    #[test]
    fn test_generative_inapplicable_without_required_evidence() {
        let provider = Arc::new(MockProvider::new("{}"));
        let strategy = GenerativeStrategy::new(provider.clone());

        let result = strategy.draft(&ctx(Vec::new(), true));
        assert!(matches!(result, Err(GenerationError::Inapplicable(_))));
        // provider never consulted
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_generative_surfaces_provider_failure() {
        let provider = Arc::new(MockProvider::failing());
        let strategy = GenerativeStrategy::new(provider);

        let result = strategy.draft(&ctx(Vec::new(), false));
        assert!(matches!(result, Err(GenerationError::Llm(_))));
    }

    #[test]
    fn test_generative_keeps_only_traceable_citations() {
        let obs = EvidenceRef {
            observation_id: ObservationId::new(),
            snippet: "pushed a commit at 02:14".to_string(),
        };
        let reply = format!(
            r#"{{"question": "Are late-night commits typical for you?", "reasoning": "r", "evidence_ids": ["{}", "{}"]}}"#,
            obs.observation_id,
            ObservationId::new()
        );
        let provider = Arc::new(MockProvider::new(reply.as_str()));
        let strategy = GenerativeStrategy::new(provider);

        let draft = strategy.draft(&ctx(vec![obs.clone()], true)).unwrap();
        assert_eq!(draft.evidence.len(), 1);
        assert_eq!(draft.evidence[0].observation_id, obs.observation_id);
    }
}
