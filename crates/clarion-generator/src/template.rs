//! Deterministic template-based drafting

use crate::context::{QuestionContext, QuestionDraft};
use crate::error::GenerationError;
use crate::strategy::DraftStrategy;
use clarion_domain::GenerationMethod;

/// Longest slice of the proposition text quoted inside a template
const QUOTED_TEXT_MAX: usize = 120;

/// Per-factor natural-language templates, no external service involved
///
/// Always available: this strategy is the tail of every fallback chain. It
/// is inapplicable only when the factor requires evidence and none exists.
#[derive(Debug, Default, Clone)]
pub struct TemplateStrategy;

impl TemplateStrategy {
    /// Create a template strategy
    pub fn new() -> Self {
        Self
    }

    fn quoted(text: &str) -> String {
        if text.len() > QUOTED_TEXT_MAX {
            let mut end = QUOTED_TEXT_MAX;
            while !text.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}...", &text[..end])
        } else {
            text.to_string()
        }
    }

    fn question_for(ctx: &QuestionContext) -> String {
        let belief = Self::quoted(&ctx.proposition_text);

        match ctx.factor_name.as_str() {
            "low_observation_count" => format!(
                "I think \"{}\", but I've seen very little to back that up. Is it actually right?",
                belief
            ),
            "confidence_decay" => format!(
                "I used to be more sure that \"{}\". Is this still true for you?",
                belief
            ),
            "hedging_language" => format!(
                "My note \"{}\" sounds tentative. Could you confirm or correct it?",
                belief
            ),
            "sibling_conflict" => format!(
                "I've held conflicting versions of \"{}\" over time. Which one matches reality?",
                belief
            ),
            "overgeneralization" => format!(
                "\"{}\" sounds absolute. Are there exceptions I should know about?",
                belief
            ),
            "opacity" => format!(
                "I believe \"{}\" but can't explain why. Is it accurate?",
                belief
            ),
            _ => format!("Is it accurate that \"{}\"?", belief),
        }
    }
}

impl DraftStrategy for TemplateStrategy {
    fn method(&self) -> GenerationMethod {
        GenerationMethod::Template
    }

    fn draft(&self, ctx: &QuestionContext) -> Result<QuestionDraft, GenerationError> {
        if ctx.requires_evidence && ctx.evidence.is_empty() {
            return Err(GenerationError::Inapplicable(format!(
                "factor '{}' requires evidence but none was provided",
                ctx.factor_name
            )));
        }

        let mut reasoning = format!(
            "Factor '{}' flagged the belief: {}",
            ctx.factor_name, ctx.factor_rationale
        );
        if let Some(first) = ctx.evidence.first() {
            reasoning.push_str(&format!(" Supporting observation: \"{}\"", first.snippet));
        }

        // Cite the first snippet when any evidence exists
        let evidence = ctx.evidence.first().cloned().into_iter().collect();

        Ok(QuestionDraft {
            question: Self::question_for(ctx),
            reasoning,
            evidence,
            method: GenerationMethod::Template,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clarion_domain::{EvidenceRef, ObservationId, PropositionId};

    fn ctx(factor: &str, requires_evidence: bool, evidence: Vec<EvidenceRef>) -> QuestionContext {
        QuestionContext {
            proposition_id: PropositionId::new(),
            proposition_text: "User prefers dark mode".to_string(),
            proposition_reasoning: None,
            factor_name: factor.to_string(),
            factor_id: 1,
            factor_score: 0.9,
            factor_rationale: "belief is backed by 1 observation(s)".to_string(),
            requires_evidence,
            evidence,
        }
    }

    fn one_evidence() -> Vec<EvidenceRef> {
        vec![EvidenceRef {
            observation_id: ObservationId::new(),
            snippet: "switched editor theme to dark at 23:10".to_string(),
        }]
    }

    #[test]
    fn test_template_draft_is_interrogative() {
        let draft = TemplateStrategy::new()
            .draft(&ctx("low_observation_count", true, one_evidence()))
            .unwrap();

        assert!(draft.question.ends_with('?'));
        assert_eq!(draft.method, GenerationMethod::Template);
        assert!(draft.question.contains("dark mode"));
    }

    #[test]
    fn test_template_reasoning_cites_observation() {
        let draft = TemplateStrategy::new()
            .draft(&ctx("low_observation_count", true, one_evidence()))
            .unwrap();

        assert!(draft.reasoning.contains("switched editor theme"));
        assert_eq!(draft.evidence.len(), 1);
    }

    #[test]
    fn test_template_inapplicable_without_required_evidence() {
        let result = TemplateStrategy::new().draft(&ctx("low_observation_count", true, vec![]));
        assert!(matches!(result, Err(GenerationError::Inapplicable(_))));
    }

    #[test]
    fn test_template_generic_fallback_for_unknown_factor() {
        let draft = TemplateStrategy::new()
            .draft(&ctx("some_future_factor", false, vec![]))
            .unwrap();

        assert!(draft.question.ends_with('?'));
        assert!(draft.evidence.is_empty());
    }

    #[test]
    fn test_template_truncates_long_beliefs() {
        let mut context = ctx("opacity", false, vec![]);
        context.proposition_text = "User ".repeat(100);

        let draft = TemplateStrategy::new().draft(&context).unwrap();
        assert!(draft.question.len() < 200);
    }

    #[test]
    fn test_per_factor_templates_differ() {
        let strategy = TemplateStrategy::new();
        let a = strategy.draft(&ctx("confidence_decay", false, vec![])).unwrap();
        let b = strategy.draft(&ctx("overgeneralization", false, vec![])).unwrap();
        assert_ne!(a.question, b.question);
    }
}
