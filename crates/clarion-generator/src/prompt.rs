//! Prompt engineering for generative question drafting

use crate::context::QuestionContext;

/// Builds the prompt sent to the generation service for one factor
pub struct PromptBuilder<'a> {
    ctx: &'a QuestionContext,
}

impl<'a> PromptBuilder<'a> {
    /// Create a builder over one drafting context
    pub fn new(ctx: &'a QuestionContext) -> Self {
        Self { ctx }
    }

    /// Build the complete drafting prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(DRAFTING_INSTRUCTIONS);
        prompt.push_str("\n\n");

        prompt.push_str(&format!("Belief: {}\n", self.ctx.proposition_text));
        if let Some(reasoning) = &self.ctx.proposition_reasoning {
            prompt.push_str(&format!("Why the system holds it: {}\n", reasoning));
        }
        prompt.push_str(&format!(
            "Ambiguity signal ({}): {}\n\n",
            self.ctx.factor_name, self.ctx.factor_rationale
        ));

        if self.ctx.evidence.is_empty() {
            prompt.push_str("No observations are available as evidence.\n");
        } else {
            prompt.push_str("Observations (cite by id):\n");
            for evidence in &self.ctx.evidence {
                prompt.push_str(&format!(
                    "- [{}] {}\n",
                    evidence.observation_id, evidence.snippet
                ));
            }
        }

        prompt.push('\n');
        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }
}

const DRAFTING_INSTRUCTIONS: &str = r#"You help a personal assistant check its beliefs about its user.
The belief below was flagged as ambiguous. Draft ONE short clarifying question to ask the user directly.

Rules:
- Address the user in second person, conversationally
- The question must resolve the specific ambiguity signal given below
- Do not mention internal identifiers, scores, or system machinery
- Cite only the observation ids listed; never invent evidence
- Keep the question under 250 characters and end it with a question mark"#;

const OUTPUT_FORMAT_REMINDER: &str = r#"Output format (JSON object only, no additional text):
{
  "question": "the clarifying question",
  "reasoning": "one sentence on why this question resolves the ambiguity",
  "evidence_ids": ["observation id", "..."]
}

Remember: Return ONLY valid JSON, no markdown code blocks, no explanations."#;

#[cfg(test)]
mod tests {
    use super::*;
    use clarion_domain::{EvidenceRef, ObservationId, PropositionId};

    fn ctx() -> QuestionContext {
        QuestionContext {
            proposition_id: PropositionId::new(),
            proposition_text: "User prefers dark mode".to_string(),
            proposition_reasoning: Some("Theme switched after sunset".to_string()),
            factor_name: "low_observation_count".to_string(),
            factor_id: 1,
            factor_score: 0.9,
            factor_rationale: "belief is backed by 1 observation(s)".to_string(),
            requires_evidence: true,
            evidence: vec![EvidenceRef {
                observation_id: ObservationId::new(),
                snippet: "switched editor theme to dark".to_string(),
            }],
        }
    }

    #[test]
    fn test_prompt_includes_belief_and_signal() {
        let context = ctx();
        let prompt = PromptBuilder::new(&context).build();

        assert!(prompt.contains("User prefers dark mode"));
        assert!(prompt.contains("low_observation_count"));
        assert!(prompt.contains("Theme switched after sunset"));
    }

    #[test]
    fn test_prompt_lists_evidence_with_ids() {
        let context = ctx();
        let prompt = PromptBuilder::new(&context).build();

        assert!(prompt.contains("switched editor theme to dark"));
        assert!(prompt.contains(&context.evidence[0].observation_id.to_string()));
    }

    #[test]
    fn test_prompt_notes_missing_evidence() {
        let mut context = ctx();
        context.evidence.clear();
        let prompt = PromptBuilder::new(&context).build();

        assert!(prompt.contains("No observations are available"));
    }

    #[test]
    fn test_prompt_demands_json_object() {
        let context = ctx();
        let prompt = PromptBuilder::new(&context).build();

        assert!(prompt.contains("\"question\""));
        assert!(prompt.contains("\"evidence_ids\""));
        assert!(prompt.contains("ONLY valid JSON"));
    }
}
