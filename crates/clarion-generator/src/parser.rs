//! Parse generation-service output into a question draft

use crate::context::{QuestionContext, QuestionDraft};
use crate::error::GenerationError;
use clarion_domain::{EvidenceRef, GenerationMethod};
use serde_json::Value;
use tracing::warn;

/// Parse an LLM completion into a draft, enforcing evidence traceability
///
/// Evidence ids cited by the model are filtered to ids actually present in
/// the context; anything else is dropped. When the model cites nothing
/// usable but evidence exists, the first input snippet is attached so the
/// draft stays reviewable.
pub fn parse_draft_response(
    response: &str,
    ctx: &QuestionContext,
) -> Result<QuestionDraft, GenerationError> {
    let json_str = extract_json(response)?;

    let json: Value = serde_json::from_str(&json_str)
        .map_err(|e| GenerationError::InvalidFormat(format!("JSON parse error: {}", e)))?;

    let obj = json
        .as_object()
        .ok_or_else(|| GenerationError::InvalidFormat("Expected JSON object".to_string()))?;

    let question = obj
        .get("question")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .unwrap_or("");
    if question.is_empty() {
        return Err(GenerationError::EmptyCompletion);
    }

    let reasoning = obj
        .get("reasoning")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| ctx.factor_rationale.clone());

    let cited_ids: Vec<String> = obj
        .get("evidence_ids")
        .and_then(|v| v.as_array())
        .map(|a| {
            a.iter()
                .filter_map(|v| v.as_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let mut evidence: Vec<EvidenceRef> = Vec::new();
    for id in &cited_ids {
        match ctx
            .evidence
            .iter()
            .find(|e| e.observation_id.to_string() == *id)
        {
            Some(e) => evidence.push(e.clone()),
            None => warn!(cited = %id, "model cited an observation id not in its input, dropping"),
        }
    }

    if evidence.is_empty() {
        if let Some(first) = ctx.evidence.first() {
            evidence.push(first.clone());
        }
    }

    Ok(QuestionDraft {
        question: question.to_string(),
        reasoning,
        evidence,
        method: GenerationMethod::Generative,
    })
}

/// Extract JSON from a completion, tolerating markdown code fences
fn extract_json(response: &str) -> Result<String, GenerationError> {
    let trimmed = response.trim();

    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(GenerationError::InvalidFormat("Empty code block".to_string()));
        }

        // Skip the opening fence and any closing fence
        let json_lines = &lines[1..lines.len().saturating_sub(1)];
        Ok(json_lines.join("\n"))
    } else {
        Ok(trimmed.to_string())
    }
}
