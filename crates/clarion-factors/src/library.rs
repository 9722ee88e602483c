//! Built-in ambiguity factors
//!
//! Six independent heuristics, each scoring one reason a belief may warrant
//! a clarifying question. All are pure functions of the factor context.

use crate::context::{FactorContext, FactorScore};
use crate::error::FactorError;
use crate::registry::Factor;

/// Words that soften a belief statement
const HEDGE_WORDS: &[&str] = &[
    "might",
    "may",
    "possibly",
    "perhaps",
    "probably",
    "seems",
    "appears",
    "likely",
    "sometimes",
    "occasionally",
];

/// Words that overstate a belief statement
const ABSOLUTE_WORDS: &[&str] = &["always", "never", "every", "all", "none", "only"];

/// Tokens that flip the sense of a statement
const NEGATION_WORDS: &[&str] = &["not", "never", "no", "stopped", "dislikes", "avoids"];

/// Common words ignored when comparing proposition texts
const STOPWORDS: &[&str] = &[
    "the", "a", "an", "is", "are", "was", "were", "to", "of", "in", "on", "for", "user", "prefers",
    "and", "or",
];

/// Lowercased alphanumeric tokens of a text
fn tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

/// Which entries of `vocabulary` occur as whole words in `text`
fn matched_words<'v>(text: &str, vocabulary: &[&'v str]) -> Vec<&'v str> {
    let toks = tokens(text);
    vocabulary
        .iter()
        .filter(|w| toks.iter().any(|t| t == *w))
        .copied()
        .collect()
}

/// The belief rests on very few observations
///
/// One observation is barely evidence; scores fall off linearly and reach
/// zero at ten or more observations.
pub struct LowObservationCount;

impl Factor for LowObservationCount {
    fn name(&self) -> &'static str {
        "low_observation_count"
    }

    fn id(&self) -> u16 {
        1
    }

    fn requires_evidence(&self) -> bool {
        true
    }

    fn evaluate(&self, ctx: &FactorContext<'_>) -> Result<FactorScore, FactorError> {
        let count = ctx.proposition.observation_count;
        let score = if count == 0 {
            1.0
        } else {
            1.0 - count as f64 / 10.0
        };

        Ok(FactorScore::new(
            score,
            format!("belief is backed by {} observation(s)", count),
        ))
    }
}

/// Confidence is low, absent, or has decayed
pub struct ConfidenceDecay;

impl Factor for ConfidenceDecay {
    fn name(&self) -> &'static str {
        "confidence_decay"
    }

    fn id(&self) -> u16 {
        2
    }

    fn evaluate(&self, ctx: &FactorContext<'_>) -> Result<FactorScore, FactorError> {
        let Some(confidence) = ctx.proposition.confidence else {
            return Ok(FactorScore::new(0.5, "confidence has never been scored"));
        };

        let mut score = 1.0 - confidence / 10.0;
        let mut rationale = format!("confidence {:.1}/10", confidence);

        if let Some(decay) = ctx.proposition.decay {
            if decay > 0.5 {
                score += decay - 0.5;
                rationale.push_str(&format!("; decay {:.2} exceeds the 0.50 floor", decay));
            }
        }

        Ok(FactorScore::new(score, rationale))
    }
}

/// The belief text hedges
pub struct HedgingLanguage;

impl Factor for HedgingLanguage {
    fn name(&self) -> &'static str {
        "hedging_language"
    }

    fn id(&self) -> u16 {
        3
    }

    fn evaluate(&self, ctx: &FactorContext<'_>) -> Result<FactorScore, FactorError> {
        let hedges = matched_words(&ctx.proposition.text, HEDGE_WORDS);
        if hedges.is_empty() {
            return Ok(FactorScore::not_applicable("no hedging language in text"));
        }

        let score = (hedges.len() as f64 * 0.3).min(0.9);
        Ok(FactorScore::new(
            score,
            format!("text hedges with: {}", hedges.join(", ")),
        ))
    }
}

/// A prior, more confident version of the belief disagrees with this one
pub struct SiblingConflict;

impl SiblingConflict {
    /// Do the two texts share content but disagree in sense?
    fn disagrees(current: &str, prior: &str) -> bool {
        let stop = |t: &String| STOPWORDS.iter().any(|s| s == t);
        let cur: Vec<String> = tokens(current).into_iter().filter(|t| !stop(t)).collect();
        let pri: Vec<String> = tokens(prior).into_iter().filter(|t| !stop(t)).collect();

        let shared = cur.iter().filter(|t| pri.contains(t)).count();
        if shared < 2 {
            return false;
        }

        let cur_negated = !matched_words(current, NEGATION_WORDS).is_empty();
        let pri_negated = !matched_words(prior, NEGATION_WORDS).is_empty();
        cur_negated != pri_negated
    }
}

impl Factor for SiblingConflict {
    fn name(&self) -> &'static str {
        "sibling_conflict"
    }

    fn id(&self) -> u16 {
        4
    }

    fn evaluate(&self, ctx: &FactorContext<'_>) -> Result<FactorScore, FactorError> {
        let current = ctx.proposition;
        let priors: Vec<_> = ctx
            .history
            .iter()
            .filter(|p| p.version < current.version)
            .collect();

        if priors.is_empty() {
            return Ok(FactorScore::not_applicable(
                "no prior versions in revision group",
            ));
        }

        let Some(cur_conf) = current.confidence else {
            return Ok(FactorScore::not_applicable(
                "current confidence unavailable, sibling comparison skipped",
            ));
        };

        let mut best: Option<(u32, f64)> = None;
        for prior in priors {
            let Some(prior_conf) = prior.confidence else {
                continue;
            };
            if prior_conf < cur_conf + 2.0 {
                continue;
            }

            let score = if Self::disagrees(&current.text, &prior.text) {
                0.85
            } else {
                0.7
            };

            match best {
                Some((_, s)) if s >= score => {}
                _ => best = Some((prior.version, score)),
            }
        }

        match best {
            Some((version, score)) => Ok(FactorScore::new(
                score,
                format!(
                    "prior version {} was markedly more confident than the current {:.1}/10",
                    version, cur_conf
                ),
            )),
            None => Ok(FactorScore::not_applicable(
                "no more-confident prior version conflicts",
            )),
        }
    }
}

/// Absolute wording on thin evidence
pub struct Overgeneralization;

impl Factor for Overgeneralization {
    fn name(&self) -> &'static str {
        "overgeneralization"
    }

    fn id(&self) -> u16 {
        5
    }

    fn evaluate(&self, ctx: &FactorContext<'_>) -> Result<FactorScore, FactorError> {
        let absolutes = matched_words(&ctx.proposition.text, ABSOLUTE_WORDS);
        if absolutes.is_empty() {
            return Ok(FactorScore::not_applicable("no absolute wording in text"));
        }

        let count = ctx.proposition.observation_count;
        let score = if count < 5 { 0.75 } else { 0.4 };

        Ok(FactorScore::new(
            score,
            format!(
                "absolute wording ({}) backed by only {} observation(s)",
                absolutes.join(", "),
                count
            ),
        ))
    }
}

/// The stored reasoning does not explain the belief
pub struct Opacity;

impl Factor for Opacity {
    fn name(&self) -> &'static str {
        "opacity"
    }

    fn id(&self) -> u16 {
        6
    }

    fn evaluate(&self, ctx: &FactorContext<'_>) -> Result<FactorScore, FactorError> {
        match &ctx.proposition.reasoning {
            None => Ok(FactorScore::new(0.8, "belief has no recorded reasoning")),
            Some(r) if r.trim().len() < 20 => Ok(FactorScore::new(
                0.5,
                format!("recorded reasoning is only {} characters", r.trim().len()),
            )),
            Some(_) => Ok(FactorScore::not_applicable("reasoning present")),
        }
    }
}
