//! Core analysis orchestration

use std::collections::HashMap;
use std::fmt::Display;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use clarion_domain::traits::{AnalysisStore, PropositionStore};
use clarion_domain::{
    AnalysisReport, ClarificationAnalysis, ClarifyingQuestion, EvidenceRef, GenerationMethod,
    Observation, Proposition, PropositionId, QuestionId, RevisionGroupId,
};
use clarion_factors::{decision_summary, Aggregator, FactorContext, FactorRegistry, ScoredFactor};
use clarion_gatekeeper::Gatekeeper;
use clarion_generator::{
    DraftStrategy, QuestionContext, QuestionDraft, QuestionGenerator, TemplateStrategy,
};
use tracing::{debug, info, warn};

use crate::{AnalysisState, EngineConfig, EngineError, RunStats};

/// Result of one analysis run
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    /// The persisted analysis record
    pub analysis: ClarificationAnalysis,

    /// The persisted questions, in generation order
    pub questions: Vec<ClarifyingQuestion>,

    /// Final state of the run
    pub state: AnalysisState,

    /// Counters collected during the run
    pub stats: RunStats,
}

/// Query shape for a proposition's stored questions
#[derive(Debug, Clone)]
pub struct QuestionList {
    /// Questions for the current version, in generation order
    pub questions: Vec<ClarifyingQuestion>,

    /// Total number of questions
    pub total: usize,
}

/// Orchestrates scoring, drafting, validation, and persistence
///
/// Holds the store behind a mutex; factor evaluation and aggregation are
/// pure, so the store is only locked for short reads and the final write.
pub struct AnalysisEngine<S> {
    store: Arc<Mutex<S>>,
    registry: FactorRegistry,
    aggregator: Aggregator,
    generator: QuestionGenerator,
    template_retry: TemplateStrategy,
    gatekeeper: Gatekeeper,
    config: EngineConfig,
    group_locks: Mutex<HashMap<RevisionGroupId, Arc<tokio::sync::Mutex<()>>>>,
}

impl<S> AnalysisEngine<S>
where
    S: PropositionStore + AnalysisStore,
    <S as PropositionStore>::Error: Display,
    <S as AnalysisStore>::Error: Display,
{
    /// Create a new engine
    pub fn new(
        store: S,
        registry: FactorRegistry,
        aggregator: Aggregator,
        generator: QuestionGenerator,
        gatekeeper: Gatekeeper,
        config: EngineConfig,
    ) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            registry,
            aggregator,
            generator,
            template_retry: TemplateStrategy::new(),
            gatekeeper,
            config,
            group_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Shared handle to the underlying store
    ///
    /// Callers may use this to seed propositions and observations; the
    /// engine itself never mutates them.
    pub fn store(&self) -> Arc<Mutex<S>> {
        Arc::clone(&self.store)
    }

    /// Run the full pipeline for one proposition
    ///
    /// The analysis applies to the current version of the proposition's
    /// revision group, whichever version the id names. Runs for the same
    /// group serialize; re-running for the same version replaces the prior
    /// analysis and questions.
    pub async fn analyze(&self, id: PropositionId) -> Result<AnalysisOutcome, EngineError> {
        let proposition = self
            .load_proposition(id)?
            .ok_or(EngineError::PropositionNotFound(id))?;

        let group_lock = self.group_lock(proposition.revision_group);
        let _guard = group_lock.lock().await;

        debug!(
            proposition = %proposition.id,
            group = %proposition.revision_group,
            version = proposition.version,
            state = %AnalysisState::Pending,
            "starting analysis"
        );

        let (observations, history) = self.load_context(&proposition)?;
        let mut stats = RunStats::new();

        // Scoring and decision
        debug!(proposition = %proposition.id, state = %AnalysisState::Scoring, "evaluating factors");
        let ctx = FactorContext {
            proposition: &proposition,
            evidence: &observations,
            history: &history,
        };
        let evaluation = self.registry.evaluate_all(&ctx);
        let outcome = self.aggregator.aggregate(&evaluation);
        stats.factors_triggered = outcome.triggered_factors.len();

        debug!(
            proposition = %proposition.id,
            state = %AnalysisState::Decided,
            score = outcome.clarification_score,
            needs_clarification = outcome.needs_clarification,
            "decision made"
        );

        let now = unix_now();
        let analysis = ClarificationAnalysis {
            proposition_id: proposition.id,
            revision_group: proposition.revision_group,
            version: proposition.version,
            needs_clarification: outcome.needs_clarification,
            clarification_score: outcome.clarification_score,
            triggered_factors: outcome.triggered_factors.clone(),
            reasoning: decision_summary(&evaluation, &outcome),
            factor_scores: evaluation
                .scores
                .iter()
                .map(|(name, scored)| (name.clone(), scored.score))
                .collect(),
            created_at: now,
        };

        // Drafting and validation, one question per triggered factor
        let mut questions = Vec::new();
        if analysis.needs_clarification {
            debug!(proposition = %proposition.id, state = %AnalysisState::Generating, "drafting questions");
            for name in &outcome.triggered_factors {
                if questions.len() >= self.config.max_questions {
                    warn!(
                        proposition = %proposition.id,
                        limit = self.config.max_questions,
                        "question limit reached, skipping remaining factors"
                    );
                    break;
                }
                let Some(scored) = evaluation.scores.get(name) else {
                    continue;
                };
                match self
                    .draft_question(&proposition, name, scored, &observations, now, &mut stats)
                    .await
                {
                    Some(question) => questions.push(question),
                    None => continue,
                }
            }
        }

        // Atomic persistence; prior analysis for this version is replaced
        {
            let mut store = self
                .store
                .lock()
                .map_err(|e| EngineError::Store(format!("Store lock error: {}", e)))?;
            store
                .replace_analysis(&analysis, &questions)
                .map_err(|e| EngineError::Store(e.to_string()))?;
        }

        info!(
            proposition = %proposition.id,
            state = %AnalysisState::Persisted,
            needs_clarification = analysis.needs_clarification,
            questions = questions.len(),
            stats = %stats.summary(),
            "analysis persisted"
        );

        Ok(AnalysisOutcome {
            analysis,
            questions,
            state: AnalysisState::Persisted,
            stats,
        })
    }

    /// Trigger hook for newly created or revised propositions
    pub async fn on_proposition_saved(
        &self,
        proposition: &Proposition,
    ) -> Result<AnalysisOutcome, EngineError> {
        debug!(
            proposition = %proposition.id,
            version = proposition.version,
            "proposition saved, triggering analysis"
        );
        self.analyze(proposition.id).await
    }

    /// The analysis report for a proposition, resolved to its current version
    ///
    /// Returns an absent report when no analysis exists.
    pub fn analysis_report(&self, id: PropositionId) -> Result<AnalysisReport, EngineError> {
        let store = self
            .store
            .lock()
            .map_err(|e| EngineError::Store(format!("Store lock error: {}", e)))?;
        let analysis = store
            .analysis_for(id)
            .map_err(|e| EngineError::Store(e.to_string()))?;
        Ok(analysis.map(AnalysisReport::from).unwrap_or_else(AnalysisReport::absent))
    }

    /// Stored questions for a proposition's current version
    pub fn questions(&self, id: PropositionId) -> Result<QuestionList, EngineError> {
        let store = self
            .store
            .lock()
            .map_err(|e| EngineError::Store(format!("Store lock error: {}", e)))?;
        let questions = store
            .questions_for(id)
            .map_err(|e| EngineError::Store(e.to_string()))?;
        let total = questions.len();
        Ok(QuestionList { questions, total })
    }

    fn load_proposition(&self, id: PropositionId) -> Result<Option<Proposition>, EngineError> {
        let store = self
            .store
            .lock()
            .map_err(|e| EngineError::Store(format!("Store lock error: {}", e)))?;
        let named = store
            .get_proposition(id)
            .map_err(|e| EngineError::Store(e.to_string()))?;
        let Some(named) = named else {
            return Ok(None);
        };
        // Analysis always targets the group's current version
        store
            .current_proposition(named.revision_group)
            .map_err(|e| EngineError::Store(e.to_string()))
    }

    fn load_context(
        &self,
        proposition: &Proposition,
    ) -> Result<(Vec<Observation>, Vec<Proposition>), EngineError> {
        let store = self
            .store
            .lock()
            .map_err(|e| EngineError::Store(format!("Store lock error: {}", e)))?;
        let observations = store
            .observations_for(proposition.id)
            .map_err(|e| EngineError::Store(e.to_string()))?;
        let history = store
            .revision_history(proposition.revision_group)
            .map_err(|e| EngineError::Store(e.to_string()))?;
        Ok((observations, history))
    }

    async fn draft_question(
        &self,
        proposition: &Proposition,
        factor_name: &str,
        scored: &ScoredFactor,
        observations: &[Observation],
        now: u64,
        stats: &mut RunStats,
    ) -> Option<ClarifyingQuestion> {
        let gen_config = self.generator.config();
        let evidence: Vec<EvidenceRef> = observations
            .iter()
            .take(gen_config.max_evidence)
            .map(|obs| EvidenceRef::from_observation(obs, gen_config.snippet_max_len))
            .collect();

        let ctx = QuestionContext {
            proposition_id: proposition.id,
            proposition_text: proposition.text.clone(),
            proposition_reasoning: proposition.reasoning.clone(),
            factor_name: factor_name.to_string(),
            factor_id: scored.factor_id,
            factor_score: scored.score,
            factor_rationale: scored.rationale.clone(),
            requires_evidence: scored.requires_evidence,
            evidence,
        };

        let draft = match self.generator.draft(&ctx).await {
            Ok(draft) => draft,
            Err(e) => {
                warn!(factor = %factor_name, error = %e, "question drafting failed");
                stats.generation_failed += 1;
                return None;
            }
        };

        debug!(factor = %factor_name, state = %AnalysisState::Validating, "validating draft");
        let draft = match self.validate_draft(draft, &ctx) {
            Some(draft) => draft,
            None => {
                stats.validation_rejected += 1;
                return None;
            }
        };

        stats.questions_generated += 1;
        Some(ClarifyingQuestion {
            id: QuestionId::new(),
            proposition_id: proposition.id,
            factor_name: factor_name.to_string(),
            factor_id: scored.factor_id,
            factor_score: scored.score,
            question: draft.question,
            reasoning: draft.reasoning,
            evidence: draft.evidence,
            generation_method: draft.method,
            validation_passed: true,
            created_at: now,
        })
    }

    /// Validate a draft, retrying a rejected generative draft with the
    /// template strategy when configured
    fn validate_draft(&self, draft: QuestionDraft, ctx: &QuestionContext) -> Option<QuestionDraft> {
        let result = self.gatekeeper.validate(&draft, ctx.requires_evidence);
        if result.is_accepted() {
            return Some(draft);
        }

        warn!(
            factor = %ctx.factor_name,
            method = %draft.method,
            reasons = ?result.reasons,
            "draft rejected by validation"
        );

        if !self.config.retry_rejected_with_template || draft.method != GenerationMethod::Generative
        {
            return None;
        }

        let retry = match self.template_retry.draft(ctx) {
            Ok(retry) => retry,
            Err(e) => {
                warn!(factor = %ctx.factor_name, error = %e, "template retry failed");
                return None;
            }
        };

        let retry_result = self.gatekeeper.validate(&retry, ctx.requires_evidence);
        if retry_result.is_accepted() {
            debug!(factor = %ctx.factor_name, "template retry accepted");
            Some(retry)
        } else {
            warn!(
                factor = %ctx.factor_name,
                reasons = ?retry_result.reasons,
                "template retry rejected, dropping question"
            );
            None
        }
    }

    fn group_lock(&self, group: RevisionGroupId) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = match self.group_locks.lock() {
            Ok(locks) => locks,
            // A poisoned map only means another analysis panicked; the
            // entries themselves are still usable.
            Err(poisoned) => poisoned.into_inner(),
        };
        Arc::clone(locks.entry(group).or_default())
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
