//! Integration tests for clarion-engine
//!
//! These tests run the whole pipeline against a real in-memory SQLite store,
//! with deterministic LLM behavior via MockProvider.

use std::sync::Arc;

use clarion_domain::traits::{AnalysisStore, PropositionStore};
use clarion_domain::{
    ClarificationAnalysis, ClarifyingQuestion, GenerationMethod, Observation, ObservationId,
    Proposition, PropositionId, RevisionGroupId,
};
use clarion_engine::{AnalysisEngine, AnalysisState, EngineConfig};
use clarion_factors::library::{ConfidenceDecay, LowObservationCount};
use clarion_factors::{Aggregator, FactorRegistry};
use clarion_gatekeeper::Gatekeeper;
use clarion_generator::{GeneratorConfig, GenerativeStrategy, QuestionGenerator, TemplateStrategy};
use clarion_llm::MockProvider;
use clarion_store::SqliteStore;

fn proposition(text: &str, reasoning: Option<&str>, confidence: Option<f64>) -> Proposition {
    Proposition::new(
        PropositionId::new(),
        text.to_string(),
        reasoning.map(str::to_string),
        confidence,
        RevisionGroupId::new(),
        0,
        1000,
    )
}

fn observation(content: &str) -> Observation {
    Observation {
        id: ObservationId::new(),
        content: content.to_string(),
        created_at: 900,
    }
}

fn single_factor_registry() -> FactorRegistry {
    let mut registry = FactorRegistry::new();
    registry.register(Box::new(LowObservationCount));
    registry
}

fn engine_with(
    registry: FactorRegistry,
    generator: QuestionGenerator,
) -> AnalysisEngine<SqliteStore> {
    AnalysisEngine::new(
        SqliteStore::new(":memory:").unwrap(),
        registry,
        Aggregator::default_config(),
        generator,
        Gatekeeper::default_config(),
        EngineConfig::default(),
    )
}

/// Seed a proposition with linked observations through the engine's store
fn seed(
    engine: &AnalysisEngine<SqliteStore>,
    proposition: &Proposition,
    observations: &[Observation],
) {
    let store = engine.store();
    let mut store = store.lock().unwrap();
    store.save_proposition(proposition).unwrap();
    for obs in observations {
        store.add_observation(obs).unwrap();
        store.link_observation(proposition.id, obs.id).unwrap();
    }
}

#[tokio::test]
async fn test_dark_mode_proposition_yields_one_question() {
    let engine = engine_with(
        single_factor_registry(),
        QuestionGenerator::template_only(GeneratorConfig::default()),
    );

    let p = proposition(
        "User prefers dark mode",
        Some("inferred from a single editor settings change"),
        Some(6.0),
    );
    let obs = observation("switched editor theme from solarized-light to dracula");
    seed(&engine, &p, &[obs.clone()]);

    let outcome = engine.analyze(p.id).await.unwrap();

    assert_eq!(outcome.state, AnalysisState::Persisted);
    assert!(outcome.analysis.needs_clarification);
    assert!((outcome.analysis.clarification_score - 0.9).abs() < 1e-9);
    assert_eq!(
        outcome.analysis.triggered_factors,
        vec!["low_observation_count".to_string()]
    );

    assert_eq!(outcome.questions.len(), 1);
    let question = &outcome.questions[0];
    assert_eq!(question.factor_name, "low_observation_count");
    assert!(question.validation_passed);
    assert_eq!(question.evidence.len(), 1);
    assert_eq!(question.evidence[0].observation_id, obs.id);
    // The reasoning cites the single observation backing the belief
    assert!(question.reasoning.contains("switched editor theme"));
    assert_eq!(outcome.stats.questions_generated, 1);
}

#[tokio::test]
async fn test_high_confidence_proposition_is_neutral() {
    let engine = engine_with(
        FactorRegistry::with_defaults(),
        QuestionGenerator::template_only(GeneratorConfig::default()),
    );

    let mut p = proposition(
        "User runs the test suite before pushing",
        Some("observed consistently across twenty review sessions"),
        Some(9.0),
    );
    p.observation_count = 20;
    let store = engine.store();
    store.lock().unwrap().save_proposition(&p).unwrap();

    let outcome = engine.analyze(p.id).await.unwrap();

    assert!(!outcome.analysis.needs_clarification);
    assert!(outcome.analysis.clarification_score < 0.5);
    assert!(outcome.analysis.triggered_factors.is_empty());
    assert!(outcome.questions.is_empty());
    assert_eq!(outcome.stats.questions_generated, 0);
}

#[tokio::test]
async fn test_empty_registry_persists_neutral_record() {
    let engine = engine_with(
        FactorRegistry::new(),
        QuestionGenerator::template_only(GeneratorConfig::default()),
    );

    let p = proposition("User prefers dark mode", None, None);
    seed(&engine, &p, &[]);

    let outcome = engine.analyze(p.id).await.unwrap();

    assert_eq!(outcome.analysis.clarification_score, 0.0);
    assert!(!outcome.analysis.needs_clarification);
    assert!(outcome.analysis.triggered_factors.is_empty());

    // The neutral record is still persisted and queryable
    let report = engine.analysis_report(p.id).unwrap();
    assert!(report.has_analysis);
    assert_eq!(report.needs_clarification, Some(false));
}

#[tokio::test]
async fn test_reanalysis_replaces_instead_of_appending() {
    let engine = engine_with(
        single_factor_registry(),
        QuestionGenerator::template_only(GeneratorConfig::default()),
    );

    let p = proposition("User prefers dark mode", None, Some(6.0));
    let obs = observation("switched editor theme to dark");
    seed(&engine, &p, &[obs]);

    let first = engine.analyze(p.id).await.unwrap();
    let second = engine.analyze(p.id).await.unwrap();

    // Same decision and same question content on every run
    assert_eq!(first.analysis.clarification_score, second.analysis.clarification_score);
    assert_eq!(first.analysis.triggered_factors, second.analysis.triggered_factors);
    assert_eq!(first.analysis.factor_scores, second.analysis.factor_scores);
    assert_eq!(first.questions.len(), 1);
    assert_eq!(second.questions.len(), 1);
    assert_eq!(first.questions[0].question, second.questions[0].question);

    let stored = engine.questions(p.id).unwrap();
    assert_eq!(stored.total, 1);
    assert_eq!(stored.questions[0].id, second.questions[0].id);
}

#[tokio::test]
async fn test_revision_isolates_old_analysis() {
    let engine = engine_with(
        single_factor_registry(),
        QuestionGenerator::template_only(GeneratorConfig::default()),
    );

    let v1 = proposition("User prefers dark mode", None, Some(6.0));
    let obs = observation("switched editor theme to dark");
    seed(&engine, &v1, &[obs.clone()]);

    engine.analyze(v1.id).await.unwrap();

    // Revise: the old analysis no longer answers for the group
    let store = engine.store();
    let v2 = store
        .lock()
        .unwrap()
        .revise_proposition(v1.id, "User prefers dark mode everywhere".to_string(), None, 2000)
        .unwrap();

    let report = engine.analysis_report(v1.id).unwrap();
    assert!(!report.has_analysis);

    // Re-link evidence to the new version and analyze it
    {
        let mut store = store.lock().unwrap();
        store.link_observation(v2.id, obs.id).unwrap();
    }
    let outcome = engine.analyze(v2.id).await.unwrap();
    assert_eq!(outcome.analysis.version, 2);

    // Queries through either version resolve to the current analysis
    let through_v1 = engine.analysis_report(v1.id).unwrap();
    assert!(through_v1.has_analysis);
    assert_eq!(through_v1.clarification_score, Some(outcome.analysis.clarification_score));
}

#[tokio::test]
async fn test_analyzing_old_version_targets_current() {
    let engine = engine_with(
        single_factor_registry(),
        QuestionGenerator::template_only(GeneratorConfig::default()),
    );

    let v1 = proposition("User prefers dark mode", None, Some(6.0));
    seed(&engine, &v1, &[observation("theme change")]);

    let store = engine.store();
    let v2 = store
        .lock()
        .unwrap()
        .revise_proposition(v1.id, "User prefers dark mode everywhere".to_string(), None, 2000)
        .unwrap();
    {
        let mut store = store.lock().unwrap();
        let obs = observation("second theme change");
        store.add_observation(&obs).unwrap();
        store.link_observation(v2.id, obs.id).unwrap();
    }

    // Naming the stale version still analyzes the current one
    let outcome = engine.analyze(v1.id).await.unwrap();
    assert_eq!(outcome.analysis.proposition_id, v2.id);
    assert_eq!(outcome.analysis.version, 2);
}

#[tokio::test]
async fn test_failing_provider_falls_back_to_template() {
    let provider = Arc::new(MockProvider::failing());
    let generator = QuestionGenerator::new(GeneratorConfig::default())
        .with_strategy(Arc::new(GenerativeStrategy::new(provider.clone())))
        .with_strategy(Arc::new(TemplateStrategy::new()));
    let engine = engine_with(single_factor_registry(), generator);

    let p = proposition("User prefers dark mode", None, Some(6.0));
    seed(&engine, &p, &[observation("switched editor theme to dark")]);

    let outcome = engine.analyze(p.id).await.unwrap();

    assert_eq!(outcome.questions.len(), 1);
    assert_eq!(outcome.questions[0].generation_method, GenerationMethod::Template);
    assert!(outcome.questions[0].validation_passed);
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn test_generative_evidence_stays_traceable() {
    // The model cites an id that was never in its input
    let reply = format!(
        r#"{{"question": "Do you prefer dark mode in all your tools?", "reasoning": "single observation", "evidence_ids": ["{}"]}}"#,
        ObservationId::new()
    );
    let provider = Arc::new(MockProvider::new(reply.as_str()));
    let generator = QuestionGenerator::new(GeneratorConfig::default())
        .with_strategy(Arc::new(GenerativeStrategy::new(provider)));
    let engine = engine_with(single_factor_registry(), generator);

    let p = proposition("User prefers dark mode", None, Some(6.0));
    let obs = observation("switched editor theme to dark");
    seed(&engine, &p, &[obs.clone()]);

    let outcome = engine.analyze(p.id).await.unwrap();

    assert_eq!(outcome.questions.len(), 1);
    let evidence = &outcome.questions[0].evidence;
    assert_eq!(evidence.len(), 1);
    assert_eq!(evidence[0].observation_id, obs.id);
}

#[tokio::test]
async fn test_rejected_generative_draft_retried_with_template() {
    // The model produces a statement, not a question
    let provider = Arc::new(MockProvider::new(
        r#"{"question": "You like dark mode.", "reasoning": "r", "evidence_ids": []}"#,
    ));
    let generator = QuestionGenerator::new(GeneratorConfig::default())
        .with_strategy(Arc::new(GenerativeStrategy::new(provider)));
    let engine = engine_with(single_factor_registry(), generator);

    let p = proposition("User prefers dark mode", None, Some(6.0));
    seed(&engine, &p, &[observation("switched editor theme to dark")]);

    let outcome = engine.analyze(p.id).await.unwrap();

    assert_eq!(outcome.questions.len(), 1);
    assert_eq!(outcome.questions[0].generation_method, GenerationMethod::Template);
    assert!(outcome.questions[0].question.ends_with('?'));
}

#[tokio::test]
async fn test_unknown_proposition_is_an_error() {
    let engine = engine_with(
        single_factor_registry(),
        QuestionGenerator::template_only(GeneratorConfig::default()),
    );

    let result = engine.analyze(PropositionId::new()).await;
    assert!(matches!(
        result,
        Err(clarion_engine::EngineError::PropositionNotFound(_))
    ));
}

#[tokio::test]
async fn test_report_absent_before_analysis() {
    let engine = engine_with(
        single_factor_registry(),
        QuestionGenerator::template_only(GeneratorConfig::default()),
    );

    let p = proposition("User prefers dark mode", None, Some(6.0));
    seed(&engine, &p, &[]);

    let report = engine.analysis_report(p.id).unwrap();
    assert!(!report.has_analysis);
    assert_eq!(report.needs_clarification, None);

    let questions = engine.questions(p.id).unwrap();
    assert_eq!(questions.total, 0);
}

#[tokio::test]
async fn test_on_proposition_saved_triggers_analysis() {
    let engine = engine_with(
        single_factor_registry(),
        QuestionGenerator::template_only(GeneratorConfig::default()),
    );

    let p = proposition("User prefers dark mode", None, Some(6.0));
    seed(&engine, &p, &[observation("switched editor theme to dark")]);

    let outcome = engine.on_proposition_saved(&p).await.unwrap();
    assert_eq!(outcome.state, AnalysisState::Persisted);
    assert!(engine.analysis_report(p.id).unwrap().has_analysis);
}

#[tokio::test]
async fn test_concurrent_analyses_of_same_group_serialize() {
    let engine = Arc::new(engine_with(
        single_factor_registry(),
        QuestionGenerator::template_only(GeneratorConfig::default()),
    ));

    let p = proposition("User prefers dark mode", None, Some(6.0));
    seed(&engine, &p, &[observation("switched editor theme to dark")]);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let engine = Arc::clone(&engine);
        let id = p.id;
        handles.push(tokio::spawn(async move { engine.analyze(id).await }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // Exactly one analysis and one question survive all the replacements
    let stored = engine.questions(p.id).unwrap();
    assert_eq!(stored.total, 1);
}

#[tokio::test]
async fn test_factor_scores_recorded_per_factor() {
    let mut registry = FactorRegistry::new();
    registry.register(Box::new(LowObservationCount));
    registry.register(Box::new(ConfidenceDecay));
    let engine = engine_with(
        registry,
        QuestionGenerator::template_only(GeneratorConfig::default()),
    );

    let p = proposition("User prefers dark mode", None, Some(4.0));
    seed(&engine, &p, &[observation("switched editor theme to dark")]);

    let outcome = engine.analyze(p.id).await.unwrap();

    assert_eq!(outcome.analysis.factor_scores.len(), 2);
    assert!((outcome.analysis.factor_scores["low_observation_count"] - 0.9).abs() < 1e-9);
    assert!((outcome.analysis.factor_scores["confidence_decay"] - 0.6).abs() < 1e-9);

    let report = engine.analysis_report(p.id).unwrap();
    assert_eq!(report.factor_scores.unwrap().len(), 2);
}

/// SQLite-backed store whose analysis writes can be switched to fail,
/// for exercising persistence-failure behavior
struct FlakyWriteStore {
    inner: SqliteStore,
    fail_writes: bool,
}

impl PropositionStore for FlakyWriteStore {
    type Error = clarion_store::StoreError;

    fn get_proposition(&self, id: PropositionId) -> Result<Option<Proposition>, Self::Error> {
        self.inner.get_proposition(id)
    }

    fn current_proposition(
        &self,
        group: RevisionGroupId,
    ) -> Result<Option<Proposition>, Self::Error> {
        self.inner.current_proposition(group)
    }

    fn revision_history(&self, group: RevisionGroupId) -> Result<Vec<Proposition>, Self::Error> {
        self.inner.revision_history(group)
    }

    fn observations_for(&self, id: PropositionId) -> Result<Vec<Observation>, Self::Error> {
        self.inner.observations_for(id)
    }
}

impl AnalysisStore for FlakyWriteStore {
    type Error = clarion_store::StoreError;

    fn replace_analysis(
        &mut self,
        analysis: &ClarificationAnalysis,
        questions: &[ClarifyingQuestion],
    ) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err(clarion_store::StoreError::InvalidData(
                "disk write failed".to_string(),
            ));
        }
        self.inner.replace_analysis(analysis, questions)
    }

    fn analysis_for(
        &self,
        id: PropositionId,
    ) -> Result<Option<ClarificationAnalysis>, Self::Error> {
        self.inner.analysis_for(id)
    }

    fn questions_for(&self, id: PropositionId) -> Result<Vec<ClarifyingQuestion>, Self::Error> {
        self.inner.questions_for(id)
    }
}

#[tokio::test]
async fn test_failed_persistence_leaves_prior_analysis_authoritative() {
    let store = FlakyWriteStore {
        inner: SqliteStore::new(":memory:").unwrap(),
        fail_writes: false,
    };
    let engine = AnalysisEngine::new(
        store,
        single_factor_registry(),
        Aggregator::default_config(),
        QuestionGenerator::template_only(GeneratorConfig::default()),
        Gatekeeper::default_config(),
        EngineConfig::default(),
    );

    let p = proposition("User prefers dark mode", None, Some(6.0));
    {
        let store = engine.store();
        let mut store = store.lock().unwrap();
        let obs = observation("switched editor theme to dark");
        store.inner.save_proposition(&p).unwrap();
        store.inner.add_observation(&obs).unwrap();
        store.inner.link_observation(p.id, obs.id).unwrap();
    }

    let first = engine.analyze(p.id).await.unwrap();
    assert!(first.analysis.needs_clarification);
    assert_eq!(first.questions.len(), 1);

    engine.store().lock().unwrap().fail_writes = true;

    let result = engine.analyze(p.id).await;
    assert!(matches!(result, Err(clarion_engine::EngineError::Store(_))));

    // The failed run must not disturb what readers see
    let report = engine.analysis_report(p.id).unwrap();
    assert!(report.has_analysis);
    assert_eq!(
        report.clarification_score,
        Some(first.analysis.clarification_score)
    );

    let questions = engine.questions(p.id).unwrap();
    assert_eq!(questions.total, 1);
    assert_eq!(questions.questions[0].question, first.questions[0].question);
}
