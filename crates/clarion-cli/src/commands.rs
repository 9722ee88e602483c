//! Command implementations.

use anyhow::{anyhow, Context};
use clarion_domain::{
    ClarifyingQuestion, Observation, ObservationId, Proposition, PropositionId, RevisionGroupId,
};
use clarion_engine::AnalysisEngine;
use clarion_store::SqliteStore;
use serde::Deserialize;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

/// One proposition in a seed file
#[derive(Debug, Deserialize)]
pub struct SeedProposition {
    /// Belief text
    pub text: String,

    /// Optional recorded reasoning
    #[serde(default)]
    pub reasoning: Option<String>,

    /// Optional confidence on the 1.0-10.0 scale
    #[serde(default)]
    pub confidence: Option<f64>,

    /// Supporting observation contents
    #[serde(default)]
    pub observations: Vec<String>,
}

/// Seed file shape
#[derive(Debug, Deserialize)]
pub struct SeedFile {
    /// Propositions to create
    pub propositions: Vec<SeedProposition>,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn parse_id(s: &str) -> anyhow::Result<PropositionId> {
    PropositionId::from_string(s).map_err(|e| anyhow!("invalid proposition id '{}': {}", s, e))
}

/// Load propositions and observations from a JSON file
pub fn execute_seed(engine: &AnalysisEngine<SqliteStore>, file: &str) -> anyhow::Result<()> {
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read seed file '{}'", file))?;
    let seed: SeedFile = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse seed file '{}'", file))?;

    let store = engine.store();
    let mut store = store
        .lock()
        .map_err(|e| anyhow!("store lock error: {}", e))?;

    let now = unix_now();
    let mut created = Vec::new();
    for entry in seed.propositions {
        let proposition = Proposition::new(
            PropositionId::new(),
            entry.text,
            entry.reasoning,
            entry.confidence,
            RevisionGroupId::new(),
            0,
            now,
        );
        store.save_proposition(&proposition)?;
        for content in entry.observations {
            let observation = Observation {
                id: ObservationId::new(),
                content,
                created_at: now,
            };
            store.add_observation(&observation)?;
            store.link_observation(proposition.id, observation.id)?;
        }
        info!(proposition = %proposition.id, "seeded proposition");
        created.push(proposition.id.to_string());
    }

    println!("{}", serde_json::json!({ "created": created }));
    Ok(())
}

/// Print the analysis report for a proposition
pub fn execute_show(engine: &AnalysisEngine<SqliteStore>, id: &str) -> anyhow::Result<()> {
    let id = parse_id(id)?;
    let report = engine.analysis_report(id)?;

    let json = serde_json::json!({
        "has_analysis": report.has_analysis,
        "needs_clarification": report.needs_clarification,
        "clarification_score": report.clarification_score,
        "triggered_factors": report.triggered_factors,
        "reasoning": report.reasoning,
        "factor_scores": report.factor_scores,
        "created_at": report.created_at,
    });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

/// List stored clarifying questions for a proposition
pub fn execute_questions(engine: &AnalysisEngine<SqliteStore>, id: &str) -> anyhow::Result<()> {
    let id = parse_id(id)?;
    let list = engine.questions(id)?;

    let json = serde_json::json!({
        "total": list.total,
        "questions": list.questions.iter().map(question_json).collect::<Vec<_>>(),
    });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

/// Run the analysis pipeline for one proposition
pub async fn execute_analyze(
    engine: &AnalysisEngine<SqliteStore>,
    id: &str,
) -> anyhow::Result<()> {
    let id = parse_id(id)?;
    let outcome = engine.analyze(id).await?;

    let json = serde_json::json!({
        "state": outcome.state.to_string(),
        "needs_clarification": outcome.analysis.needs_clarification,
        "clarification_score": outcome.analysis.clarification_score,
        "triggered_factors": outcome.analysis.triggered_factors,
        "questions": outcome.questions.iter().map(question_json).collect::<Vec<_>>(),
        "stats": outcome.stats.summary(),
    });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

/// Analyze every current proposition that has no analysis yet
pub async fn execute_backfill(engine: &AnalysisEngine<SqliteStore>) -> anyhow::Result<()> {
    let pending = {
        let store = engine.store();
        let store = store
            .lock()
            .map_err(|e| anyhow!("store lock error: {}", e))?;
        store.unanalyzed_propositions()?
    };

    info!(count = pending.len(), "starting backfill");
    let mut analyzed = 0usize;
    let mut questions = 0usize;
    for proposition in &pending {
        let outcome = engine.analyze(proposition.id).await?;
        analyzed += 1;
        questions += outcome.questions.len();
    }

    println!(
        "{}",
        serde_json::json!({ "analyzed": analyzed, "questions": questions })
    );
    Ok(())
}

fn question_json(q: &ClarifyingQuestion) -> serde_json::Value {
    serde_json::json!({
        "id": q.id.to_string(),
        "factor": q.factor_name,
        "factor_score": q.factor_score,
        "question": q.question,
        "reasoning": q.reasoning,
        "evidence": q.evidence.iter().map(|e| {
            serde_json::json!({
                "observation_id": e.observation_id.to_string(),
                "snippet": e.snippet,
            })
        }).collect::<Vec<_>>(),
        "method": q.generation_method.as_str(),
    })
}
