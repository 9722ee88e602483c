//! Clarion CLI - score beliefs for ambiguity and draft clarifying questions.

mod cli;
mod commands;

use std::sync::Arc;

use clap::Parser;
use cli::{Cli, Command};
use clarion_engine::{AnalysisEngine, EngineConfig};
use clarion_factors::{Aggregator, FactorRegistry};
use clarion_gatekeeper::Gatekeeper;
use clarion_generator::{GeneratorConfig, GenerativeStrategy, QuestionGenerator, TemplateStrategy};
use clarion_llm::OllamaProvider;
use clarion_store::SqliteStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    let store = SqliteStore::new(&cli.db)?;
    let engine = AnalysisEngine::new(
        store,
        FactorRegistry::with_defaults(),
        Aggregator::default_config(),
        build_generator(&cli),
        Gatekeeper::default_config(),
        EngineConfig::default(),
    );

    match &cli.command {
        Command::Seed(args) => commands::execute_seed(&engine, &args.file)?,
        Command::Show(args) => commands::execute_show(&engine, &args.id)?,
        Command::Questions(args) => commands::execute_questions(&engine, &args.id)?,
        Command::Analyze(args) => commands::execute_analyze(&engine, &args.id).await?,
        Command::Backfill => commands::execute_backfill(&engine).await?,
    }

    Ok(())
}

/// Template-only when --no-llm, otherwise Ollama with template fallback
fn build_generator(cli: &Cli) -> QuestionGenerator {
    let config = GeneratorConfig::default();
    if cli.no_llm {
        return QuestionGenerator::template_only(config);
    }

    let provider = Arc::new(OllamaProvider::new(
        cli.endpoint.as_str(),
        cli.model.as_str(),
    ));
    QuestionGenerator::new(config)
        .with_strategy(Arc::new(GenerativeStrategy::new(provider)))
        .with_strategy(Arc::new(TemplateStrategy::new()))
}
