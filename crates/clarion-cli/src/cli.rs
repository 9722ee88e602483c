//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};

/// Clarion CLI - Score beliefs for ambiguity and draft clarifying questions.
#[derive(Debug, Parser)]
#[command(name = "clarion")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Database path
    #[arg(long, global = true, default_value = "clarion.db")]
    pub db: String,

    /// Skip the LLM and draft questions from templates only
    #[arg(long, global = true)]
    pub no_llm: bool,

    /// Ollama endpoint for generative drafting
    #[arg(long, global = true, default_value = clarion_llm::ollama::DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Model name for generative drafting
    #[arg(long, global = true, default_value = "llama3.2")]
    pub model: String,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load propositions and observations from a JSON file
    Seed(SeedArgs),

    /// Print the analysis report for a proposition
    Show(ShowArgs),

    /// List stored clarifying questions for a proposition
    Questions(QuestionsArgs),

    /// Run the analysis pipeline for one proposition
    Analyze(AnalyzeArgs),

    /// Analyze every current proposition without an analysis
    Backfill,
}

/// Arguments for the seed command.
#[derive(Debug, Parser)]
pub struct SeedArgs {
    /// Path to a JSON seed file
    pub file: String,
}

/// Arguments for the show command.
#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Proposition id (UUID)
    pub id: String,
}

/// Arguments for the questions command.
#[derive(Debug, Parser)]
pub struct QuestionsArgs {
    /// Proposition id (UUID)
    pub id: String,
}

/// Arguments for the analyze command.
#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    /// Proposition id (UUID)
    pub id: String,
}
