//! Clarion Analysis Engine
//!
//! Orchestrates the full clarification pipeline for one proposition at a
//! time: factor scoring, aggregation into a decision, question drafting,
//! validation, and atomic persistence.
//!
//! Concurrency is scoped by revision group: two analyses of versions in the
//! same group are serialized, analyses of unrelated groups run in parallel.
//! Re-analyzing the same version replaces its prior analysis wholesale, so
//! the operation is idempotent.
//!
//! # Examples
//!
//! ```no_run
//! use clarion_engine::{AnalysisEngine, EngineConfig};
//! use clarion_factors::{Aggregator, FactorRegistry};
//! use clarion_gatekeeper::Gatekeeper;
//! use clarion_generator::{GeneratorConfig, QuestionGenerator};
//! use clarion_store::SqliteStore;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteStore::new("clarion.db")?;
//! let engine = AnalysisEngine::new(
//!     store,
//!     FactorRegistry::with_defaults(),
//!     Aggregator::default_config(),
//!     QuestionGenerator::template_only(GeneratorConfig::default()),
//!     Gatekeeper::default_config(),
//!     EngineConfig::default(),
//! );
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod engine;
mod error;
mod metrics;
mod state;

pub use config::EngineConfig;
pub use engine::{AnalysisEngine, AnalysisOutcome, QuestionList};
pub use error::EngineError;
pub use metrics::RunStats;
pub use state::AnalysisState;
