//! Clarion Question Generator
//!
//! Drafts candidate clarifying questions for triggered factors. Generation
//! strategies are pluggable behind the `DraftStrategy` capability trait:
//!
//! - `TemplateStrategy`: deterministic per-factor templates, no I/O, the
//!   always-available fallback
//! - `GenerativeStrategy`: calls an LLM provider with structured context and
//!   parses the completion
//!
//! `QuestionGenerator` runs an explicit fallback chain: each strategy is
//! attempted under a bounded timeout, and the first successful draft wins.
//! A strategy can never cite evidence that was not in its input.

#![warn(missing_docs)]

pub mod config;
pub mod context;
pub mod error;
pub mod generative;
pub mod parser;
pub mod prompt;
pub mod strategy;
pub mod template;

pub use config::GeneratorConfig;
pub use context::{QuestionContext, QuestionDraft};
pub use error::GenerationError;
pub use generative::GenerativeStrategy;
pub use strategy::{DraftStrategy, QuestionGenerator};
pub use template::TemplateStrategy;
