//! Clarion Domain Layer
//!
//! Core types and trait interfaces for the clarification subsystem.
//! A *proposition* is a versioned natural-language belief about a user,
//! backed by *observations*. Clarion decides whether each proposition is
//! ambiguous enough to warrant a clarifying question and, if so, drafts one.
//!
//! ## Key Concepts
//!
//! - **Proposition**: a belief statement, versioned under a revision group
//! - **Observation**: evidentiary support, read-only to this subsystem
//! - **ClarificationAnalysis**: the per-version ambiguity verdict
//! - **ClarifyingQuestion**: a validated question attributed to one factor
//!
//! ## Architecture
//!
//! This crate holds pure domain logic and the trait seams the other layers
//! implement. Infrastructure (SQLite, LLM providers) lives in sibling crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod ids;
pub mod observation;
pub mod proposition;
pub mod question;
pub mod traits;

// Re-exports for convenience
pub use analysis::{AnalysisReport, ClarificationAnalysis};
pub use ids::{ObservationId, PropositionId, QuestionId, RevisionGroupId};
pub use observation::{EvidenceRef, Observation};
pub use proposition::Proposition;
pub use question::{ClarifyingQuestion, GenerationMethod};
