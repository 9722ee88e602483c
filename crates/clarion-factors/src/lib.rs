//! Clarion Factor Library
//!
//! Named ambiguity heuristics and their aggregation. Each factor scores one
//! independent reason a proposition might be ambiguous; the aggregator
//! combines the scores into a single clarification verdict.
//!
//! # Architecture
//!
//! - `Factor` trait: one heuristic, pure over its inputs
//! - `FactorRegistry`: explicitly constructed set of factors, passed into the
//!   engine (no global state); isolates misbehaving factors
//! - `Aggregator`: weighted combination, trigger thresholds, override rule
//!
//! # Examples
//!
//! ```
//! use clarion_factors::{Aggregator, AggregatorConfig, FactorRegistry};
//!
//! let registry = FactorRegistry::with_defaults();
//! let aggregator = Aggregator::new(AggregatorConfig::default());
//! assert!(registry.len() > 0);
//! # let _ = aggregator;
//! ```

#![warn(missing_docs)]

pub mod aggregate;
pub mod context;
pub mod error;
pub mod library;
pub mod registry;

pub use aggregate::{decision_summary, AggregateOutcome, Aggregator, AggregatorConfig};
pub use context::{FactorContext, FactorScore};
pub use error::FactorError;
pub use registry::{Factor, FactorEvaluation, FactorOmission, FactorRegistry, ScoredFactor};
