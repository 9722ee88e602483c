//! Clarion Gatekeeper
//!
//! Validates drafted clarifying questions before they are persisted.
//!
//! The Gatekeeper provides:
//! - Interrogative-form and length checks
//! - Internal-identifier leak detection (UUIDs, storage field names)
//! - Evidence presence checks for factors that demand it
//! - Quality scoring
//!
//! # Examples
//!
//! ```no_run
//! use clarion_gatekeeper::{Gatekeeper, ValidationConfig};
//!
//! let config = ValidationConfig::default();
//! let gatekeeper = Gatekeeper::new(config);
//!
//! // Validate a draft before storing
//! // let result = gatekeeper.validate(&draft, requires_evidence);
//! ```

#![warn(missing_docs)]

mod config;
mod validator;

pub use config::ValidationConfig;
pub use validator::{Gatekeeper, RejectionReason, ValidationResult, ValidationStatus};
