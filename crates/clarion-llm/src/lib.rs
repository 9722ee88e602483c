//! Clarion LLM Provider Layer
//!
//! Pluggable generation-service implementations behind the `LlmProvider`
//! trait from `clarion-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: deterministic mock for testing, with failure injection
//! - `OllamaProvider`: local Ollama API integration
//!
//! # Examples
//!
//! ```
//! use clarion_llm::MockProvider;
//! use clarion_domain::traits::LlmProvider;
//!
//! let provider = MockProvider::new("Hello from the model!");
//! let result = provider.generate("any prompt").unwrap();
//! assert_eq!(result, "Hello from the model!");
//! ```

#![warn(missing_docs)]

pub mod ollama;

use clarion_domain::traits::LlmProvider as LlmProviderTrait;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use ollama::OllamaProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the model
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not available on the endpoint
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Mock LLM provider for deterministic testing
///
/// Responses are keyed by a substring of the prompt, since real prompts are
/// long assembled strings that are impractical to match exactly. A provider
/// can also be put into an always-failing mode to exercise fallback paths.
///
/// # Examples
///
/// ```
/// use clarion_llm::MockProvider;
/// use clarion_domain::traits::LlmProvider;
///
/// let mut provider = MockProvider::new("default");
/// provider.respond_when("dark mode", "{\"question\": \"Do you prefer dark mode everywhere?\"}");
///
/// assert!(provider.generate("... the belief is about dark mode ...").unwrap().contains("dark mode"));
/// assert_eq!(provider.generate("unrelated prompt").unwrap(), "default");
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    rules: Arc<Mutex<Vec<(String, String)>>>,
    call_count: Arc<Mutex<usize>>,
    fail_always: bool,
}

impl MockProvider {
    /// Create a provider returning a fixed response for every prompt
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            rules: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            fail_always: false,
        }
    }

    /// Create a provider that fails every call, for fallback testing
    pub fn failing() -> Self {
        Self {
            default_response: String::new(),
            rules: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            fail_always: true,
        }
    }

    /// Respond with `response` whenever the prompt contains `needle`
    ///
    /// Rules are checked in registration order; the first match wins.
    pub fn respond_when(&mut self, needle: impl Into<String>, response: impl Into<String>) {
        self.rules
            .lock()
            .unwrap()
            .push((needle.into(), response.into()));
    }

    /// Number of times `generate` was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Reset the call counter
    pub fn reset_call_count(&self) {
        *self.call_count.lock().unwrap() = 0;
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        *self.call_count.lock().unwrap() += 1;

        if self.fail_always {
            return Err(LlmError::Communication(
                "mock provider configured to fail".to_string(),
            ));
        }

        let rules = self.rules.lock().unwrap();
        for (needle, response) in rules.iter() {
            if prompt.contains(needle) {
                return Ok(response.clone());
            }
        }

        Ok(self.default_response.clone())
    }
}
