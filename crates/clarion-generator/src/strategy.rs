//! Drafting strategies and the fallback chain

use std::sync::Arc;
use std::time::Duration;

use clarion_domain::GenerationMethod;
use tracing::{debug, warn};

use crate::config::GeneratorConfig;
use crate::context::{QuestionContext, QuestionDraft};
use crate::error::GenerationError;

/// A way of drafting a clarifying question from factor context
///
/// Implementations are synchronous; the generator runs them on a blocking
/// thread under a timeout, so a strategy is free to do network I/O.
pub trait DraftStrategy: Send + Sync {
    /// Which generation method this strategy produces
    fn method(&self) -> GenerationMethod;

    /// Draft a question for the given context
    fn draft(&self, ctx: &QuestionContext) -> Result<QuestionDraft, GenerationError>;
}

/// Runs an ordered chain of drafting strategies with per-attempt timeouts
///
/// Strategies are tried in registration order; the first successful draft
/// wins. A timed-out or failed strategy is logged and the chain moves on.
/// When every strategy fails, the last error is returned.
pub struct QuestionGenerator {
    chain: Vec<Arc<dyn DraftStrategy>>,
    config: GeneratorConfig,
}

impl QuestionGenerator {
    /// Create a generator with an empty strategy chain
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            chain: Vec::new(),
            config,
        }
    }

    /// Append a strategy to the end of the fallback chain
    pub fn with_strategy(mut self, strategy: Arc<dyn DraftStrategy>) -> Self {
        self.chain.push(strategy);
        self
    }

    /// A generator that only uses the deterministic template strategy
    pub fn template_only(config: GeneratorConfig) -> Self {
        Self::new(config).with_strategy(Arc::new(crate::template::TemplateStrategy::new()))
    }

    /// The generator's configuration
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Number of strategies in the chain
    pub fn strategy_count(&self) -> usize {
        self.chain.len()
    }

    /// Draft a question, walking the fallback chain
    pub async fn draft(&self, ctx: &QuestionContext) -> Result<QuestionDraft, GenerationError> {
        if self.chain.is_empty() {
            return Err(GenerationError::Inapplicable(
                "no drafting strategies configured".to_string(),
            ));
        }

        let timeout = self.config.generation_timeout();
        let mut last_error = GenerationError::EmptyCompletion;

        for strategy in &self.chain {
            let method = strategy.method();
            match Self::attempt(Arc::clone(strategy), ctx.clone(), timeout).await {
                Ok(draft) => {
                    debug!(
                        factor = %ctx.factor_name,
                        method = %method,
                        "drafted clarifying question"
                    );
                    return Ok(draft);
                }
                Err(e) => {
                    warn!(
                        factor = %ctx.factor_name,
                        method = %method,
                        error = %e,
                        "drafting strategy failed, trying next"
                    );
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }

    async fn attempt(
        strategy: Arc<dyn DraftStrategy>,
        ctx: QuestionContext,
        timeout: Duration,
    ) -> Result<QuestionDraft, GenerationError> {
        let task = tokio::task::spawn_blocking(move || strategy.draft(&ctx));

        match tokio::time::timeout(timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => Err(GenerationError::Llm(format!(
                "drafting task failed: {}",
                join_err
            ))),
            Err(_) => Err(GenerationError::Timeout),
        }
    }
}
