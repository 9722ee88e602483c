//! Per-run counters

/// Counters collected over one analysis run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Factors that crossed their trigger threshold
    pub factors_triggered: usize,

    /// Questions that were drafted and accepted
    pub questions_generated: usize,

    /// Drafts rejected by validation (after any retry)
    pub validation_rejected: usize,

    /// Drafting attempts where every strategy failed
    pub generation_failed: usize,
}

impl RunStats {
    /// Create zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Human-readable one-line summary
    pub fn summary(&self) -> String {
        format!(
            "{} triggered, {} generated, {} rejected, {} failed",
            self.factors_triggered,
            self.questions_generated,
            self.validation_rejected,
            self.generation_failed,
        )
    }
}
