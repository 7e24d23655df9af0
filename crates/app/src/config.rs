//! Engine tuning knobs.

/// Runtime configuration for the execution pipeline.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum total attempts for a retryable action (initial attempt
    /// included). Non-retryable actions always get exactly one attempt.
    pub max_retries: u32,
    /// Base of the exponential retry backoff, in milliseconds.
    pub backoff_base_ms: u64,
    /// Maximum number of action chains running concurrently; further
    /// chains wait for a slot without blocking dispatch.
    pub max_queue_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_base_ms: 500,
            max_queue_depth: 64,
        }
    }
}
