//! Optional retry policy around any `CompletionService`.
//!
//! Only generic failures are retried. Rate limits, outages, timeouts and
//! connection problems already have a specific message for the user and are
//! passed through on the first occurrence.

use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::llm_client::{CompletionError, CompletionService};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(2);

pub struct RetryingCompletion<S> {
    inner: S,
    max_attempts: u32,
    base_delay: Duration,
}

impl<S> RetryingCompletion<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }

    /// Delay before retry `attempt` (1-based): base, 2×base, 4×base, ...
    fn delay_before(&self, attempt: u32) -> Duration {
        self.base_delay * (1u32 << (attempt - 1).min(16))
    }
}

#[async_trait]
impl<S: CompletionService> CompletionService for RetryingCompletion<S> {
    async fn try_complete(&self, prompt: &str) -> Result<String, CompletionError> {
        for attempt in 0..self.max_attempts {
            if attempt > 0 {
                let delay = self.delay_before(attempt);
                warn!(
                    "Completion attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            match self.inner.try_complete(prompt).await {
                Ok(reply) => return Ok(reply),
                Err(e) if e.is_generic() => {
                    warn!("Completion attempt {} error: {e}", attempt + 1);
                }
                Err(e) => return Err(e),
            }
        }

        Err(CompletionError::Exhausted {
            attempts: self.max_attempts,
        })
    }
}
