use crate::translation::client::{TranslationProvider, TranslationRequest};
use crate::translation::delay::JitterDelay;
use crate::translation::Lang;
use crate::utils::{LangfillError, RetryConfig};
use std::time::Duration;
use tracing::{info, warn};

/// Bounded retries around a single cell translation.
///
/// Attempt `k` is given `timeout_base * k`. A jittered pause follows every
/// attempt, successful or not. Failures never escape: exhaustion is reported
/// as `None` and the caller decides what it means for the run.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    timeout_base: Duration,
    delay: JitterDelay,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, timeout_base: Duration, delay: JitterDelay) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            timeout_base,
            delay,
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        let (min, max) = config.delay_range();
        Self::new(
            config.max_attempts,
            config.timeout_base(),
            JitterDelay::new(min, max),
        )
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Time budget for a 1-based attempt number.
    pub fn attempt_timeout(&self, attempt: u32) -> Duration {
        self.timeout_base.saturating_mul(attempt.max(1))
    }

    pub async fn translate<P>(
        &self,
        provider: &P,
        text: &str,
        source: &Lang,
        target: &Lang,
    ) -> Option<String>
    where
        P: TranslationProvider + ?Sized,
    {
        for attempt in 1..=self.max_attempts {
            let timeout = self.attempt_timeout(attempt);
            let request = TranslationRequest {
                text,
                source: &source.provider_id,
                target: &target.provider_id,
                attempt,
                timeout,
            };

            let result = match tokio::time::timeout(timeout, provider.translate(&request)).await {
                Ok(Ok(translated)) if translated.trim().is_empty() => {
                    Err(LangfillError::ProviderEmptyResult { attempt })
                }
                Ok(result) => result,
                Err(_) => Err(LangfillError::ProviderTimeout {
                    attempt,
                    timeout_ms: timeout.as_millis() as u64,
                }),
            };

            let translated = match result {
                Ok(translated) => {
                    info!(lang = %target, attempt, translation = %translated, "Translated");
                    Some(translated)
                }
                Err(LangfillError::ProviderEmptyResult { .. }) => {
                    warn!(lang = %target, attempt, "Attempt {} returned no text", attempt);
                    None
                }
                Err(e) => {
                    warn!(
                        lang = %target,
                        attempt,
                        kind = e.kind(),
                        error = %e,
                        "Attempt {} failed",
                        attempt
                    );
                    None
                }
            };

            self.delay.wait().await;

            if translated.is_some() {
                return translated;
            }
        }

        None
    }
}
