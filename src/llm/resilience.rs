//! Bounded retry wrapper for LLM providers.
//!
//! The wrapper holds no state across calls: every call starts with a fresh
//! retry budget. A call never starts a retry that would begin past its
//! deadline, so an abandoned call stops on its own once the caller has
//! given up.

use super::LlmProvider;
use crate::config::OracleConfig;
use crate::{Error, Result};
use std::time::{Duration, Instant};

/// Retry configuration for LLM calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LlmResilienceConfig {
    /// Maximum number of retries for timed-out calls.
    pub max_retries: u32,
    /// Backoff before the first retry in milliseconds, doubled per retry.
    pub retry_backoff_ms: u64,
    /// Overall budget for one call including retries, in milliseconds
    /// (0 to disable).
    pub deadline_ms: u64,
}

impl Default for LlmResilienceConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            retry_backoff_ms: 250,
            deadline_ms: 0,
        }
    }
}

impl LlmResilienceConfig {
    /// Loads retry settings from oracle configuration.
    ///
    /// The deadline matches the oracle request timeout.
    #[must_use]
    pub const fn from_config(config: &OracleConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            retry_backoff_ms: config.retry_backoff_ms,
            deadline_ms: config.request_timeout_ms,
        }
    }

    /// Overall call budget, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Duration> {
        if self.deadline_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.deadline_ms))
        }
    }

    /// Backoff before retry number `retry` (1-based).
    #[must_use]
    pub fn backoff_for(&self, retry: u32) -> Duration {
        let factor = 1_u64 << retry.saturating_sub(1).min(16);
        Duration::from_millis(self.retry_backoff_ms.saturating_mul(factor))
    }
}

/// LLM provider wrapper that retries timed-out calls and records metrics.
pub struct ResilientLlmProvider<P: LlmProvider> {
    inner: P,
    config: LlmResilienceConfig,
}

impl<P: LlmProvider> ResilientLlmProvider<P> {
    /// Creates a new resilient LLM provider wrapper.
    #[must_use]
    pub const fn new(inner: P, config: LlmResilienceConfig) -> Self {
        Self { inner, config }
    }

    fn execute<F>(&self, operation: &'static str, mut call: F) -> Result<String>
    where
        F: FnMut() -> Result<String>,
    {
        let provider: &'static str = self.inner.name();
        let span = tracing::info_span!(
            "oracle.request",
            provider = provider,
            operation = operation,
            status = tracing::field::Empty,
            error = tracing::field::Empty
        );
        let _enter = span.enter();

        let max_attempts = self.config.max_retries.saturating_add(1);
        let deadline = self.config.deadline();
        let call_started = Instant::now();
        let mut attempt = 0;

        loop {
            attempt += 1;
            let started = Instant::now();
            let result = call();
            let elapsed = started.elapsed();

            match result {
                Ok(value) => {
                    record_request_metrics(provider, operation, elapsed, "success");
                    span.record("status", "success");
                    return Ok(value);
                },
                Err(err) => {
                    let is_timeout = matches!(err, Error::Timeout { .. });
                    let status = if is_timeout { "timeout" } else { "error" };
                    record_request_metrics(provider, operation, elapsed, status);
                    span.record("status", status);
                    span.record("error", tracing::field::display(&err));

                    if !is_timeout || attempt >= max_attempts {
                        return Err(err);
                    }

                    let backoff = self.config.backoff_for(attempt);
                    if deadline.is_some_and(|limit| call_started.elapsed() + backoff >= limit) {
                        tracing::warn!(
                            provider,
                            operation,
                            attempt,
                            "Oracle call deadline reached, not retrying"
                        );
                        return Err(err);
                    }

                    metrics::counter!(
                        "oracle_retries_total",
                        "provider" => provider,
                        "operation" => operation
                    )
                    .increment(1);
                    tracing::warn!(
                        provider,
                        operation,
                        attempt,
                        elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                        backoff_ms = u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX),
                        "Retrying timed-out oracle call"
                    );
                    if !backoff.is_zero() {
                        std::thread::sleep(backoff);
                    }
                },
            }
        }
    }
}

impl<P: LlmProvider> LlmProvider for ResilientLlmProvider<P> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn complete(&self, prompt: &str) -> Result<String> {
        self.execute("complete", || self.inner.complete(prompt))
    }

    fn complete_with_system(&self, system: &str, user: &str) -> Result<String> {
        self.execute("complete_with_system", || {
            self.inner.complete_with_system(system, user)
        })
    }
}

fn record_request_metrics(
    provider: &'static str,
    operation: &'static str,
    elapsed: Duration,
    status: &'static str,
) {
    metrics::counter!(
        "oracle_requests_total",
        "provider" => provider,
        "operation" => operation,
        "status" => status
    )
    .increment(1);
    metrics::histogram!(
        "oracle_request_duration_ms",
        "provider" => provider,
        "operation" => operation,
        "status" => status
    )
    .record(elapsed.as_secs_f64() * 1000.0);
}
