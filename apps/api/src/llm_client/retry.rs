//! Exponential-backoff retry for rate-limited remote calls.
//!
//! Only errors reporting `is_transient() == true` are retried. Anything else is
//! handed back to the caller on the attempt that produced it, without sleeping.
//! Backoff waits on `tokio::time::sleep`, so other requests keep running, and can
//! be cut short through an optional `CancellationToken`.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Classifies an error as worth retrying.
pub trait Transient {
    fn is_transient(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Never below 1.
    pub max_attempts: u32,
    /// Wait before the second attempt; doubles after every retry.
    pub initial_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
        }
    }
}

impl Default for RetryPolicy {
    /// 3 attempts, 2s then 4s between them.
    fn default() -> Self {
        Self::new(3, Duration::from_secs(2))
    }
}

#[derive(Debug, Error)]
pub enum RetryError<E> {
    #[error("Exceeded {attempts} attempts due to rate limiting")]
    Exhausted { attempts: u32 },

    #[error("Cancelled during backoff after {attempts} attempts")]
    Cancelled { attempts: u32 },

    #[error("{0}")]
    Fatal(E),
}

/// Per-call bookkeeping. Dropped when the call succeeds or gives up.
struct RetryState {
    attempt: u32,
    current_delay: Duration,
    max_attempts: u32,
}

impl RetryState {
    fn new(policy: RetryPolicy) -> Self {
        Self {
            attempt: 0,
            current_delay: policy.initial_delay,
            max_attempts: policy.max_attempts.max(1),
        }
    }

    fn exhausted(&self) -> bool {
        self.attempt >= self.max_attempts
    }
}

/// Runs `operation` until it succeeds, fails non-transiently, or runs out of attempts.
///
/// No sleep follows the final attempt. If `cancel` fires while waiting between
/// attempts the call returns `RetryError::Cancelled` immediately.
pub async fn execute_with_retry<T, E, F, Fut>(
    policy: RetryPolicy,
    cancel: Option<&CancellationToken>,
    mut operation: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Transient + Display,
{
    let mut state = RetryState::new(policy);

    loop {
        state.attempt += 1;

        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if !err.is_transient() => return Err(RetryError::Fatal(err)),
            Err(err) => err,
        };

        if state.exhausted() {
            warn!("Giving up after {} attempts: {err}", state.attempt);
            return Err(RetryError::Exhausted {
                attempts: state.attempt,
            });
        }

        warn!(
            "Attempt {} of {} failed ({err}), retrying in {}ms...",
            state.attempt,
            state.max_attempts,
            state.current_delay.as_millis()
        );

        match cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        return Err(RetryError::Cancelled { attempts: state.attempt });
                    }
                    _ = tokio::time::sleep(state.current_delay) => {}
                }
            }
            None => tokio::time::sleep(state.current_delay).await,
        }

        state.current_delay = state.current_delay.saturating_mul(2);
    }
}
