//! # Retry Policy
//!
//! Submodule initialization talks to remote hosts and fails intermittently
//! on CI runners. Rather than looping forever, initialization runs under an
//! explicit `RetryPolicy`:
//!
//! - transient errors (see [`Error::is_transient`]) are logged and retried
//!   after a delay that doubles each time, up to `max_delay`;
//! - fatal errors are returned immediately;
//! - once `max_attempts` is reached the last error is escalated as
//!   [`Error::InitializationExhausted`].
//!
//! A policy with no attempt cap retries until success.

use std::num::NonZeroU32;
use std::thread;
use std::time::Duration;

use log::warn;

use crate::error::{Error, Result};

/// How often and how patiently a failing operation is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Upper bound on attempts; `None` retries indefinitely.
    pub max_attempts: Option<NonZeroU32>,
    /// Delay after the first failure.
    pub initial_delay: Duration,
    /// Ceiling for the doubling delay.
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: Option<NonZeroU32>, initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
            max_delay,
        }
    }

    /// Retries indefinitely without waiting between attempts.
    pub fn unbounded() -> Self {
        Self::new(None, Duration::ZERO, Duration::ZERO)
    }

    /// Delay before attempt `attempt + 1`, given that `attempt` (1-based) failed.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    fn exhausted(&self, attempt: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempt >= max.get())
    }
}

/// Runs `op` under `policy`, sleeping between attempts.
///
/// `label` names the operation in log messages and in the exhaustion error.
pub fn retry<T, F>(policy: &RetryPolicy, label: &str, op: F) -> Result<T>
where
    F: FnMut() -> Result<T>,
{
    retry_with_sleep(policy, label, op, thread::sleep)
}

/// Like [`retry`], with an injectable sleep function.
pub fn retry_with_sleep<T, F, S>(policy: &RetryPolicy, label: &str, mut op: F, mut sleep: S) -> Result<T>
where
    F: FnMut() -> Result<T>,
    S: FnMut(Duration),
{
    let mut attempt: u32 = 0;
    loop {
        attempt = attempt.saturating_add(1);
        match op() {
            Ok(value) => return Ok(value),
            Err(err) if !err.is_transient() => return Err(err),
            Err(err) if policy.exhausted(attempt) => {
                return Err(Error::InitializationExhausted {
                    name: label.to_string(),
                    attempts: attempt,
                    last_error: Box::new(err),
                });
            }
            Err(err) => {
                let delay = policy.delay_after(attempt);
                match policy.max_attempts {
                    Some(max) => warn!(
                        "{} failed (attempt {}/{}), retrying in {:?}: {}",
                        label, attempt, max, delay, err
                    ),
                    None => warn!(
                        "{} failed (attempt {}), retrying in {:?}: {}",
                        label, attempt, delay, err
                    ),
                }
                if !delay.is_zero() {
                    sleep(delay);
                }
            }
        }
    }
}
