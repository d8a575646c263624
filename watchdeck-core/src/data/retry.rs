//! Bounded retry with fixed or linearly increasing delay.
//!
//! One policy value is shared by the two blocking boundaries — the market
//! data fetch and the output sink — and is never wrapped around pure
//! computation. Non-transient errors are returned immediately.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Delay growth between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backoff {
    Fixed,
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 2_000,
            backoff: Backoff::Fixed,
        }
    }
}

impl RetryPolicy {
    /// Delay to sleep after the given 1-based failed attempt.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let ms = match self.backoff {
            Backoff::Fixed => self.base_delay_ms,
            Backoff::Linear => self.base_delay_ms * u64::from(attempt),
        };
        Duration::from_millis(ms)
    }

    /// Run `op` until it succeeds, a non-transient error occurs, or attempts
    /// run out. The last error is returned on exhaustion.
    pub fn run<T, E>(
        &self,
        is_transient: impl Fn(&E) -> bool,
        mut op: impl FnMut() -> Result<T, E>,
    ) -> Result<T, E> {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(err) if attempt < attempts && is_transient(&err) => {
                    std::thread::sleep(self.delay_after(attempt));
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
