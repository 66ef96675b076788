//! Single-token pacing limiter shared by every request in a batch.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::time::{Instant, sleep_until};
use tracing::debug;

use crate::LookupError;
use crate::cancel::CancelToken;

/// Longest spacing a limiter will enforce; longer intervals are clamped.
pub const MAX_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Allows one call per `interval`, with a bucket of exactly one token.
///
/// The first acquisition never waits. Each later acquisition waits until
/// `interval` has passed since the previous token was handed out.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    next_token: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.min(MAX_INTERVAL),
            next_token: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait for the next token, or fail with [`LookupError::Cancelled`] if
    /// `cancel` fires first.
    pub async fn acquire(&self, cancel: &CancelToken) -> Result<(), LookupError> {
        if cancel.is_cancelled() {
            return Err(LookupError::Cancelled);
        }

        let ready_at = self.reserve();
        let wait = ready_at.saturating_duration_since(Instant::now());
        if !wait.is_zero() {
            debug!(wait_ms = wait.as_millis() as u64, "waiting for rate limiter");
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                self.release(ready_at);
                Err(LookupError::Cancelled)
            }
            _ = sleep_until(ready_at) => Ok(()),
        }
    }

    fn reserve(&self) -> Instant {
        let now = Instant::now();
        let mut next = self.next_token.lock().unwrap_or_else(PoisonError::into_inner);
        let ready_at = match *next {
            Some(at) if at > now => at,
            _ => now,
        };
        *next = Some(ready_at + self.interval);
        ready_at
    }

    /// Hand back a reservation that was never used.
    fn release(&self, ready_at: Instant) {
        let mut next = self.next_token.lock().unwrap_or_else(PoisonError::into_inner);
        if *next == Some(ready_at + self.interval) {
            *next = Some(ready_at);
        }
    }
}
