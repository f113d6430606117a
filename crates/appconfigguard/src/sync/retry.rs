use std::future::Future;
use std::time::Duration;

use super::cancel::CancelSignal;
use super::error::{Result, SyncError};
use crate::store::StoreError;

/// Default number of additional attempts after the first failure.
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Default base delay; attempt `n` waits `n × base_delay`.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Linear-backoff retry policy for store calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Wait before retry number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }

    /// Runs `call` until it succeeds, retries run out, or `cancel` fires.
    ///
    /// Every error is retried. Cancellation is checked before each attempt
    /// and interrupts the backoff wait.
    pub async fn run<T, F, Fut>(&self, operation: &str, cancel: &CancelSignal, mut call: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, StoreError>>,
    {
        let mut attempt = 0u32;
        loop {
            if cancel.is_cancelled() {
                return Err(SyncError::Cancelled {
                    operation: operation.to_string(),
                });
            }

            let err = match call().await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            if attempt >= self.max_retries {
                return Err(SyncError::RetriesExhausted {
                    operation: operation.to_string(),
                    attempts: attempt + 1,
                    source: err,
                });
            }

            attempt += 1;
            let delay = self.delay_for(attempt);
            if err.is_transient() {
                log::warn!(
                    "{} failed with transient error, retrying ({}/{}) in {:?}: {}",
                    operation,
                    attempt,
                    self.max_retries,
                    delay,
                    err
                );
            } else {
                log::warn!(
                    "{} failed, retrying ({}/{}) in {:?}: {}",
                    operation,
                    attempt,
                    self.max_retries,
                    delay,
                    err
                );
            }

            let mut signal = cancel.clone();
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = signal.cancelled() => {
                    log::info!("{} cancelled during backoff", operation);
                    return Err(SyncError::Cancelled {
                        operation: operation.to_string(),
                    });
                }
            }
        }
    }
}
