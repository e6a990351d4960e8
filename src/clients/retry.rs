// Bounded retry with a fixed delay for exchange calls

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, warn};

use crate::config::ExchangeConfig;
use crate::error::{DeskError, DeskResult};

/// Retries timeouts only, a fixed number of times, with a constant pause.
/// Any other error is returned on the spot.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn from_config(config: &ExchangeConfig) -> Self {
        Self::new(config.retries, config.retry_delay())
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub async fn execute<F, Fut, T>(&self, operation: &str, mut call: F) -> DeskResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = DeskResult<T>>,
    {
        for attempt in 1..=self.max_attempts {
            match call().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() => {
                    warn!(
                        "⏳ Timeout on {} (attempt {}/{}): {}",
                        operation, attempt, self.max_attempts, err
                    );
                    if attempt < self.max_attempts {
                        sleep(self.delay).await;
                    }
                }
                Err(err) => {
                    error!("❌ Unexpected error in {}: {}", operation, err);
                    return Err(err);
                }
            }
        }

        Err(DeskError::RetriesExhausted {
            operation: operation.to_string(),
            attempts: self.max_attempts,
        })
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(2))
    }
}
