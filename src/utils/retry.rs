//! Retry utilities with exponential backoff for resilient API calls.

use std::time::Duration;
use tokio::time::{sleep, timeout};

use crate::arxiv::ArxivError;

/// Configuration for retry behavior
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_attempts: u32,
    /// Initial delay between retries
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Maximum total time to spend on a single attempt
    pub max_total_time: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            backoff_multiplier: 2.0,
            max_total_time: Duration::from_secs(120),
        }
    }
}

/// Transient errors that should trigger a retry
#[derive(Debug, Clone, PartialEq)]
pub enum TransientError {
    /// Network connectivity issues
    Network,
    /// Rate limit exceeded
    RateLimit,
    /// Server error (5xx)
    ServerError,
    /// Request timeout
    Timeout,
}

impl TransientError {
    /// Check if an [`ArxivError`] represents a transient error
    pub fn from_arxiv_error(err: &ArxivError) -> Option<Self> {
        match err {
            ArxivError::RateLimit => Some(TransientError::RateLimit),
            ArxivError::Network(msg) => {
                if msg.to_lowercase().contains("timeout") {
                    Some(TransientError::Timeout)
                } else {
                    Some(TransientError::Network)
                }
            }
            ArxivError::Api(msg) => {
                let msg_lower = msg.to_lowercase();
                if msg_lower.contains("503") || msg_lower.contains("unavailable") {
                    Some(TransientError::ServerError)
                } else if msg_lower.contains("429") {
                    Some(TransientError::RateLimit)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Get the recommended delay for this error
    pub fn recommended_delay(&self) -> Duration {
        match self {
            TransientError::RateLimit => Duration::from_secs(10),
            TransientError::ServerError => Duration::from_secs(5),
            TransientError::Timeout => Duration::from_secs(2),
            TransientError::Network => Duration::from_secs(2),
        }
    }
}

/// Execute an operation, retrying transient failures with exponential backoff.
///
/// Non-transient errors are returned immediately; transient errors are retried
/// up to `config.max_attempts` times.
pub async fn with_retry<T, F, Fut>(config: RetryConfig, operation: F) -> Result<T, ArxivError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, ArxivError>>,
{
    let mut attempts = 0;
    let mut operation = operation;

    loop {
        attempts += 1;

        match timeout(config.max_total_time, operation()).await {
            Ok(Ok(result)) => {
                if attempts > 1 {
                    tracing::info!(
                        "Operation succeeded on attempt {} after {} transient failures",
                        attempts,
                        attempts - 1
                    );
                }
                return Ok(result);
            }
            Ok(Err(error)) => {
                let Some(transient) = TransientError::from_arxiv_error(&error) else {
                    return Err(error);
                };

                if attempts >= config.max_attempts {
                    tracing::warn!(
                        "Giving up after {} attempts: {:?} ({})",
                        attempts,
                        transient,
                        error
                    );
                    return Err(error);
                }

                let exp_delay = config.initial_delay.as_secs_f64()
                    * config.backoff_multiplier.powi(attempts as i32 - 1);
                let delay = Duration::from_secs_f64(exp_delay)
                    .max(transient.recommended_delay())
                    .min(config.max_delay);

                tracing::debug!(
                    "Attempt {} failed ({:?}), retrying in {:?}",
                    attempts,
                    transient,
                    delay
                );
                sleep(delay).await;
            }
            Err(_) => {
                if attempts >= config.max_attempts {
                    return Err(ArxivError::Network("request timed out".to_string()));
                }
                sleep(config.initial_delay).await;
            }
        }
    }
}

/// Retry configuration tuned for the arXiv API
pub fn api_retry_config() -> RetryConfig {
    RetryConfig {
        max_attempts: 3,
        initial_delay: Duration::from_secs(2),
        max_delay: Duration::from_secs(60),
        backoff_multiplier: 2.0,
        max_total_time: Duration::from_secs(120),
    }
}
