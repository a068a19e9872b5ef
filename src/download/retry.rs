//! Retry policy for transfers.
//!
//! Only a transient outcome is retried; any other outcome ends the loop at
//! once. Retries are bounded by [`RetryConfig::max_retries`] and spaced with
//! exponential backoff.

use std::path::Path;
use std::time::Duration;

use rand::Rng;

use crate::config::RetryConfig;
use crate::download::transfer::{TransferOutcome, Transport};

/// Final outcome of a transfer and how many attempts it took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryResult {
    pub outcome: TransferOutcome,
    pub attempts: u32,
}

/// Transfer `url` into `path`, overwriting, retrying transient failures.
pub async fn fetch_with_retry(
    transport: &dyn Transport,
    config: &RetryConfig,
    url: &str,
    path: &Path,
) -> RetryResult {
    let mut attempts = 0;
    let mut delay = config.initial_delay();

    loop {
        let outcome = transport.download(url, path, true).await;
        attempts += 1;

        if !outcome.is_transient() {
            if attempts > 1 && outcome.ok {
                tracing::info!(attempts, "Transfer succeeded after retry");
            }
            return RetryResult { outcome, attempts };
        }

        if attempts > config.max_retries {
            tracing::error!(
                attempts,
                path = %path.display(),
                "Transfer still failing after all retries"
            );
            return RetryResult { outcome, attempts };
        }

        let wait = if config.jitter {
            add_jitter(delay)
        } else {
            delay
        };

        tracing::warn!(
            attempt = attempts,
            max_retries = config.max_retries,
            delay_ms = wait.as_millis() as u64,
            path = %path.display(),
            "Transient transfer failure, retrying"
        );

        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }

        delay = next_delay(delay, config);
    }
}

/// Grow a delay by the backoff multiplier, capped at the maximum delay.
fn next_delay(delay: Duration, config: &RetryConfig) -> Duration {
    Duration::try_from_secs_f64(delay.as_secs_f64() * config.backoff_multiplier)
        .unwrap_or(Duration::MAX)
        .min(config.max_delay())
}

/// Stretch a delay by a random 0-100%.
fn add_jitter(delay: Duration) -> Duration {
    let mut rng = rand::thread_rng();
    let jitter_factor: f64 = rng.gen_range(0.0..=1.0);
    Duration::from_secs_f64(delay.as_secs_f64() * (1.0 + jitter_factor))
}
