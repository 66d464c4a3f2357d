//! Retry with exponential back-off and jitter for commerce API requests.
//!
//! [`retry_with_backoff`] wraps any fallible async operation and retries on
//! transient errors (network failures, 429, 5xx). Everything else — 4xx,
//! deserialization failures, the fatal page wrapper — is returned immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::CommerceError;

/// Per-request retry policy for the commerce client.
///
/// `max_retries` is the number of additional attempts after the first
/// failure; `0` disables retries entirely (useful in tests). The wait before
/// the n-th retry is `backoff_base_ms * 2^(n-1)`, capped and jittered.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff_base_ms: 500,
        }
    }
}

/// Returns `true` for errors worth retrying after a back-off delay.
///
/// **Retriable:**
/// - Network-level failures: timeout, connection reset.
/// - HTTP 429: the server asked us to back off.
/// - HTTP 5xx: transient server/infrastructure errors.
///
/// **Not retriable:**
/// - Other HTTP statuses (401, 404, ...): retrying returns the same result.
/// - [`CommerceError::Deserialize`]: malformed response; retrying won't fix it.
/// - [`CommerceError::PageFetch`] / [`CommerceError::DeadlineExceeded`] /
///   [`CommerceError::InvalidBaseUrl`]: already-final failures.
pub(crate) fn is_retriable(err: &CommerceError) -> bool {
    match err {
        CommerceError::Http(e) => e.is_timeout() || e.is_connect(),
        CommerceError::RateLimited { .. } => true,
        CommerceError::UnexpectedStatus { status, .. } => (500..=599).contains(status),
        CommerceError::Deserialize { .. }
        | CommerceError::PageFetch { .. }
        | CommerceError::DeadlineExceeded { .. }
        | CommerceError::InvalidBaseUrl { .. } => false,
    }
}

/// Runs `operation` under `policy`, sleeping between attempts.
///
/// Back-off schedule with `backoff_base_ms = 500`:
///
/// | Attempt | Sleep before next attempt     |
/// |---------|-------------------------------|
/// | 1       | 500 ms × 2⁰ ± 25 % jitter    |
/// | 2       | 500 ms × 2¹ ± 25 % jitter    |
/// | 3       | 500 ms × 2² ± 25 % jitter    |
///
/// Delay is capped at 30 s. Non-retriable errors are returned immediately.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    policy: RetryPolicy,
    mut operation: F,
) -> Result<T, CommerceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CommerceError>>,
{
    const MAX_DELAY_MS: u64 = 30_000;
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= policy.max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = policy
                    .backoff_base_ms
                    .saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries = policy.max_retries,
                    delay_ms,
                    error = %err,
                    "transient commerce API error — retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
