//! Fixed-wait retry on API rate limits.
//!
//! A rate-limit response is treated as backpressure rather than failure: the
//! request is repeated unchanged after [`RateLimitPolicy::wait`]. The wait does
//! not grow between attempts. Every other error is returned immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::ClientError;

/// Fifteen minutes, the length of one X API rate-limit window.
pub const DEFAULT_RATE_LIMIT_WAIT: Duration = Duration::from_secs(15 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// Sleep before repeating a rate-limited request.
    pub wait: Duration,
    /// Maximum number of repeats; `None` retries indefinitely.
    pub max_retries: Option<u32>,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            wait: DEFAULT_RATE_LIMIT_WAIT,
            max_retries: None,
        }
    }
}

impl RateLimitPolicy {
    #[must_use]
    pub fn new(wait: Duration, max_retries: Option<u32>) -> Self {
        Self { wait, max_retries }
    }

    fn allows_retry(&self, retries_so_far: u32) -> bool {
        self.max_retries.is_none_or(|max| retries_so_far < max)
    }
}

/// Runs `operation`, repeating it after `policy.wait` whenever it fails with
/// [`ClientError::RateLimited`].
///
/// With `max_retries = Some(n)` the operation runs at most `n + 1` times and
/// the final rate-limit error is returned.
pub(crate) async fn retry_on_rate_limit<T, F, Fut>(
    policy: &RateLimitPolicy,
    mut operation: F,
) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let mut retries = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(ClientError::RateLimited { retry_after_secs }) if policy.allows_retry(retries) => {
                retries = retries.saturating_add(1);
                tracing::warn!(
                    retries,
                    wait_secs = policy.wait.as_secs(),
                    ?retry_after_secs,
                    "rate limit hit; waiting before retrying the same request"
                );
                tokio::time::sleep(policy.wait).await;
            }
            Err(err) => return Err(err),
        }
    }
}
