//! Retry with exponential back-off and jitter for the places client.
//!
//! [`retry_with_backoff`] wraps one logical API call and retries it on
//! transient failures. The number of HTTP attempts is reported alongside the
//! outcome because every attempt is billable.

use std::future::Future;
use std::time::Duration;

use crate::error::PlacesError;

/// Outcome of one logical API call together with the number of HTTP
/// attempts it took (always at least 1).
#[derive(Debug)]
pub struct Attempted<T> {
    pub attempts: u32,
    pub outcome: Result<T, PlacesError>,
}

impl<T> Attempted<T> {
    /// A call that was sent exactly once.
    #[must_use]
    pub fn once(outcome: Result<T, PlacesError>) -> Self {
        Self {
            attempts: 1,
            outcome,
        }
    }

    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Attempted<U> {
        Attempted {
            attempts: self.attempts,
            outcome: self.outcome.map(f),
        }
    }
}

const MAX_DELAY_MS: u64 = 60_000;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:**
/// - Network-level failures: timeout, connection reset.
/// - [`PlacesError::RateLimited`]: HTTP 429.
/// - [`PlacesError::Api`] with a 5xx status.
///
/// **Not retriable:**
/// - [`PlacesError::Api`] with a 4xx status (bad key, bad request, unknown place).
/// - [`PlacesError::Deserialize`]: malformed response; retrying won't fix it.
/// - [`PlacesError::InvalidBaseUrl`]: configuration error.
pub(crate) fn is_retriable(err: &PlacesError) -> bool {
    match err {
        PlacesError::Http(e) => e.is_timeout() || e.is_connect(),
        PlacesError::RateLimited { .. } => true,
        PlacesError::Api { status, .. } => *status >= 500,
        PlacesError::Deserialize { .. } | PlacesError::InvalidBaseUrl { .. } => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// The sleep before retry `n` is `backoff_base_ms × 2^(n-1)` with ±25 %
/// jitter, raised to the server's `Retry-After` when rate limited, and capped
/// at 60 s. Non-retriable errors are returned immediately.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Attempted<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PlacesError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => {
                return Attempted {
                    attempts: attempt + 1,
                    outcome: Ok(value),
                };
            }
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Attempted {
                        attempts: attempt + 1,
                        outcome: Err(err),
                    };
                }
                attempt += 1;
                let delay_ms = backoff_delay_ms(backoff_base_ms, attempt, &err);
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "places API transient error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

fn backoff_delay_ms(backoff_base_ms: u64, attempt: u32, err: &PlacesError) -> u64 {
    let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let jittered = (computed as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
    let floor = match err {
        PlacesError::RateLimited { retry_after_secs } => retry_after_secs.saturating_mul(1000),
        _ => 0,
    };
    jittered.max(floor).min(MAX_DELAY_MS)
}
