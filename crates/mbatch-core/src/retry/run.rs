//! Retry loop: run an async attempt until success or the policy says stop.

use std::future::Future;

use super::policy::{RetryDecision, RetryPolicy};

/// Runs `attempt(n)` for n = 1, 2, ... until it succeeds or the policy says
/// to stop. Returns the last result together with the attempt number that
/// produced it.
pub async fn run_with_retry<F, Fut, T, E>(
    policy: &RetryPolicy,
    mut attempt: F,
) -> (Result<T, E>, u32)
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut n = 1u32;
    loop {
        match attempt(n).await {
            Ok(v) => return (Ok(v), n),
            Err(e) => match policy.decide(n) {
                RetryDecision::NoRetry => return (Err(e), n),
                RetryDecision::RetryAfter(d) => {
                    tracing::debug!(attempt = n, "attempt failed, retrying: {}", e);
                    if !d.is_zero() {
                        tokio::time::sleep(d).await;
                    }
                    n += 1;
                }
            },
        }
    }
}
