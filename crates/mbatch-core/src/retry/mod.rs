//! Per-source retry policy.
//!
//! Every job failure is retryable; the policy only bounds how many
//! attempts a source gets and how long to wait between them.

mod policy;
mod run;

pub use policy::{RetryDecision, RetryPolicy};
pub use run::run_with_retry;
