//! Running one source through a job, with failures and panics contained.

use std::sync::Arc;

use crate::job::{JobError, JobRunner, JobSuccess};
use crate::retry::{run_with_retry, RetryPolicy};
use crate::types::{FailureKind, JobOutcome, SourceId};

/// How many attempts one scheduled unit of work makes.
#[derive(Debug, Clone, Copy)]
pub(super) enum Plan {
    /// Exactly one attempt, numbered `attempt`.
    Once { attempt: u32 },
    /// Up to `max_attempts` back-to-back attempts, stopping at success.
    Bounded(RetryPolicy),
}

/// Runs the plan for `source` and returns its final outcome. Never panics
/// and never returns an error: everything becomes a [`JobOutcome`].
pub(super) async fn run_plan<R: JobRunner>(
    runner: Arc<R>,
    source: SourceId,
    plan: Plan,
) -> JobOutcome {
    let (result, attempt) = match plan {
        Plan::Once { attempt } => (attempt_logged(&runner, &source, attempt).await, attempt),
        Plan::Bounded(policy) => {
            run_with_retry(&policy, |n| attempt_logged(&runner, &source, n)).await
        }
    };
    match result {
        Ok(_) => JobOutcome::success(source, attempt),
        Err(e) => JobOutcome::failure(source, attempt, e.kind(), e.to_string()),
    }
}

async fn attempt_logged<R: JobRunner>(
    runner: &Arc<R>,
    source: &SourceId,
    attempt: u32,
) -> Result<JobSuccess, JobError> {
    tracing::debug!(source = %source, attempt, "attempt started");
    let result = contained(Arc::clone(runner), source.clone()).await;
    match &result {
        Ok(done) if done.skipped => {
            tracing::info!(source = %source, attempt, output = %done.output.display(), "already present")
        }
        Ok(done) => {
            tracing::info!(source = %source, attempt, output = %done.output.display(), "fetched")
        }
        Err(e) if e.kind() == FailureKind::MissingArtifact => tracing::warn!(
            source = %source,
            attempt,
            kind = %e.kind(),
            "tool reported success but artifacts are missing: {}",
            e
        ),
        Err(e) => tracing::warn!(source = %source, attempt, kind = %e.kind(), "attempt failed: {}", e),
    }
    result
}

/// Runs the job on its own task so a panic inside it only fails this attempt.
async fn contained<R: JobRunner>(
    runner: Arc<R>,
    source: SourceId,
) -> Result<JobSuccess, JobError> {
    let handle = tokio::spawn(async move { runner.run(&source).await });
    match handle.await {
        Ok(result) => result,
        Err(e) => Err(JobError::Panicked(e.to_string())),
    }
}
