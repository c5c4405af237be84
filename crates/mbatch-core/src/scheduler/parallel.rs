//! Passes over the source list with a bounded number of jobs in flight.
//!
//! Every pass funnels join results into the one [`OutcomeBook`] owned by the
//! caller; tasks never touch shared state.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::task::{JoinError, JoinSet};

use crate::job::JobRunner;
use crate::types::{JobOutcome, SourceId};

use super::attempt::{run_plan, Plan};
use super::outcome::OutcomeBook;
use super::progress::ProgressSink;

/// Keeps up to `limit` sources in flight; when one finishes, the next
/// queued source starts until the queue is empty.
pub(super) async fn refill_pass<R: JobRunner>(
    runner: &Arc<R>,
    sources: &[SourceId],
    limit: usize,
    plan: Plan,
    book: &mut OutcomeBook,
    sink: &ProgressSink,
) {
    let limit = limit.max(1);
    let mut queue: VecDeque<SourceId> = sources.iter().cloned().collect();
    let mut join_set = JoinSet::new();

    loop {
        while join_set.len() < limit {
            let Some(source) = queue.pop_front() else {
                break;
            };
            if !book.begin(&source) {
                tracing::debug!(source = %source, "source not startable, skipped");
                continue;
            }
            join_set.spawn(run_plan(Arc::clone(runner), source, plan));
        }

        if join_set.is_empty() {
            break;
        }

        let Some(res) = join_set.join_next().await else {
            break;
        };
        settle(book, sink, res);
    }
}

/// Runs sources in windows of `limit`; a window fully completes before the
/// next one starts.
pub(super) async fn windowed_pass<R: JobRunner>(
    runner: &Arc<R>,
    sources: &[SourceId],
    limit: usize,
    plan: Plan,
    book: &mut OutcomeBook,
    sink: &ProgressSink,
) {
    for (index, window) in sources.chunks(limit.max(1)).enumerate() {
        tracing::debug!(window = index + 1, size = window.len(), "window started");
        let mut join_set = JoinSet::new();
        for source in window {
            if book.begin(source) {
                join_set.spawn(run_plan(Arc::clone(runner), source.clone(), plan));
            }
        }
        while let Some(res) = join_set.join_next().await {
            settle(book, sink, res);
        }
    }
}

/// Retries every currently failed source once, one at a time, in the order
/// their first outcome was recorded. Returns how many were retried.
pub(super) async fn retry_pass<R: JobRunner>(
    runner: &Arc<R>,
    book: &mut OutcomeBook,
    sink: &ProgressSink,
) -> usize {
    let mut retried = 0;
    for source in book.failed() {
        let attempt = book.attempts(&source) + 1;
        if !book.begin(&source) {
            continue;
        }
        retried += 1;
        let outcome = run_plan(Arc::clone(runner), source, Plan::Once { attempt }).await;
        settle(book, sink, Ok(outcome));
    }
    retried
}

fn settle(book: &mut OutcomeBook, sink: &ProgressSink, res: Result<JobOutcome, JoinError>) {
    match res {
        Ok(outcome) => {
            book.record(outcome.clone());
            sink.emit(&outcome, book.recorded(), book.total());
        }
        // run_plan contains job panics itself; this only fires if the
        // scheduler task is cancelled. The source is classified at finish.
        Err(e) => tracing::error!("scheduler task join: {}", e),
    }
}
