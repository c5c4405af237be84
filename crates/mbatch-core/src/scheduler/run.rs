//! Batch entry point: main pass, then retry passes, then classification.

use std::sync::Arc;

use tokio::sync::mpsc::Sender;

use crate::job::JobRunner;
use crate::source_list::SourceList;
use crate::types::BatchResult;

use super::attempt::Plan;
use super::outcome::OutcomeBook;
use super::parallel::{refill_pass, retry_pass, windowed_pass};
use super::policy::{SchedulePolicy, SchedulerOptions};
use super::progress::{BatchProgress, ProgressSink};

/// Runs every unique source of `list` through `runner` according to `opts`.
///
/// Per-source failures (including panics inside a job) never abort the
/// batch; each unique source ends up in exactly one of `succeeded` or
/// `failed`. Duplicates are carried through from the list unchanged.
pub async fn run_batch<R: JobRunner>(
    runner: Arc<R>,
    list: &SourceList,
    opts: &SchedulerOptions,
    progress: Option<Sender<BatchProgress>>,
) -> BatchResult {
    let sources = &list.unique;
    let limit = opts.concurrency.max(1);
    let mut book = OutcomeBook::new(sources);
    let sink = ProgressSink::new(progress);

    tracing::info!(
        sources = sources.len(),
        duplicates = list.duplicate_count(),
        policy = %opts.policy,
        concurrency = limit,
        "batch started"
    );

    let first = Plan::Once { attempt: 1 };
    match opts.policy {
        SchedulePolicy::Refill => {
            refill_pass(&runner, sources, limit, first, &mut book, &sink).await
        }
        SchedulePolicy::Windowed => {
            windowed_pass(&runner, sources, limit, first, &mut book, &sink).await
        }
        SchedulePolicy::PerItem => {
            let plan = Plan::Bounded(opts.retry);
            refill_pass(&runner, sources, limit, plan, &mut book, &sink).await
        }
    }

    if opts.policy != SchedulePolicy::PerItem {
        for pass in 1..=opts.retry_passes {
            let pending = book.failed().len();
            if pending == 0 {
                break;
            }
            tracing::info!(pass, failed = pending, "retry pass started");
            let retried = retry_pass(&runner, &mut book, &sink.for_pass(pass)).await;
            tracing::debug!(pass, retried, "retry pass finished");
        }
    }

    let result = book.finish(list.duplicates.clone());
    tracing::info!(
        succeeded = result.succeeded.len(),
        failed = result.failed.len(),
        duplicates = result.duplicates.len(),
        "batch finished"
    );
    result
}
