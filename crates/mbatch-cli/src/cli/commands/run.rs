//! `mbatch run` – fetch every source in a list file.

use anyhow::{Context, Result};
use mbatch_core::config::MbatchConfig;
use mbatch_core::job::MediaJob;
use mbatch_core::report;
use mbatch_core::scheduler::{self, BatchProgress};
use mbatch_core::source_list;
use std::sync::Arc;

use crate::cli::{Completion, RunArgs};

pub async fn run_batch(cfg: &MbatchConfig, args: &RunArgs) -> Result<Completion> {
    let mut cfg = cfg.clone();
    args.apply(&mut cfg);
    cfg.validate().context("invalid run options")?;

    let list = source_list::load(&args.list)?;
    if list.is_empty() {
        println!("No sources in {}.", args.list.display());
        return Ok(Completion::Clean);
    }
    tracing::info!(
        list = %args.list.display(),
        mode = ?cfg.mode,
        dir = %cfg.download_dir.display(),
        "starting batch"
    );

    let job = MediaJob::new(cfg.fetch_tool(), cfg.mux_tool(), cfg.job_settings());

    // JSON output stays machine-readable: no progress lines on stdout.
    let (progress_tx, printer) = if args.json {
        (None, None)
    } else {
        let (tx, mut rx) = tokio::sync::mpsc::channel::<BatchProgress>(64);
        let handle = tokio::spawn(async move {
            while let Some(p) = rx.recv().await {
                println!("{}", progress_line(&p));
            }
        });
        (Some(tx), Some(handle))
    };

    let result = scheduler::run_batch(
        Arc::new(job),
        &list,
        &cfg.scheduler_options(),
        progress_tx,
    )
    .await;
    if let Some(handle) = printer {
        let _ = handle.await;
    }

    let summary = report::summarize(&result);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!();
        print!("{summary}");
    }

    Ok(if summary.has_failures() {
        Completion::WithFailures
    } else {
        Completion::Clean
    })
}

fn progress_line(p: &BatchProgress) -> String {
    let status = if p.outcome.succeeded { "ok  " } else { "FAIL" };
    let pass = if p.pass > 0 {
        format!(" (retry pass {})", p.pass)
    } else {
        String::new()
    };
    let mut line = format!(
        "[{}/{}] {} {}{}",
        p.recorded, p.total, status, p.outcome.source, pass
    );
    if let Some(err) = &p.outcome.error_detail {
        line.push_str(": ");
        line.push_str(err);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use mbatch_core::types::{FailureKind, JobOutcome, SourceId};

    #[test]
    fn progress_line_format() {
        let ok = BatchProgress {
            outcome: JobOutcome::success(SourceId::from("a.com/1"), 1),
            pass: 0,
            recorded: 1,
            total: 3,
        };
        assert_eq!(progress_line(&ok), "[1/3] ok   a.com/1");

        let failed = BatchProgress {
            outcome: JobOutcome::failure(
                SourceId::from("a.com/2"),
                2,
                FailureKind::FetchToolFailure,
                "fetch tool failed".into(),
            ),
            pass: 1,
            recorded: 3,
            total: 3,
        };
        assert_eq!(
            progress_line(&failed),
            "[3/3] FAIL a.com/2 (retry pass 1): fetch tool failed"
        );
    }
}
