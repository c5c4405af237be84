//! Per-outcome progress events for the CLI.

use tokio::sync::mpsc::Sender;

use crate::types::JobOutcome;

/// Emitted each time the scheduler records an outcome.
#[derive(Debug, Clone)]
pub struct BatchProgress {
    pub outcome: JobOutcome,
    /// 0 for the main pass, 1.. for sequential retry passes.
    pub pass: u32,
    /// Unique sources with at least one recorded outcome.
    pub recorded: usize,
    pub total: usize,
}

impl BatchProgress {
    /// Fraction of sources that have an outcome, in [0.0, 1.0].
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        (self.recorded as f64 / self.total as f64).min(1.0)
    }
}

/// Optional progress channel tagged with the current pass.
#[derive(Debug, Clone)]
pub(super) struct ProgressSink {
    tx: Option<Sender<BatchProgress>>,
    pass: u32,
}

impl ProgressSink {
    pub fn new(tx: Option<Sender<BatchProgress>>) -> Self {
        Self { tx, pass: 0 }
    }

    pub fn for_pass(&self, pass: u32) -> Self {
        Self {
            tx: self.tx.clone(),
            pass,
        }
    }

    /// Never blocks the scheduler: a full or closed channel drops the event.
    pub fn emit(&self, outcome: &JobOutcome, recorded: usize, total: usize) {
        if let Some(tx) = &self.tx {
            let _ = tx.try_send(BatchProgress {
                outcome: outcome.clone(),
                pass: self.pass,
                recorded,
                total,
            });
        }
    }
}
