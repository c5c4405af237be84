//! Per-source state and latest outcome, owned by the aggregating loop.

use std::collections::HashMap;

use crate::types::{BatchResult, FailureKind, JobOutcome, SourceId};

/// Lifecycle of one source within a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceState {
    Pending,
    InFlight,
    Succeeded,
    Failed,
}

/// One slot per unique source. Only the scheduler loop mutates it, so
/// concurrent completions cannot lose updates.
#[derive(Debug)]
pub(crate) struct OutcomeBook {
    sources: Vec<SourceId>,
    states: HashMap<SourceId, SourceState>,
    latest: HashMap<SourceId, JobOutcome>,
    /// Sources in the order their first outcome was recorded.
    order: Vec<SourceId>,
}

impl OutcomeBook {
    pub fn new(sources: &[SourceId]) -> Self {
        Self {
            sources: sources.to_vec(),
            states: sources
                .iter()
                .map(|s| (s.clone(), SourceState::Pending))
                .collect(),
            latest: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn state(&self, source: &SourceId) -> Option<SourceState> {
        self.states.get(source).copied()
    }

    /// Moves `source` to `InFlight`. Only `Pending` and `Failed` sources can
    /// start; returns false otherwise, so a source never runs twice at once.
    pub fn begin(&mut self, source: &SourceId) -> bool {
        let Some(state) = self.states.get_mut(source) else {
            return false;
        };
        if matches!(*state, SourceState::Pending | SourceState::Failed) {
            *state = SourceState::InFlight;
            true
        } else {
            false
        }
    }

    /// Stores the outcome of an attempt that was started with [`begin`](Self::begin).
    pub fn record(&mut self, outcome: JobOutcome) {
        let Some(state) = self.states.get_mut(&outcome.source) else {
            tracing::warn!(source = %outcome.source, "outcome for unknown source ignored");
            return;
        };
        if *state != SourceState::InFlight {
            tracing::warn!(source = %outcome.source, ?state, "outcome for source not in flight ignored");
            return;
        }
        *state = if outcome.succeeded {
            SourceState::Succeeded
        } else {
            SourceState::Failed
        };
        if !self.latest.contains_key(&outcome.source) {
            self.order.push(outcome.source.clone());
        }
        self.latest.insert(outcome.source.clone(), outcome);
    }

    /// Latest recorded attempt number (0 if never attempted).
    pub fn attempts(&self, source: &SourceId) -> u32 {
        self.latest.get(source).map_or(0, |o| o.attempt)
    }

    /// Currently failed sources in recording order.
    pub fn failed(&self) -> Vec<SourceId> {
        self.order
            .iter()
            .filter(|s| self.state(s) == Some(SourceState::Failed))
            .cloned()
            .collect()
    }

    pub fn recorded(&self) -> usize {
        self.order.len()
    }

    pub fn total(&self) -> usize {
        self.sources.len()
    }

    /// Classifies every source exactly once. A source without any recorded
    /// outcome is reported as failed.
    pub fn finish(mut self, duplicates: Vec<SourceId>) -> BatchResult {
        for source in &self.sources {
            if !self.latest.contains_key(source) {
                tracing::error!(source = %source, "no outcome recorded; counting as failed");
                self.latest.insert(
                    source.clone(),
                    JobOutcome::failure(
                        source.clone(),
                        0,
                        FailureKind::Panicked,
                        "job did not report an outcome".to_string(),
                    ),
                );
                self.order.push(source.clone());
            }
        }

        let mut result = BatchResult {
            duplicates,
            ..BatchResult::default()
        };
        for source in self.order {
            let ok = self.latest.get(&source).is_some_and(|o| o.succeeded);
            if ok {
                result.succeeded.push(source);
            } else {
                result.failed.push(source);
            }
        }
        result.outcomes = self.latest;
        result
    }
}
