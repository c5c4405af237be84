//! Batch summary: counts plus the failed and duplicate identifiers.

use serde::Serialize;
use std::fmt;

use crate::types::{BatchResult, FailureKind, SourceId};

/// One failed source with its last attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedEntry {
    pub source: SourceId,
    pub attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<FailureKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub succeeded: usize,
    pub failed_count: usize,
    pub duplicate_count: usize,
    /// Failed sources in the order their first outcome was recorded.
    pub failed: Vec<FailedEntry>,
    /// Every repeated occurrence, in list order.
    pub duplicates: Vec<SourceId>,
}

impl BatchReport {
    pub fn has_failures(&self) -> bool {
        self.failed_count > 0
    }
}

/// Builds the report. Reads `result` only.
pub fn summarize(result: &BatchResult) -> BatchReport {
    let failed = result
        .failed
        .iter()
        .map(|source| {
            let last = result.outcome(source);
            FailedEntry {
                source: source.clone(),
                attempts: last.map_or(0, |o| o.attempt),
                kind: last.and_then(|o| o.failure),
                error: last.and_then(|o| o.error_detail.clone()),
            }
        })
        .collect();
    BatchReport {
        succeeded: result.succeeded.len(),
        failed_count: result.failed.len(),
        duplicate_count: result.duplicates.len(),
        failed,
        duplicates: result.duplicates.clone(),
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "succeeded: {}  failed: {}  duplicates: {}",
            self.succeeded, self.failed_count, self.duplicate_count
        )?;
        writeln!(f, "failed:")?;
        if self.failed.is_empty() {
            writeln!(f, "  none")?;
        }
        for entry in &self.failed {
            write!(f, "  {} (attempts: {}", entry.source, entry.attempts)?;
            if let Some(kind) = entry.kind {
                write!(f, ", {kind}")?;
            }
            write!(f, ")")?;
            if let Some(err) = &entry.error {
                write!(f, ": {err}")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "duplicates:")?;
        if self.duplicates.is_empty() {
            writeln!(f, "  none")?;
        }
        for dup in &self.duplicates {
            writeln!(f, "  {dup}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::JobOutcome;

    fn sample() -> BatchResult {
        let mut r = BatchResult {
            succeeded: vec!["a.com/1".into()],
            failed: vec!["a.com/3".into(), "a.com/2".into()],
            duplicates: vec!["a.com/1".into()],
            ..BatchResult::default()
        };
        r.outcomes
            .insert("a.com/1".into(), JobOutcome::success("a.com/1".into(), 1));
        r.outcomes.insert(
            "a.com/3".into(),
            JobOutcome::failure(
                "a.com/3".into(),
                2,
                FailureKind::MissingArtifact,
                "no audio stream".into(),
            ),
        );
        r.outcomes.insert(
            "a.com/2".into(),
            JobOutcome::failure(
                "a.com/2".into(),
                2,
                FailureKind::FetchToolFailure,
                "HTTP Error 403".into(),
            ),
        );
        r
    }

    #[test]
    fn counts_and_lists_in_recorded_order() {
        let report = summarize(&sample());
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed_count, 2);
        assert_eq!(report.duplicate_count, 1);
        assert!(report.has_failures());
        let failed: Vec<&str> = report.failed.iter().map(|e| e.source.as_str()).collect();
        assert_eq!(failed, vec!["a.com/3", "a.com/2"]);
        assert_eq!(report.failed[1].attempts, 2);
        assert_eq!(report.failed[1].error.as_deref(), Some("HTTP Error 403"));
    }

    #[test]
    fn text_summary() {
        let text = summarize(&sample()).to_string();
        assert!(text.starts_with("succeeded: 1  failed: 2  duplicates: 1\n"));
        assert!(text.contains("  a.com/3 (attempts: 2, missing-artifact): no audio stream\n"));
        assert!(text.contains("duplicates:\n  a.com/1\n"));
    }

    #[test]
    fn empty_lists_render_none() {
        let text = summarize(&BatchResult::default()).to_string();
        assert_eq!(
            text,
            "succeeded: 0  failed: 0  duplicates: 0\nfailed:\n  none\nduplicates:\n  none\n"
        );
    }

    #[test]
    fn json_shape() {
        let v = serde_json::to_value(summarize(&sample())).unwrap();
        assert_eq!(v["failed_count"], 2);
        assert_eq!(v["failed"][0]["kind"], "missing-artifact");
        assert_eq!(v["duplicates"][0], "a.com/1");
    }
}
