//! Types shared by the loader, jobs, scheduler and reporter.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Opaque identifier of one remote media resource (usually a URL).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SourceId(String);

impl SourceId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// One encoding offered by the fetch tool for a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatCandidate {
    pub format_id: String,
    pub height: u32,
}

/// What kind of media a batch produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Separate video and audio streams, muxed into one file afterwards.
    #[default]
    Video,
    /// Audio only, extracted and transcoded by the fetch tool.
    Audio,
}

/// Coarse classification of a failed attempt, kept for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    FormatUnavailable,
    FetchToolFailure,
    MissingArtifact,
    MergeToolFailure,
    Io,
    Panicked,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::FormatUnavailable => "format-unavailable",
            FailureKind::FetchToolFailure => "fetch-tool-failure",
            FailureKind::MissingArtifact => "missing-artifact",
            FailureKind::MergeToolFailure => "merge-tool-failure",
            FailureKind::Io => "io",
            FailureKind::Panicked => "panicked",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one fetch attempt for one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobOutcome {
    pub source: SourceId,
    pub succeeded: bool,
    /// 1-based attempt number that produced this outcome.
    pub attempt: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
}

impl JobOutcome {
    pub fn success(source: SourceId, attempt: u32) -> Self {
        Self {
            source,
            succeeded: true,
            attempt,
            error_detail: None,
            failure: None,
        }
    }

    pub fn failure(source: SourceId, attempt: u32, kind: FailureKind, detail: String) -> Self {
        Self {
            source,
            succeeded: false,
            attempt,
            error_detail: Some(detail),
            failure: Some(kind),
        }
    }
}

/// Final reconciliation of a batch. Built once by the scheduler.
///
/// `succeeded` and `failed` are disjoint and together hold every unique
/// source exactly once; `duplicates` holds every repeated occurrence from
/// the input list and never overlaps with the other two as a fetch record.
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    pub succeeded: Vec<SourceId>,
    pub failed: Vec<SourceId>,
    pub duplicates: Vec<SourceId>,
    /// Latest outcome per unique source.
    pub outcomes: HashMap<SourceId, JobOutcome>,
}

impl BatchResult {
    pub fn outcome(&self, source: &SourceId) -> Option<&JobOutcome> {
        self.outcomes.get(source)
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}
