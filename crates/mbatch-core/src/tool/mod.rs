//! External tool seam.
//!
//! The fetch tool (yt-dlp) and the mux tool (ffmpeg) are black boxes behind
//! [`FetchTool`] and [`MuxTool`], so jobs and the scheduler can be exercised
//! with scripted fakes.

mod ffmpeg;
mod process;
mod ytdlp;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::types::SourceId;

pub use ffmpeg::Ffmpeg;
pub use process::{failure_detail, stderr_signals_error, ToolCommand, ToolOutput};
pub use ytdlp::YtDlp;

/// Failure of one external tool invocation.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("{tool}: failed to launch: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{tool}: exited with code {code:?}: {detail}")]
    Failed {
        tool: String,
        code: Option<i32>,
        detail: String,
    },
    #[error("{tool}: reported an error: {detail}")]
    Reported { tool: String, detail: String },
    #[error("{tool}: timed out after {secs}s")]
    TimedOut { tool: String, secs: u64 },
}

/// Which streams to ask the fetch tool for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatRequest {
    /// Video-only stream plus best audio-only stream, as separate files.
    /// `None` asks for the tool's best video.
    Video { format_id: Option<String> },
    /// Best audio, extracted and transcoded to `codec` at `quality`.
    Audio { codec: String, quality: String },
}

/// One fetch invocation.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub source: SourceId,
    /// Output path template in the fetch tool's syntax.
    pub output_template: PathBuf,
    pub format: FormatRequest,
}

#[async_trait]
pub trait FetchTool: Send + Sync {
    /// Raw textual format table for `source`.
    async fn list_formats(&self, source: &SourceId) -> Result<String, ToolError>;

    /// Human title of `source`, used to name artifacts.
    async fn resolve_title(&self, source: &SourceId) -> Result<String, ToolError>;

    /// Downloads `request.source`. Ok means the tool reported success; the
    /// caller still has to find the produced files.
    async fn fetch(&self, request: &FetchRequest) -> Result<(), ToolError>;
}

#[async_trait]
pub trait MuxTool: Send + Sync {
    /// Combines `video` and `audio` into `output`.
    async fn mux(&self, video: &Path, audio: &Path, output: &Path) -> Result<(), ToolError>;
}

/// First line of `<program> <version_arg>`, or `None` if it cannot run.
pub async fn probe_version(program: &Path, version_arg: &str) -> Option<String> {
    let out = ToolCommand::new(program)
        .arg(version_arg)
        .output()
        .await
        .ok()?;
    if !out.success() {
        return None;
    }
    out.stdout
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}
