//! One fetch job for one source: title → format → fetch → merge.
//!
//! All per-source failures surface as [`JobError`]; the scheduler turns them
//! into outcomes and never lets them abort the batch.

pub mod artifacts;
mod fetch;
mod merge;

use async_trait::async_trait;
use std::path::PathBuf;

use crate::format::{self, FormatUnavailable};
use crate::naming;
use crate::tool::{FetchTool, MuxTool, ToolError};
use crate::types::{FailureKind, MediaKind, SourceId};

pub use fetch::{fetch_audio, fetch_streams, output_template};
pub use merge::merge;

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("format unavailable: {0}")]
    FormatUnavailable(#[from] FormatUnavailable),
    #[error("fetch tool failed: {0}")]
    FetchToolFailure(#[source] ToolError),
    #[error("fetch tool succeeded but no {missing} found for \"{base}\"")]
    MissingArtifact { base: String, missing: &'static str },
    #[error("merge into {} failed; intermediates kept", .output.display())]
    MergeToolFailure { output: PathBuf },
    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("job panicked: {0}")]
    Panicked(String),
}

impl JobError {
    pub fn kind(&self) -> FailureKind {
        match self {
            JobError::FormatUnavailable(_) => FailureKind::FormatUnavailable,
            JobError::FetchToolFailure(_) => FailureKind::FetchToolFailure,
            JobError::MissingArtifact { .. } => FailureKind::MissingArtifact,
            JobError::MergeToolFailure { .. } => FailureKind::MergeToolFailure,
            JobError::Io(_) => FailureKind::Io,
            JobError::Panicked(_) => FailureKind::Panicked,
        }
    }
}

/// What a successful job left on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSuccess {
    pub output: PathBuf,
    /// True when the output already existed and nothing was fetched.
    pub skipped: bool,
}

/// Anything the scheduler can run once per attempt for a source.
#[async_trait]
pub trait JobRunner: Send + Sync + 'static {
    async fn run(&self, source: &SourceId) -> Result<JobSuccess, JobError>;
}

/// Per-batch job settings.
#[derive(Debug, Clone)]
pub struct JobSettings {
    pub kind: MediaKind,
    pub output_dir: PathBuf,
    /// Height ceiling for format selection; `None` requests the tool's best.
    pub max_height: Option<u32>,
    /// Appended to the base name of merged outputs.
    pub merged_suffix: String,
    pub audio_codec: String,
    pub audio_quality: String,
    /// Succeed without fetching when the final output already exists.
    pub skip_existing: bool,
}

impl Default for JobSettings {
    fn default() -> Self {
        Self {
            kind: MediaKind::Video,
            output_dir: PathBuf::from("downloads"),
            max_height: Some(1080),
            merged_suffix: "-merged".to_string(),
            audio_codec: "mp3".to_string(),
            audio_quality: "128K".to_string(),
            skip_existing: false,
        }
    }
}

/// Fetch job backed by a fetch tool and a mux tool.
pub struct MediaJob<F, M> {
    fetcher: F,
    muxer: M,
    settings: JobSettings,
}

impl<F, M> MediaJob<F, M>
where
    F: FetchTool,
    M: MuxTool,
{
    pub fn new(fetcher: F, muxer: M, settings: JobSettings) -> Self {
        Self {
            fetcher,
            muxer,
            settings,
        }
    }

    pub fn settings(&self) -> &JobSettings {
        &self.settings
    }

    /// Path of the final artifact for a base name.
    pub fn final_output(&self, base: &str) -> PathBuf {
        let s = &self.settings;
        match s.kind {
            MediaKind::Video => s.output_dir.join(format!("{base}{}.mp4", s.merged_suffix)),
            MediaKind::Audio => s.output_dir.join(format!("{base}.{}", s.audio_codec)),
        }
    }

    async fn base_name(&self, source: &SourceId) -> String {
        let title = match self.fetcher.resolve_title(source).await {
            Ok(t) => Some(t),
            Err(e) => {
                tracing::warn!(source = %source, "title lookup failed, naming from source: {}", e);
                None
            }
        };
        naming::base_name(title.as_deref(), source)
    }

    async fn run_video(
        &self,
        source: &SourceId,
        base: &str,
        output: PathBuf,
    ) -> Result<JobSuccess, JobError> {
        let format_id = match self.settings.max_height {
            Some(ceiling) => Some(
                format::select_for_source(&self.fetcher, source, ceiling)
                    .await?
                    .format_id,
            ),
            None => None,
        };
        let (video, audio) = fetch_streams(
            &self.fetcher,
            source,
            format_id,
            &self.settings.output_dir,
            base,
        )
        .await?;
        if !merge(&self.muxer, &video, &audio, &output).await {
            return Err(JobError::MergeToolFailure { output });
        }
        Ok(JobSuccess {
            output,
            skipped: false,
        })
    }

    async fn run_audio(&self, source: &SourceId, base: &str) -> Result<JobSuccess, JobError> {
        let s = &self.settings;
        let output = fetch_audio(
            &self.fetcher,
            source,
            &s.audio_codec,
            &s.audio_quality,
            &s.output_dir,
            base,
        )
        .await?;
        Ok(JobSuccess {
            output,
            skipped: false,
        })
    }
}

#[async_trait]
impl<F, M> JobRunner for MediaJob<F, M>
where
    F: FetchTool + 'static,
    M: MuxTool + 'static,
{
    async fn run(&self, source: &SourceId) -> Result<JobSuccess, JobError> {
        tokio::fs::create_dir_all(&self.settings.output_dir).await?;

        let base = self.base_name(source).await;
        let output = self.final_output(&base);
        if self.settings.skip_existing && tokio::fs::try_exists(&output).await.unwrap_or(false) {
            tracing::info!(source = %source, output = %output.display(), "output exists, skipping");
            return Ok(JobSuccess {
                output,
                skipped: true,
            });
        }

        match self.settings.kind {
            MediaKind::Video => self.run_video(source, &base, output).await,
            MediaKind::Audio => self.run_audio(source, &base).await,
        }
    }
}
