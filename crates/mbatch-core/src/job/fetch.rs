//! Fetch stage: one fetch tool invocation plus artifact discovery.

use std::path::{Path, PathBuf};

use super::artifacts::{self, StreamKind};
use super::JobError;
use crate::tool::{FetchRequest, FetchTool, FormatRequest};
use crate::types::SourceId;

/// Output template for the fetch tool. Separate streams carry the format
/// id so the video and audio files never overwrite each other.
///
/// `%` in `base` is doubled; the tool reads a lone `%` as a template field.
pub fn output_template(dir: &Path, base: &str, format: &FormatRequest) -> PathBuf {
    let base = base.replace('%', "%%");
    match format {
        FormatRequest::Video { .. } => dir.join(format!("{base}.f%(format_id)s.%(ext)s")),
        FormatRequest::Audio { .. } => dir.join(format!("{base}.%(ext)s")),
    }
}

/// Fetches separate video and audio streams and returns `(video, audio)`.
///
/// A tool failure and a "success without the expected files" are different
/// errors: [`JobError::FetchToolFailure`] vs [`JobError::MissingArtifact`].
pub async fn fetch_streams<T>(
    tool: &T,
    source: &SourceId,
    format_id: Option<String>,
    dir: &Path,
    base: &str,
) -> Result<(PathBuf, PathBuf), JobError>
where
    T: FetchTool + ?Sized,
{
    let format = FormatRequest::Video {
        format_id: format_id.clone(),
    };
    let found = invoke(tool, source, format, dir, base).await?;
    match artifacts::pick_streams(&found, base, format_id.as_deref()) {
        (Some(video), Some(audio)) => Ok((video, audio)),
        (v, a) => Err(JobError::MissingArtifact {
            base: base.to_string(),
            missing: match (v.is_none(), a.is_none()) {
                (true, true) => "video and audio streams",
                (true, false) => "video stream",
                _ => "audio stream",
            },
        }),
    }
}

/// Fetches best audio transcoded to `codec` and returns the audio file.
pub async fn fetch_audio<T>(
    tool: &T,
    source: &SourceId,
    codec: &str,
    quality: &str,
    dir: &Path,
    base: &str,
) -> Result<PathBuf, JobError>
where
    T: FetchTool + ?Sized,
{
    let format = FormatRequest::Audio {
        codec: codec.to_string(),
        quality: quality.to_string(),
    };
    let found = invoke(tool, source, format, dir, base).await?;
    artifacts::first_of(&found, StreamKind::Audio).ok_or_else(|| JobError::MissingArtifact {
        base: base.to_string(),
        missing: "audio file",
    })
}

async fn invoke<T>(
    tool: &T,
    source: &SourceId,
    format: FormatRequest,
    dir: &Path,
    base: &str,
) -> Result<Vec<PathBuf>, JobError>
where
    T: FetchTool + ?Sized,
{
    let request = FetchRequest {
        source: source.clone(),
        output_template: output_template(dir, base, &format),
        format,
    };
    tool.fetch(&request)
        .await
        .map_err(JobError::FetchToolFailure)?;
    let found = artifacts::scan(dir, base).await?;
    tracing::debug!(source = %source, files = ?found, "artifacts located");
    Ok(found)
}
