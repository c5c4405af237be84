//! yt-dlp wrapper.

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use super::process::{failure_detail, stderr_signals_error, ToolCommand, ToolOutput};
use super::{FetchRequest, FetchTool, FormatRequest, ToolError};
use crate::types::SourceId;

/// Audio stream requested next to an explicit or default video stream.
/// Prefer m4a so the audio artifact is distinguishable by extension.
const BEST_AUDIO: &str = "ba[ext=m4a]/ba";

#[derive(Debug, Clone)]
pub struct YtDlp {
    program: PathBuf,
    ffmpeg_location: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl YtDlp {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            ffmpeg_location: None,
            timeout: None,
        }
    }

    /// Passed as `--ffmpeg-location` for audio extraction.
    pub fn with_ffmpeg_location(mut self, location: Option<PathBuf>) -> Self {
        self.ffmpeg_location = location;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn command(&self) -> ToolCommand {
        ToolCommand::new(&self.program).timeout(self.timeout)
    }

    /// Arguments for one download invocation.
    pub fn fetch_args(&self, request: &FetchRequest) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["--no-playlist".into(), "--newline".into()];
        match &request.format {
            FormatRequest::Video { format_id } => {
                let video = format_id.as_deref().unwrap_or("bv*");
                args.push("-f".into());
                args.push(format!("{video},{BEST_AUDIO}").into());
            }
            FormatRequest::Audio { codec, quality } => {
                args.extend(
                    [
                        "-f",
                        "ba",
                        "-x",
                        "--audio-format",
                        codec.as_str(),
                        "--audio-quality",
                        quality.as_str(),
                    ]
                    .into_iter()
                    .map(OsString::from),
                );
                if let Some(loc) = &self.ffmpeg_location {
                    args.push("--ffmpeg-location".into());
                    args.push(loc.clone().into_os_string());
                }
            }
        }
        args.push("-o".into());
        args.push(request.output_template.clone().into_os_string());
        args.push(request.source.as_str().into());
        args
    }

    async fn run(&self, cmd: ToolCommand) -> Result<ToolOutput, ToolError> {
        let out = cmd.run_checked().await?;
        if stderr_signals_error(&out.stderr) {
            return Err(ToolError::Reported {
                tool: "yt-dlp".to_string(),
                detail: failure_detail(&out.stderr),
            });
        }
        Ok(out)
    }
}

#[async_trait]
impl FetchTool for YtDlp {
    async fn list_formats(&self, source: &SourceId) -> Result<String, ToolError> {
        let cmd = self
            .command()
            .args(["-F", "--no-playlist"])
            .arg(source.as_str());
        Ok(self.run(cmd).await?.stdout)
    }

    async fn resolve_title(&self, source: &SourceId) -> Result<String, ToolError> {
        let cmd = self
            .command()
            .args(["-e", "--no-playlist", "--no-warnings"])
            .arg(source.as_str());
        let out = self.run(cmd).await?;
        out.stdout
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ToolError::Reported {
                tool: "yt-dlp".to_string(),
                detail: "empty title".to_string(),
            })
    }

    async fn fetch(&self, request: &FetchRequest) -> Result<(), ToolError> {
        let cmd = self.command().args(self.fetch_args(request));
        let out = self.run(cmd).await?;
        tracing::trace!(source = %request.source, stdout_len = out.stdout.len(), "yt-dlp finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    fn request(format: FormatRequest) -> FetchRequest {
        FetchRequest {
            source: SourceId::from("https://www.youtube.com/watch?v=abc"),
            output_template: PathBuf::from("/dl/Title.%(ext)s"),
            format,
        }
    }

    #[test]
    fn explicit_video_format_with_separate_audio() {
        let args = strings(YtDlp::new("yt-dlp").fetch_args(&request(FormatRequest::Video {
            format_id: Some("137".into()),
        })));
        let f = args.iter().position(|a| a == "-f").unwrap();
        assert_eq!(args[f + 1], "137,ba[ext=m4a]/ba");
        assert_eq!(args.last().unwrap(), "https://www.youtube.com/watch?v=abc");
        let o = args.iter().position(|a| a == "-o").unwrap();
        assert_eq!(args[o + 1], "/dl/Title.%(ext)s");
    }

    #[test]
    fn default_video_request() {
        let args = strings(
            YtDlp::new("yt-dlp").fetch_args(&request(FormatRequest::Video { format_id: None })),
        );
        assert!(args.contains(&"bv*,ba[ext=m4a]/ba".to_string()));
    }

    #[test]
    fn audio_extraction_args() {
        let tool = YtDlp::new("yt-dlp").with_ffmpeg_location(Some(PathBuf::from("/opt/ffmpeg")));
        let args = strings(tool.fetch_args(&request(FormatRequest::Audio {
            codec: "mp3".into(),
            quality: "128K".into(),
        })));
        assert!(args.contains(&"-x".to_string()));
        let fmt = args.iter().position(|a| a == "--audio-format").unwrap();
        assert_eq!(args[fmt + 1], "mp3");
        let q = args.iter().position(|a| a == "--audio-quality").unwrap();
        assert_eq!(args[q + 1], "128K");
        let loc = args.iter().position(|a| a == "--ffmpeg-location").unwrap();
        assert_eq!(args[loc + 1], "/opt/ffmpeg");
    }
}
