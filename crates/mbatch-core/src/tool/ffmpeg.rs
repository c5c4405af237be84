//! ffmpeg wrapper: mux a video-only and an audio-only file.

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::process::ToolCommand;
use super::{MuxTool, ToolError};

#[derive(Debug, Clone)]
pub struct Ffmpeg {
    program: PathBuf,
    timeout: Option<Duration>,
}

impl Ffmpeg {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Video stream copied as-is, audio re-encoded to AAC, output overwritten.
    pub fn mux_args(video: &Path, audio: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-hide_banner".into(), "-loglevel".into(), "error".into()];
        args.push("-i".into());
        args.push(video.as_os_str().to_owned());
        args.push("-i".into());
        args.push(audio.as_os_str().to_owned());
        args.extend(
            ["-map", "0:v:0", "-map", "1:a:0", "-c:v", "copy", "-c:a", "aac", "-y"]
                .into_iter()
                .map(OsString::from),
        );
        args.push(output.as_os_str().to_owned());
        args
    }
}

#[async_trait]
impl MuxTool for Ffmpeg {
    async fn mux(&self, video: &Path, audio: &Path, output: &Path) -> Result<(), ToolError> {
        ToolCommand::new(&self.program)
            .timeout(self.timeout)
            .args(Self::mux_args(video, audio, output))
            .run_checked()
            .await?;
        Ok(())
    }
}
