//! Merge stage: mux separate streams, then drop the intermediates.

use std::path::Path;

use crate::tool::MuxTool;

/// Muxes `video` and `audio` into `output`.
///
/// Inputs are deleted only after the mux tool exits cleanly and `output`
/// exists; on any failure both inputs stay untouched and `false` is
/// returned.
pub async fn merge<M>(tool: &M, video: &Path, audio: &Path, output: &Path) -> bool
where
    M: MuxTool + ?Sized,
{
    if let Err(e) = tool.mux(video, audio, output).await {
        tracing::warn!(
            video = %video.display(),
            audio = %audio.display(),
            "merge failed, keeping intermediates: {}",
            e
        );
        return false;
    }
    if !tokio::fs::try_exists(output).await.unwrap_or(false) {
        tracing::warn!(
            output = %output.display(),
            "mux tool reported success but output is missing, keeping intermediates"
        );
        return false;
    }

    for input in [video, audio] {
        if let Err(e) = tokio::fs::remove_file(input).await {
            tracing::warn!(path = %input.display(), "could not remove intermediate: {}", e);
        }
    }
    tracing::debug!(output = %output.display(), "merged and removed intermediates");
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::ToolError;
    use async_trait::async_trait;

    /// Writes the output (or not) and returns the scripted result.
    struct ScriptedMux {
        write_output: bool,
        fail: bool,
    }

    #[async_trait]
    impl MuxTool for ScriptedMux {
        async fn mux(&self, _video: &Path, _audio: &Path, output: &Path) -> Result<(), ToolError> {
            if self.write_output {
                std::fs::write(output, b"merged").unwrap();
            }
            if self.fail {
                return Err(ToolError::Failed {
                    tool: "ffmpeg".into(),
                    code: Some(1),
                    detail: "Invalid data found when processing input".into(),
                });
            }
            Ok(())
        }
    }

    fn inputs(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
        let v = dir.join("t.f137.mp4");
        let a = dir.join("t.f140.m4a");
        std::fs::write(&v, b"video-bytes").unwrap();
        std::fs::write(&a, b"audio-bytes").unwrap();
        (v, a)
    }

    #[tokio::test]
    async fn success_removes_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let (v, a) = inputs(dir.path());
        let out = dir.path().join("t-merged.mp4");
        let tool = ScriptedMux {
            write_output: true,
            fail: false,
        };
        assert!(merge(&tool, &v, &a, &out).await);
        assert!(!v.exists());
        assert!(!a.exists());
        assert!(out.exists());
    }

    #[tokio::test]
    async fn failure_keeps_inputs_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let (v, a) = inputs(dir.path());
        let out = dir.path().join("t-merged.mp4");
        let tool = ScriptedMux {
            write_output: false,
            fail: true,
        };
        assert!(!merge(&tool, &v, &a, &out).await);
        assert_eq!(std::fs::read(&v).unwrap(), b"video-bytes");
        assert_eq!(std::fs::read(&a).unwrap(), b"audio-bytes");
    }

    #[tokio::test]
    async fn success_without_output_keeps_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let (v, a) = inputs(dir.path());
        let out = dir.path().join("t-merged.mp4");
        let tool = ScriptedMux {
            write_output: false,
            fail: false,
        };
        assert!(!merge(&tool, &v, &a, &out).await);
        assert!(v.exists());
        assert!(a.exists());
    }
}
