//! Running an external tool to completion and capturing its streams.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use super::ToolError;

/// Captured result of a finished tool process.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Exit code; `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Builder for one external tool invocation.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<OsString>,
    timeout: Option<Duration>,
}

impl ToolCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Kill the process if it has not exited after `timeout`.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn tool_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string())
    }

    /// Runs the process to completion. Only launch failures and timeouts are
    /// errors here; a non-zero exit is reported through [`ToolOutput`].
    pub async fn output(&self) -> Result<ToolOutput, ToolError> {
        let tool = self.tool_name();
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::trace!(tool = %tool, args = ?self.args, "spawning tool");
        let fut = cmd.output();
        let out = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, fut).await {
                Ok(res) => res,
                Err(_) => {
                    return Err(ToolError::TimedOut {
                        tool,
                        secs: limit.as_secs(),
                    })
                }
            },
            None => fut.await,
        }
        .map_err(|source| ToolError::Spawn {
            tool: tool.clone(),
            source,
        })?;

        Ok(ToolOutput {
            code: out.status.code(),
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        })
    }

    /// Like [`output`](Self::output) but any non-zero exit becomes
    /// [`ToolError::Failed`], regardless of what was printed.
    pub async fn run_checked(&self) -> Result<ToolOutput, ToolError> {
        let out = self.output().await?;
        if !out.success() {
            return Err(ToolError::Failed {
                tool: self.tool_name(),
                code: out.code,
                detail: failure_detail(&out.stderr),
            });
        }
        Ok(out)
    }
}

/// Short diagnostic from a tool's error stream: the last `ERROR:` line if
/// any, else the last non-empty line.
pub fn failure_detail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    lines
        .iter()
        .rev()
        .find(|l| l.starts_with("ERROR:"))
        .or_else(|| lines.last())
        .map(|l| l.to_string())
        .unwrap_or_else(|| "no error output".to_string())
}

/// True when the error stream carries an `ERROR:` line (yt-dlp's failure
/// marker). Warnings and progress do not count.
pub fn stderr_signals_error(stderr: &str) -> bool {
    stderr.lines().any(|l| l.trim_start().starts_with("ERROR:"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_prefers_error_line() {
        let stderr = "WARNING: slow\nERROR: [youtube] abc: Video unavailable\nsomething after\n";
        assert_eq!(
            failure_detail(stderr),
            "ERROR: [youtube] abc: Video unavailable"
        );
    }

    #[test]
    fn detail_falls_back_to_last_line() {
        assert_eq!(failure_detail("a\n\nb\n  \n"), "b");
        assert_eq!(failure_detail(""), "no error output");
    }

    #[test]
    fn warnings_are_not_errors() {
        assert!(!stderr_signals_error("WARNING: nsig extraction failed\n"));
        assert!(stderr_signals_error("WARNING: x\nERROR: boom\n"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn captures_streams_and_exit_code() {
        let out = ToolCommand::new("sh")
            .args(["-c", "echo out; echo err 1>&2; exit 3"])
            .output()
            .await
            .unwrap();
        assert_eq!(out.code, Some(3));
        assert!(!out.success());
        assert_eq!(out.stdout.trim(), "out");
        assert_eq!(out.stderr.trim(), "err");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_is_failure_even_with_output() {
        let err = ToolCommand::new("sh")
            .args(["-c", "echo 100%; echo 'ERROR: nope' 1>&2; exit 1"])
            .run_checked()
            .await
            .unwrap_err();
        match err {
            ToolError::Failed { code, detail, .. } => {
                assert_eq!(code, Some(1));
                assert_eq!(detail, "ERROR: nope");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn timeout_kills_the_process() {
        let err = ToolCommand::new("sh")
            .args(["-c", "sleep 5"])
            .timeout(Some(Duration::from_millis(100)))
            .output()
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::TimedOut { .. }));
    }

    #[tokio::test]
    async fn missing_binary_is_spawn_error() {
        let err = ToolCommand::new("/nonexistent/mbatch-tool")
            .output()
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Spawn { .. }));
    }
}
