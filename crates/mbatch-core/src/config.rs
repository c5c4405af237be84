use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::job::JobSettings;
use crate::retry::RetryPolicy;
use crate::scheduler::{SchedulePolicy, SchedulerOptions};
use crate::tool::{Ffmpeg, YtDlp};
use crate::types::MediaKind;

/// Per-source retry parameters for the per-item schedule (`[retry]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts per source (including the first).
    pub max_attempts: u32,
    /// Fixed delay between attempts in milliseconds (0 = back to back).
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 0,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            delay: Duration::from_millis(self.delay_ms),
        }
    }
}

/// External programs (`[tools]`). Bare names are looked up on `PATH`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub ytdlp: PathBuf,
    pub ffmpeg: PathBuf,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ytdlp: PathBuf::from("yt-dlp"),
            ffmpeg: PathBuf::from("ffmpeg"),
        }
    }
}

/// Audio extraction settings (`[audio]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Target codec passed to the fetch tool, e.g. "mp3".
    pub format: String,
    /// Target bitrate, e.g. "128K".
    pub quality: String,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            format: "mp3".to_string(),
            quality: "128K".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_parallel must be at least 1")]
    ZeroParallelism,
    #[error("retry.max_attempts must be at least 1")]
    ZeroAttempts,
    #[error("tools.{0} must not be empty")]
    EmptyToolPath(&'static str),
    #[error("merged_suffix must not contain a path separator")]
    SuffixWithSeparator,
}

/// Global configuration loaded from `~/.config/mbatch/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MbatchConfig {
    /// Directory all artifacts are written to (created if absent).
    pub download_dir: PathBuf,
    /// Maximum jobs in flight at once.
    pub max_parallel: usize,
    /// Height ceiling for video format selection; 0 lets the fetch tool
    /// choose its best format.
    pub max_height: Option<u32>,
    pub mode: MediaKind,
    pub schedule: SchedulePolicy,
    /// Sequential retry passes after the main pass (refill/windowed).
    pub retry_passes: u32,
    /// Appended to the base name of merged video files.
    pub merged_suffix: String,
    /// Succeed without fetching when the final output already exists.
    pub skip_existing: bool,
    /// Kill a tool invocation after this many seconds (None = wait forever).
    pub job_timeout_secs: Option<u64>,
    pub retry: RetryConfig,
    pub tools: ToolsConfig,
    pub audio: AudioConfig,
}

impl Default for MbatchConfig {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from("downloads"),
            max_parallel: 3,
            max_height: Some(1080),
            mode: MediaKind::Video,
            schedule: SchedulePolicy::Refill,
            retry_passes: 1,
            merged_suffix: "-merged".to_string(),
            skip_existing: false,
            job_timeout_secs: None,
            retry: RetryConfig::default(),
            tools: ToolsConfig::default(),
            audio: AudioConfig::default(),
        }
    }
}

impl MbatchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_parallel == 0 {
            return Err(ConfigError::ZeroParallelism);
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        if self.tools.ytdlp.as_os_str().is_empty() {
            return Err(ConfigError::EmptyToolPath("ytdlp"));
        }
        if self.tools.ffmpeg.as_os_str().is_empty() {
            return Err(ConfigError::EmptyToolPath("ffmpeg"));
        }
        if self.merged_suffix.contains(['/', '\\']) {
            return Err(ConfigError::SuffixWithSeparator);
        }
        Ok(())
    }

    pub fn job_timeout(&self) -> Option<Duration> {
        self.job_timeout_secs.map(Duration::from_secs)
    }

    pub fn job_settings(&self) -> JobSettings {
        JobSettings {
            kind: self.mode,
            output_dir: self.download_dir.clone(),
            max_height: self.max_height.filter(|h| *h > 0),
            merged_suffix: self.merged_suffix.clone(),
            audio_codec: self.audio.format.clone(),
            audio_quality: self.audio.quality.clone(),
            skip_existing: self.skip_existing,
        }
    }

    pub fn scheduler_options(&self) -> SchedulerOptions {
        SchedulerOptions {
            policy: self.schedule,
            concurrency: self.max_parallel,
            retry: self.retry.policy(),
            retry_passes: self.retry_passes,
        }
    }

    /// Fetch tool from `[tools]`. An ffmpeg given as a path (not a bare
    /// name) is forwarded so audio extraction uses the same binary.
    pub fn fetch_tool(&self) -> YtDlp {
        let ffmpeg = &self.tools.ffmpeg;
        let location = (ffmpeg.components().count() > 1).then(|| ffmpeg.clone());
        YtDlp::new(&self.tools.ytdlp)
            .with_ffmpeg_location(location)
            .with_timeout(self.job_timeout())
    }

    pub fn mux_tool(&self) -> Ffmpeg {
        Ffmpeg::new(&self.tools.ffmpeg).with_timeout(self.job_timeout())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("mbatch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<MbatchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = MbatchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

/// Load and validate configuration from an explicit file.
pub fn load_from_path(path: &Path) -> Result<MbatchConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: MbatchConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}
