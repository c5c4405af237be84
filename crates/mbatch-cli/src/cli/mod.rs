//! CLI for mbatch, the batch media fetch orchestrator.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use mbatch_core::config::{self, MbatchConfig};
use mbatch_core::scheduler::SchedulePolicy;
use mbatch_core::types::MediaKind;
use std::path::PathBuf;

use commands::{
    run_batch, run_check, run_completions, run_config, run_formats, run_man, run_tools,
};

/// Top-level CLI for mbatch.
#[derive(Debug, Parser)]
#[command(name = "mbatch")]
#[command(about = "mbatch: bounded-concurrency batch media fetcher", long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of ~/.config/mbatch/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch every source in a list file (one identifier per line).
    Run(RunArgs),

    /// Load a list file and report unique and duplicate counts without fetching.
    Check {
        /// Path to the source list.
        list: PathBuf,
    },

    /// Show the formats listed for one source and the one that would be selected.
    Formats {
        /// Source identifier (usually a URL).
        source: String,
        /// Height ceiling in pixels (default from config).
        #[arg(long, value_name = "H")]
        max_height: Option<u32>,
    },

    /// Probe the configured fetch and mux tools.
    Tools,

    /// Print the config file path and the effective configuration.
    Config,

    /// Print a shell completion script to stdout.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Print the man page (roff) to stdout.
    Man,
}

/// Flags for `mbatch run`. Every flag overrides the matching config value.
#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Path to the source list.
    pub list: PathBuf,

    /// Extract audio only (transcoded per the [audio] config section).
    #[arg(long, conflicts_with = "video")]
    pub audio: bool,

    /// Fetch video and audio streams and merge them (default).
    #[arg(long)]
    pub video: bool,

    /// Run up to N jobs concurrently.
    #[arg(long, short = 'j', value_name = "N")]
    pub jobs: Option<usize>,

    /// Height ceiling for format selection; 0 lets the fetch tool pick its best.
    #[arg(long, value_name = "H")]
    pub max_height: Option<u32>,

    /// Scheduling policy: refill, windowed or per-item.
    #[arg(long, value_name = "POLICY")]
    pub schedule: Option<SchedulePolicy>,

    /// Attempts per source under the per-item schedule.
    #[arg(long, value_name = "N")]
    pub retries: Option<u32>,

    /// Sequential retry passes after the main pass (refill and windowed).
    #[arg(long, value_name = "N")]
    pub retry_passes: Option<u32>,

    /// Directory for downloaded files (created if absent).
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Treat sources whose final file already exists as done.
    #[arg(long)]
    pub skip_existing: bool,

    /// Print the final report as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    /// Applies the flags on top of `cfg`.
    pub fn apply(&self, cfg: &mut MbatchConfig) {
        if self.audio {
            cfg.mode = MediaKind::Audio;
        } else if self.video {
            cfg.mode = MediaKind::Video;
        }
        if let Some(jobs) = self.jobs {
            cfg.max_parallel = jobs;
        }
        if let Some(h) = self.max_height {
            cfg.max_height = Some(h);
        }
        if let Some(schedule) = self.schedule {
            cfg.schedule = schedule;
        }
        if let Some(retries) = self.retries {
            cfg.retry.max_attempts = retries;
        }
        if let Some(passes) = self.retry_passes {
            cfg.retry_passes = passes;
        }
        if let Some(dir) = &self.output_dir {
            cfg.download_dir = dir.clone();
        }
        if self.skip_existing {
            cfg.skip_existing = true;
        }
    }
}

/// How a command that did not error finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Clean,
    /// Ran to the end, but some sources or tools failed.
    WithFailures,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<Completion> {
        let cli = Cli::parse();

        // Generators need no config.
        match &cli.command {
            CliCommand::Completions { shell } => {
                run_completions(*shell);
                return Ok(Completion::Clean);
            }
            CliCommand::Man => {
                run_man()?;
                return Ok(Completion::Clean);
            }
            _ => {}
        }

        let cfg = match &cli.config {
            Some(path) => config::load_from_path(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Run(args) => run_batch(&cfg, &args).await,
            CliCommand::Check { list } => {
                run_check(&list)?;
                Ok(Completion::Clean)
            }
            CliCommand::Formats { source, max_height } => {
                run_formats(&cfg, &source, max_height).await?;
                Ok(Completion::Clean)
            }
            CliCommand::Tools => Ok(run_tools(&cfg).await),
            CliCommand::Config => {
                run_config(&cfg, cli.config.as_deref())?;
                Ok(Completion::Clean)
            }
            CliCommand::Completions { .. } | CliCommand::Man => Ok(Completion::Clean),
        }
    }
}

#[cfg(test)]
mod tests;
