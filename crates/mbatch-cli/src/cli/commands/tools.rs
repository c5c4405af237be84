//! `mbatch tools` – probe the configured external tools.

use mbatch_core::config::MbatchConfig;
use mbatch_core::tool::probe_version;

use crate::cli::Completion;

pub async fn run_tools(cfg: &MbatchConfig) -> Completion {
    let probes = [
        ("yt-dlp", &cfg.tools.ytdlp, "--version"),
        ("ffmpeg", &cfg.tools.ffmpeg, "-version"),
    ];
    let mut missing = 0;
    for (name, program, arg) in probes {
        match probe_version(program, arg).await {
            Some(version) => println!("{:<8} {}  ({})", name, version, program.display()),
            None => {
                missing += 1;
                tracing::warn!(tool = name, program = %program.display(), "tool probe failed");
                println!("{:<8} not found  ({})", name, program.display());
            }
        }
    }
    if missing > 0 {
        Completion::WithFailures
    } else {
        Completion::Clean
    }
}
