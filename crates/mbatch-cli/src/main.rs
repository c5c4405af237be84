use mbatch_core::logging;

mod cli;

use crate::cli::{CliCommand, Completion};

#[tokio::main]
async fn main() {
    // Log to the XDG state file; fall back to stderr when it cannot be opened.
    if let Err(e) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("log file unavailable, logging to stderr: {:#}", e);
    }

    match CliCommand::run_from_args().await {
        Ok(Completion::Clean) => {}
        Ok(Completion::WithFailures) => std::process::exit(2),
        Err(err) => {
            eprintln!("mbatch error: {:#}", err);
            std::process::exit(1);
        }
    }
}
