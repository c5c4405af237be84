//! CLI command handlers, one command per file.

mod check;
mod completions;
mod config;
mod formats;
mod run;
mod tools;

pub use check::run_check;
pub use completions::{run_completions, run_man};
pub use config::run_config;
pub use formats::run_formats;
pub use run::run_batch;
pub use tools::run_tools;
