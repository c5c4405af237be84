pub mod config;
pub mod logging;

pub mod format;
pub mod job;
pub mod naming;
pub mod report;
pub mod retry;
pub mod scheduler;
pub mod source_list;
pub mod tool;
pub mod types;
