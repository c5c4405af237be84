//! Batch scheduler.
//!
//! Drives every unique source through a [`JobRunner`](crate::job::JobRunner)
//! under a concurrency cap, retries failures according to the selected
//! [`SchedulePolicy`], and classifies each source exactly once.

mod attempt;
mod outcome;
mod parallel;
mod policy;
mod progress;
mod run;


pub use outcome::SourceState;
pub use policy::{SchedulePolicy, SchedulerOptions};
pub use progress::BatchProgress;
pub use run::run_batch;
