//! Scheduling policy and options.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::retry::RetryPolicy;

/// How the main pass is driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchedulePolicy {
    /// Keep `concurrency` jobs in flight; start the next source as soon as
    /// any job finishes. Failures get sequential retry passes afterwards.
    #[default]
    Refill,
    /// Windows of `concurrency` jobs; a window fully completes before the
    /// next starts. Failures get sequential retry passes afterwards.
    Windowed,
    /// Each source retried in place up to `retry.max_attempts` times, under
    /// the same concurrency cap. No separate retry passes.
    PerItem,
}

impl SchedulePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            SchedulePolicy::Refill => "refill",
            SchedulePolicy::Windowed => "windowed",
            SchedulePolicy::PerItem => "per-item",
        }
    }
}

impl fmt::Display for SchedulePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchedulePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "refill" => Ok(SchedulePolicy::Refill),
            "windowed" | "window" => Ok(SchedulePolicy::Windowed),
            "per-item" | "peritem" | "per_item" => Ok(SchedulePolicy::PerItem),
            other => Err(format!(
                "unknown schedule '{other}' (expected refill, windowed or per-item)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerOptions {
    pub policy: SchedulePolicy,
    /// Upper bound on jobs in flight at once.
    pub concurrency: usize,
    /// Attempt budget per source for [`SchedulePolicy::PerItem`].
    pub retry: RetryPolicy,
    /// Sequential retry passes after the main pass (refill/windowed).
    pub retry_passes: u32,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            policy: SchedulePolicy::default(),
            concurrency: 3,
            retry: RetryPolicy::default(),
            retry_passes: 1,
        }
    }
}

impl SchedulerOptions {
    /// Attempts a source that always fails ends up with.
    pub fn max_attempts_per_source(&self) -> u32 {
        match self.policy {
            SchedulePolicy::PerItem => self.retry.max_attempts.max(1),
            SchedulePolicy::Refill | SchedulePolicy::Windowed => 1 + self.retry_passes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_policy_names() {
        assert_eq!("refill".parse::<SchedulePolicy>(), Ok(SchedulePolicy::Refill));
        assert_eq!("Windowed".parse::<SchedulePolicy>(), Ok(SchedulePolicy::Windowed));
        assert_eq!("per-item".parse::<SchedulePolicy>(), Ok(SchedulePolicy::PerItem));
        assert!("fastest".parse::<SchedulePolicy>().is_err());
    }

    #[test]
    fn attempt_budget_per_policy() {
        let mut o = SchedulerOptions::default();
        assert_eq!(o.max_attempts_per_source(), 2);
        o.policy = SchedulePolicy::PerItem;
        assert_eq!(o.max_attempts_per_source(), 3);
    }
}
