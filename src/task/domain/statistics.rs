//! Aggregate counts and derived rates across all tasks.

use super::{TaskDifficulty, TaskStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

const BASIS_POINTS_PER_UNIT: u64 = 10_000;

/// Raw task counts grouped by status and by difficulty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTally {
    by_status: BTreeMap<TaskStatus, u64>,
    by_difficulty: BTreeMap<TaskDifficulty, u64>,
}

impl TaskTally {
    /// Creates an empty tally.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one task with the given status and difficulty.
    pub fn record(&mut self, status: TaskStatus, difficulty: TaskDifficulty) {
        self.add_status(status, 1);
        self.add_difficulty(difficulty, 1);
    }

    /// Adds `count` tasks with the given status.
    pub fn add_status(&mut self, status: TaskStatus, count: u64) {
        let entry = self.by_status.entry(status).or_default();
        *entry = entry.saturating_add(count);
    }

    /// Adds `count` tasks with the given difficulty.
    pub fn add_difficulty(&mut self, difficulty: TaskDifficulty, count: u64) {
        let entry = self.by_difficulty.entry(difficulty).or_default();
        *entry = entry.saturating_add(count);
    }

    /// Returns the number of tasks in `status`.
    #[must_use]
    pub fn status_count(&self, status: TaskStatus) -> u64 {
        self.by_status.get(&status).copied().unwrap_or_default()
    }

    /// Returns the number of tasks with `difficulty`.
    #[must_use]
    pub fn difficulty_count(&self, difficulty: TaskDifficulty) -> u64 {
        self.by_difficulty.get(&difficulty).copied().unwrap_or_default()
    }

    /// Returns the total number of tasks.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.by_status.values().copied().fold(0, u64::saturating_add)
    }
}

/// Share of tasks that reached completion, in basis points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionRate(u64);

impl CompletionRate {
    /// Computes `completed / total`; zero when there are no tasks.
    #[must_use]
    pub fn from_counts(completed: u64, total: u64) -> Self {
        let scaled = completed.saturating_mul(BASIS_POINTS_PER_UNIT);
        Self(scaled.checked_div(total).unwrap_or_default())
    }

    /// Returns the rate in basis points (hundredths of a percent).
    #[must_use]
    pub const fn basis_points(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CompletionRate {
    /// Formats as a percentage with two decimal places, e.g. `33.33`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0.checked_div(100).unwrap_or_default();
        let fraction = self.0.checked_rem(100).unwrap_or_default();
        write!(f, "{whole}.{fraction:02}")
    }
}

/// Summary statistics over all tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatistics {
    /// Total number of tasks.
    pub total: u64,
    /// Underlying per-status and per-difficulty counts.
    pub tally: TaskTally,
    /// Share of tasks in the completed state.
    pub completion_rate: CompletionRate,
}

impl TaskStatistics {
    /// Derives statistics from raw counts.
    #[must_use]
    pub fn from_tally(tally: TaskTally) -> Self {
        let total = tally.total();
        let completion_rate =
            CompletionRate::from_counts(tally.status_count(TaskStatus::Completed), total);
        Self {
            total,
            tally,
            completion_rate,
        }
    }
}
