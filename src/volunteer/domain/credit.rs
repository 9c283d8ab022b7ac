//! Credits derived from completion events.

use super::VolunteerStats;
use crate::task::domain::{Hours, TaskCompleted, TaskId, UserId};
use serde::{Deserialize, Serialize};

/// One completed task's contribution to a volunteer's statistics.
///
/// `(task_id, volunteer_id)` is the idempotency key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompletionCredit {
    /// Completed task.
    pub task_id: TaskId,
    /// Credited volunteer.
    pub volunteer_id: UserId,
    /// Hours to add.
    pub hours: Hours,
    /// Points to add.
    pub points: u32,
}

impl CompletionCredit {
    /// Builds the credit for a completion event.
    #[must_use]
    pub fn from_event(event: &TaskCompleted, points: u32) -> Self {
        Self {
            task_id: event.task_id,
            volunteer_id: event.volunteer_id.clone(),
            hours: event.hours_worked,
            points,
        }
    }
}

/// Result of applying a credit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreditOutcome {
    /// The credit was new and has been added.
    Credited(VolunteerStats),
    /// The credit had been applied before; totals are unchanged.
    AlreadyCredited(VolunteerStats),
}

impl CreditOutcome {
    /// Returns the volunteer's totals after the call.
    #[must_use]
    pub const fn stats(&self) -> &VolunteerStats {
        match self {
            Self::Credited(stats) | Self::AlreadyCredited(stats) => stats,
        }
    }

    /// Returns `true` when this call changed the totals.
    #[must_use]
    pub const fn is_new(&self) -> bool {
        matches!(self, Self::Credited(_))
    }
}
