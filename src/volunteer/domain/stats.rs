//! Accumulated per-volunteer statistics.

use super::CompletionCredit;
use crate::task::domain::{Hours, UserId};
use serde::{Deserialize, Serialize};

/// Totals credited to one volunteer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolunteerStats {
    volunteer_id: UserId,
    tasks_completed: u32,
    volunteer_hours: Hours,
    points: u32,
}

impl VolunteerStats {
    /// Creates zeroed statistics for a volunteer.
    #[must_use]
    pub const fn new(volunteer_id: UserId) -> Self {
        Self {
            volunteer_id,
            tasks_completed: 0,
            volunteer_hours: Hours::ZERO,
            points: 0,
        }
    }

    /// Reconstructs statistics from persisted totals.
    #[must_use]
    pub const fn from_totals(
        volunteer_id: UserId,
        tasks_completed: u32,
        volunteer_hours: Hours,
        points: u32,
    ) -> Self {
        Self {
            volunteer_id,
            tasks_completed,
            volunteer_hours,
            points,
        }
    }

    /// Returns the volunteer.
    #[must_use]
    pub const fn volunteer_id(&self) -> &UserId {
        &self.volunteer_id
    }

    /// Returns the number of completed tasks credited.
    #[must_use]
    pub const fn tasks_completed(&self) -> u32 {
        self.tasks_completed
    }

    /// Returns the accumulated hours.
    #[must_use]
    pub const fn volunteer_hours(&self) -> Hours {
        self.volunteer_hours
    }

    /// Returns the accumulated points.
    #[must_use]
    pub const fn points(&self) -> u32 {
        self.points
    }

    /// Adds one credit to the totals.
    ///
    /// Callers are responsible for applying each credit once.
    pub const fn apply(&mut self, credit: &CompletionCredit) {
        self.tasks_completed = self.tasks_completed.saturating_add(1);
        self.volunteer_hours = self.volunteer_hours.saturating_add(credit.hours);
        self.points = self.points.saturating_add(credit.points);
    }
}
