//! Service crediting completion events to volunteer statistics.

use crate::task::domain::{TaskCompleted, UserId};
use crate::volunteer::{
    domain::{CompletionCredit, CreditOutcome, VolunteerStats},
    ports::{VolunteerStatsRepository, VolunteerStatsResult},
};
use std::sync::Arc;

/// Points credited per completed task unless configured otherwise.
pub const DEFAULT_POINTS_PER_COMPLETION: u32 = 10;

/// Applies completion credits and answers statistics queries.
#[derive(Clone)]
pub struct VolunteerStatsService<R>
where
    R: VolunteerStatsRepository,
{
    repository: Arc<R>,
    points_per_completion: u32,
}

impl<R> VolunteerStatsService<R>
where
    R: VolunteerStatsRepository,
{
    /// Creates a service awarding [`DEFAULT_POINTS_PER_COMPLETION`].
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            points_per_completion: DEFAULT_POINTS_PER_COMPLETION,
        }
    }

    /// Overrides the points awarded per completed task.
    #[must_use]
    pub const fn with_points_per_completion(mut self, points: u32) -> Self {
        self.points_per_completion = points;
        self
    }

    /// Credits the volunteer named in `event`.
    ///
    /// Redelivering the same event leaves the totals unchanged and returns
    /// [`CreditOutcome::AlreadyCredited`].
    ///
    /// # Errors
    ///
    /// Returns the repository error when the credit cannot be persisted.
    pub async fn record_completion(
        &self,
        event: &TaskCompleted,
    ) -> VolunteerStatsResult<CreditOutcome> {
        let credit = CompletionCredit::from_event(event, self.points_per_completion);
        let outcome = self.repository.credit(&credit).await?;
        if outcome.is_new() {
            tracing::info!(
                task_id = %event.task_id,
                volunteer_id = %event.volunteer_id,
                hours = %event.hours_worked,
                "volunteer credited for completed task"
            );
        } else {
            tracing::debug!(
                task_id = %event.task_id,
                volunteer_id = %event.volunteer_id,
                "duplicate completion event ignored"
            );
        }
        Ok(outcome)
    }

    /// Returns a volunteer's totals, zeroed when nothing was credited yet.
    ///
    /// # Errors
    ///
    /// Returns the repository error when the lookup fails.
    pub async fn stats_for(&self, volunteer_id: &UserId) -> VolunteerStatsResult<VolunteerStats> {
        Ok(self
            .repository
            .find_by_volunteer(volunteer_id)
            .await?
            .unwrap_or_else(|| VolunteerStats::new(volunteer_id.clone())))
    }
}
