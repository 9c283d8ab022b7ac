//! Bridges task completion events into statistics crediting.

use crate::task::{
    domain::TaskCompleted,
    ports::{TaskEventSink, TaskEventSinkError, TaskEventSinkResult},
};
use crate::volunteer::{ports::VolunteerStatsRepository, services::VolunteerStatsService};
use async_trait::async_trait;

/// Event sink that credits volunteer statistics on each completion.
///
/// Plug into [`crate::task::services::TaskLifecycleService`] so completions
/// flow straight into the statistics store.
#[derive(Clone)]
pub struct VolunteerStatsSink<R>
where
    R: VolunteerStatsRepository,
{
    service: VolunteerStatsService<R>,
}

impl<R> VolunteerStatsSink<R>
where
    R: VolunteerStatsRepository,
{
    /// Wraps a statistics service.
    #[must_use]
    pub const fn new(service: VolunteerStatsService<R>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<R> TaskEventSink for VolunteerStatsSink<R>
where
    R: VolunteerStatsRepository,
{
    async fn publish_completed(&self, event: &TaskCompleted) -> TaskEventSinkResult<()> {
        self.service
            .record_completion(event)
            .await
            .map(|_| ())
            .map_err(TaskEventSinkError::delivery)
    }
}
