//! Service layer for volunteer task creation, transitions, and queries.

use super::requests::{
    AssignTaskRequest, CancelTaskRequest, CompleteTaskRequest, CreateTaskRequest,
    StartTaskRequest,
};
use crate::task::{
    domain::{
        CategoryId, GeoPoint, NewTaskData, TaskCompleted, TaskDescription, TaskDetails,
        TaskDomainError, TaskId, TaskOperation, TaskStatistics, TaskTitle, UserId, VolunteerTask,
    },
    ports::{
        Page, TaskEventSink, TaskEventSinkError, TaskPage, TaskQuery, TaskRepository,
        TaskRepositoryError,
    },
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Number of load-mutate-save attempts made before a version conflict is
/// surfaced to the caller.
pub const DEFAULT_MAX_SAVE_ATTEMPTS: u32 = 3;

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Validation or a lifecycle rule rejected the request.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// No task exists with the given identifier.
    #[error("task {0} not found")]
    NotFound(TaskId),
    /// The task was completed and saved, but the completion event was not
    /// delivered. Use [`TaskLifecycleService::republish_completion`] to retry.
    #[error("task {task_id} completed but its completion event was not delivered: {source}")]
    EventPublication {
        /// Completed task.
        task_id: TaskId,
        /// Delivery failure.
        source: TaskEventSinkError,
    },
}

impl TaskLifecycleError {
    /// Returns `true` when retrying the same request may succeed.
    ///
    /// Business-rule violations are never retriable; exhausted version
    /// conflicts and persistence faults are.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(
            self,
            Self::Repository(
                TaskRepositoryError::VersionConflict { .. } | TaskRepositoryError::Persistence(_)
            )
        )
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// How a volunteer relates to the tasks being listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VolunteerTaskRelation {
    /// Tasks the user created.
    Created,
    /// Tasks the user is assigned to.
    Assigned,
}

/// Volunteer task lifecycle orchestration service.
///
/// Every transition loads the task, applies the domain rule, and saves with
/// the loaded version. A concurrent writer causes a version conflict, after
/// which the whole operation is re-run against fresh state.
#[derive(Clone)]
pub struct TaskLifecycleService<R, E, C>
where
    R: TaskRepository,
    E: TaskEventSink,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    events: Arc<E>,
    clock: Arc<C>,
    max_save_attempts: u32,
}

impl<R, E, C> TaskLifecycleService<R, E, C>
where
    R: TaskRepository,
    E: TaskEventSink,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, events: Arc<E>, clock: Arc<C>) -> Self {
        Self {
            repository,
            events,
            clock,
            max_save_attempts: DEFAULT_MAX_SAVE_ATTEMPTS,
        }
    }

    /// Sets how many attempts a transition makes before surfacing a version
    /// conflict. Values below one are treated as one.
    #[must_use]
    pub fn with_max_save_attempts(mut self, attempts: u32) -> Self {
        self.max_save_attempts = attempts.max(1);
        self
    }

    /// Creates a new open task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when validation fails or
    /// [`TaskLifecycleError::Repository`] when persistence rejects the task.
    pub async fn create_task(
        &self,
        request: CreateTaskRequest,
    ) -> TaskLifecycleResult<VolunteerTask> {
        let CreateTaskRequest {
            title,
            description,
            category_id,
            created_by,
            location,
            address,
            priority,
            difficulty,
            estimated_hours,
            max_volunteers,
            required_skills,
            deadline,
        } = request;

        let mut details = TaskDetails::new(
            TaskTitle::new(title)?,
            TaskDescription::new(description)?,
            CategoryId::new(category_id)?,
        )
        .with_priority(priority)
        .with_difficulty(difficulty)
        .with_required_skills(required_skills)?;
        if let Some((latitude, longitude)) = location {
            details = details.with_location(GeoPoint::new(latitude, longitude)?);
        }
        if let Some(street) = address {
            details = details.with_address(street);
        }

        let data = NewTaskData {
            details,
            created_by: UserId::new(created_by)?,
            max_volunteers,
            estimated_hours,
            deadline,
        };
        let task = VolunteerTask::create(data, &*self.clock)?;
        self.repository.store(&task).await?;
        tracing::info!(
            task_id = %task.id(),
            created_by = %task.created_by(),
            max_volunteers = task.max_volunteers(),
            "volunteer task created"
        );
        Ok(task)
    }

    /// Binds a volunteer to an open task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for unknown tasks,
    /// [`TaskDomainError::InvalidState`], [`TaskDomainError::CapacityExceeded`]
    /// or [`TaskDomainError::DeadlinePassed`] wrapped in
    /// [`TaskLifecycleError::Domain`], or repository errors once retries are
    /// exhausted.
    pub async fn assign(&self, request: AssignTaskRequest) -> TaskLifecycleResult<VolunteerTask> {
        let volunteer_id = UserId::new(request.volunteer_id)?;
        let (task, ()) = self
            .apply(request.task_id, TaskOperation::Assign, |task| {
                task.assign(volunteer_id.clone(), &*self.clock)
            })
            .await?;
        tracing::info!(
            task_id = %task.id(),
            volunteer_id = %volunteer_id,
            current_volunteers = task.current_volunteers(),
            max_volunteers = task.max_volunteers(),
            "volunteer assigned"
        );
        Ok(task)
    }

    /// Starts work on an assigned task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for unknown tasks,
    /// [`TaskDomainError::InvalidState`] or [`TaskDomainError::Forbidden`]
    /// wrapped in [`TaskLifecycleError::Domain`], or repository errors.
    pub async fn start(&self, request: StartTaskRequest) -> TaskLifecycleResult<VolunteerTask> {
        let requester = UserId::new(request.requester)?;
        let (task, ()) = self
            .apply(request.task_id, TaskOperation::Start, |task| {
                task.start(&requester, &*self.clock)
            })
            .await?;
        tracing::info!(task_id = %task.id(), volunteer_id = %requester, "task started");
        Ok(task)
    }

    /// Completes a task in progress and publishes [`TaskCompleted`].
    ///
    /// The event is published once, after the completed task is saved.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for unknown tasks,
    /// [`TaskDomainError::InvalidState`] or [`TaskDomainError::Forbidden`]
    /// wrapped in [`TaskLifecycleError::Domain`], repository errors, or
    /// [`TaskLifecycleError::EventPublication`] when the task was saved but
    /// the event could not be delivered.
    pub async fn complete(
        &self,
        request: CompleteTaskRequest,
    ) -> TaskLifecycleResult<VolunteerTask> {
        let requester = UserId::new(request.requester)?;
        let (task, event) = self
            .apply(request.task_id, TaskOperation::Complete, |task| {
                task.complete(
                    &requester,
                    request.is_moderator,
                    request.actual_hours,
                    &*self.clock,
                )
            })
            .await?;
        tracing::info!(
            task_id = %task.id(),
            completed_by = %requester,
            volunteer_id = %event.volunteer_id,
            hours_worked = %event.hours_worked,
            "task completed"
        );
        self.publish_completed(&event).await?;
        Ok(task)
    }

    /// Cancels a task before work starts.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for unknown tasks,
    /// [`TaskDomainError::InvalidState`] or [`TaskDomainError::Forbidden`]
    /// wrapped in [`TaskLifecycleError::Domain`], or repository errors.
    pub async fn cancel(&self, request: CancelTaskRequest) -> TaskLifecycleResult<VolunteerTask> {
        let requester = UserId::new(request.requester)?;
        let (task, ()) = self
            .apply(request.task_id, TaskOperation::Cancel, |task| {
                task.cancel(&requester, request.is_authorised, &*self.clock)
            })
            .await?;
        tracing::info!(task_id = %task.id(), cancelled_by = %requester, "task cancelled");
        Ok(task)
    }

    /// Publishes the completion event of a completed task again.
    ///
    /// Used to finish an out-of-band statistics update after
    /// [`TaskLifecycleError::EventPublication`]. Consumers deduplicate, so
    /// repeating this is safe.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for unknown tasks,
    /// [`TaskDomainError::InvalidState`] when the task is not completed, or
    /// [`TaskLifecycleError::EventPublication`] when delivery fails again.
    pub async fn republish_completion(
        &self,
        task_id: TaskId,
    ) -> TaskLifecycleResult<TaskCompleted> {
        let task = self.find_task_or_error(task_id).await?;
        let event = task.completion_event()?;
        self.publish_completed(&event).await?;
        tracing::info!(%task_id, volunteer_id = %event.volunteer_id, "completion republished");
        Ok(event)
    }

    /// Retrieves a task by identifier.
    ///
    /// Returns `Ok(None)` when the task does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when lookup fails.
    pub async fn find_by_id(&self, task_id: TaskId) -> TaskLifecycleResult<Option<VolunteerTask>> {
        Ok(self.repository.find_by_id(task_id).await?)
    }

    /// Lists tasks matching `query`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the listing fails.
    pub async fn list_tasks(&self, query: &TaskQuery) -> TaskLifecycleResult<TaskPage> {
        Ok(self.repository.list(query).await?)
    }

    /// Lists tasks that currently accept assignments.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the listing fails.
    pub async fn available_tasks(&self, page: Page) -> TaskLifecycleResult<TaskPage> {
        let query = TaskQuery::new().accepting_at(self.clock.utc()).with_page(page);
        self.list_tasks(&query).await
    }

    /// Lists tasks a user created or is assigned to.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] for a blank user identifier or
    /// [`TaskLifecycleError::Repository`] when the listing fails.
    pub async fn tasks_for_user(
        &self,
        user_id: &str,
        relation: VolunteerTaskRelation,
        page: Page,
    ) -> TaskLifecycleResult<TaskPage> {
        let user = UserId::new(user_id)?;
        let base = TaskQuery::new().with_page(page);
        let query = match relation {
            VolunteerTaskRelation::Created => base.created_by(user),
            VolunteerTaskRelation::Assigned => base.assigned_to(user),
        };
        self.list_tasks(&query).await
    }

    /// Computes counts by status and difficulty and the completion rate.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when counting fails.
    pub async fn statistics(&self) -> TaskLifecycleResult<TaskStatistics> {
        let tally = self.repository.tally().await?;
        Ok(TaskStatistics::from_tally(tally))
    }

    async fn find_task_or_error(&self, task_id: TaskId) -> TaskLifecycleResult<VolunteerTask> {
        self.repository
            .find_by_id(task_id)
            .await?
            .ok_or(TaskLifecycleError::NotFound(task_id))
    }

    /// Runs `mutation` against the latest stored task and saves it with the
    /// loaded version, re-running on version conflicts.
    async fn apply<T, F>(
        &self,
        task_id: TaskId,
        operation: TaskOperation,
        mut mutation: F,
    ) -> TaskLifecycleResult<(VolunteerTask, T)>
    where
        F: FnMut(&mut VolunteerTask) -> Result<T, TaskDomainError> + Send,
        T: Send,
    {
        let mut attempt: u32 = 1;
        loop {
            let mut task = self.find_task_or_error(task_id).await?;
            let expected_version = task.version();
            let outcome = mutation(&mut task)?;
            match self.repository.save(&task, expected_version).await {
                Ok(()) => return Ok((task, outcome)),
                Err(err) if err.is_version_conflict() && attempt < self.max_save_attempts => {
                    tracing::debug!(
                        %task_id,
                        %operation,
                        attempt,
                        "version conflict on save, retrying"
                    );
                    attempt = attempt.saturating_add(1);
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    async fn publish_completed(&self, event: &TaskCompleted) -> TaskLifecycleResult<()> {
        self.events.publish_completed(event).await.map_err(|source| {
            tracing::warn!(
                task_id = %event.task_id,
                volunteer_id = %event.volunteer_id,
                error = %source,
                "completion event not delivered"
            );
            TaskLifecycleError::EventPublication {
                task_id: event.task_id,
                source,
            }
        })
    }
}
