//! Volunteer task aggregate root and its lifecycle rules.

use super::{
    GeoPoint, Hours, TaskCompleted, TaskDetails, TaskDomainError, TaskId, TaskOperation,
    TaskStatus, TaskVersion, UserId,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

const CAPACITY_RANGE: RangeInclusive<u32> = 1..=50;
const ESTIMATE_RANGE: RangeInclusive<Hours> =
    Hours::from_hundredths(50)..=Hours::from_hundredths(10_000);

/// Parameter object for creating a new task.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTaskData {
    /// Descriptive attributes.
    pub details: TaskDetails,
    /// User who created the task.
    pub created_by: UserId,
    /// Maximum number of accepted assignments.
    pub max_volunteers: u32,
    /// Expected effort, if known.
    pub estimated_hours: Option<Hours>,
    /// Time after which the task stops accepting volunteers.
    pub deadline: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted descriptive attributes.
    pub details: TaskDetails,
    /// Persisted creator.
    pub created_by: UserId,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted capacity.
    pub max_volunteers: u32,
    /// Persisted accepted assignment count.
    pub current_volunteers: u32,
    /// Persisted assignee, if any.
    pub assigned_to: Option<UserId>,
    /// Persisted effort estimate.
    pub estimated_hours: Option<Hours>,
    /// Persisted actual effort.
    pub actual_hours: Option<Hours>,
    /// Persisted deadline.
    pub deadline: Option<DateTime<Utc>>,
    /// Persisted completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Persisted cancellation timestamp.
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
    /// Persisted concurrency version.
    pub version: TaskVersion,
}

/// Volunteer task aggregate root.
///
/// Status only moves forward along `open → assigned → in_progress →
/// completed`, or to `cancelled` before work starts. Every accepted mutation
/// advances [`VolunteerTask::version`]. Deserialization goes through
/// [`VolunteerTask::from_persisted`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PersistedTaskData")]
pub struct VolunteerTask {
    id: TaskId,
    details: TaskDetails,
    created_by: UserId,
    status: TaskStatus,
    max_volunteers: u32,
    current_volunteers: u32,
    assigned_to: Option<UserId>,
    estimated_hours: Option<Hours>,
    actual_hours: Option<Hours>,
    deadline: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    cancelled_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: TaskVersion,
}

impl VolunteerTask {
    /// Creates a new open task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidCapacity`] when capacity is outside
    /// `1..=50`, [`TaskDomainError::InvalidEstimatedHours`] when the estimate
    /// is outside `0.5..=100` hours, or [`TaskDomainError::DeadlineNotInFuture`]
    /// when the deadline is not after the current time.
    pub fn create(data: NewTaskData, clock: &impl Clock) -> Result<Self, TaskDomainError> {
        let timestamp = clock.utc();
        if !CAPACITY_RANGE.contains(&data.max_volunteers) {
            return Err(TaskDomainError::InvalidCapacity(data.max_volunteers));
        }
        if let Some(estimate) = data
            .estimated_hours
            .filter(|hours| !ESTIMATE_RANGE.contains(hours))
        {
            return Err(TaskDomainError::InvalidEstimatedHours(estimate));
        }
        if let Some(deadline) = data.deadline.filter(|deadline| *deadline <= timestamp) {
            return Err(TaskDomainError::DeadlineNotInFuture(deadline));
        }

        Ok(Self {
            id: TaskId::new(),
            details: data.details,
            created_by: data.created_by,
            status: TaskStatus::Open,
            max_volunteers: data.max_volunteers,
            current_volunteers: 0,
            assigned_to: None,
            estimated_hours: data.estimated_hours,
            actual_hours: None,
            deadline: data.deadline,
            completed_at: None,
            cancelled_at: None,
            created_at: timestamp,
            updated_at: timestamp,
            version: TaskVersion::INITIAL,
        })
    }

    /// Reconstructs a task from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InconsistentVolunteerCount`] when the stored
    /// counters violate `0 <= current_volunteers <= max_volunteers` or the
    /// capacity is zero.
    pub fn from_persisted(data: PersistedTaskData) -> Result<Self, TaskDomainError> {
        if data.max_volunteers == 0 || data.current_volunteers > data.max_volunteers {
            return Err(TaskDomainError::InconsistentVolunteerCount {
                current: data.current_volunteers,
                max: data.max_volunteers,
            });
        }

        Ok(Self {
            id: data.id,
            details: data.details,
            created_by: data.created_by,
            status: data.status,
            max_volunteers: data.max_volunteers,
            current_volunteers: data.current_volunteers,
            assigned_to: data.assigned_to,
            estimated_hours: data.estimated_hours,
            actual_hours: data.actual_hours,
            deadline: data.deadline,
            completed_at: data.completed_at,
            cancelled_at: data.cancelled_at,
            created_at: data.created_at,
            updated_at: data.updated_at,
            version: data.version,
        })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the descriptive attributes.
    #[must_use]
    pub const fn details(&self) -> &TaskDetails {
        &self.details
    }

    /// Returns the creator.
    #[must_use]
    pub const fn created_by(&self) -> &UserId {
        &self.created_by
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the capacity.
    #[must_use]
    pub const fn max_volunteers(&self) -> u32 {
        self.max_volunteers
    }

    /// Returns the number of accepted assignments.
    #[must_use]
    pub const fn current_volunteers(&self) -> u32 {
        self.current_volunteers
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assigned_to(&self) -> Option<&UserId> {
        self.assigned_to.as_ref()
    }

    /// Returns the effort estimate, if any.
    #[must_use]
    pub const fn estimated_hours(&self) -> Option<Hours> {
        self.estimated_hours
    }

    /// Returns the recorded effort, if any.
    #[must_use]
    pub const fn actual_hours(&self) -> Option<Hours> {
        self.actual_hours
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    /// Returns the completion timestamp, if completed.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the cancellation timestamp, if cancelled.
    #[must_use]
    pub const fn cancelled_at(&self) -> Option<DateTime<Utc>> {
        self.cancelled_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the concurrency version.
    #[must_use]
    pub const fn version(&self) -> TaskVersion {
        self.version
    }

    /// Returns how many more volunteers the task can accept.
    #[must_use]
    pub const fn available_slots(&self) -> u32 {
        self.max_volunteers.saturating_sub(self.current_volunteers)
    }

    /// Returns `true` when the task holds its maximum number of volunteers.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.current_volunteers >= self.max_volunteers
    }

    /// Returns `true` when the task would accept an assignment at `now`.
    #[must_use]
    pub fn is_accepting_assignments(&self, now: DateTime<Utc>) -> bool {
        self.status == TaskStatus::Open
            && !self.is_full()
            && self.deadline.is_none_or(|deadline| deadline > now)
    }

    /// Returns the great-circle distance in metres from `origin` to the task
    /// location, or `None` when the task has no location.
    #[must_use]
    pub fn distance_from(&self, origin: GeoPoint) -> Option<f64> {
        self.details
            .location()
            .map(|location| origin.distance_metres(location))
    }

    /// Binds a volunteer to the task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidState`] when the task is terminal or
    /// not open, [`TaskDomainError::CapacityExceeded`] when the task is full,
    /// or [`TaskDomainError::DeadlinePassed`] when the deadline has passed.
    pub fn assign(
        &mut self,
        volunteer_id: UserId,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        let now = clock.utc();
        if self.status.is_terminal() {
            return Err(self.invalid_state(TaskOperation::Assign));
        }
        if self.is_full() {
            return Err(TaskDomainError::CapacityExceeded {
                task_id: self.id,
                max_volunteers: self.max_volunteers,
            });
        }
        self.ensure_transition(TaskStatus::Assigned, TaskOperation::Assign)?;
        if let Some(deadline) = self.deadline.filter(|deadline| *deadline <= now) {
            return Err(TaskDomainError::DeadlinePassed {
                task_id: self.id,
                deadline,
            });
        }

        self.assigned_to = Some(volunteer_id);
        self.current_volunteers = self.current_volunteers.saturating_add(1);
        self.status = TaskStatus::Assigned;
        self.touch(now);
        Ok(())
    }

    /// Starts work on an assigned task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidState`] when the task is not
    /// assigned, or [`TaskDomainError::Forbidden`] when the requester is not
    /// the assignee.
    pub fn start(&mut self, requester: &UserId, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.ensure_transition(TaskStatus::InProgress, TaskOperation::Start)?;
        if self.assigned_to.as_ref() != Some(requester) {
            return Err(self.forbidden(requester, TaskOperation::Start));
        }

        self.status = TaskStatus::InProgress;
        self.touch(clock.utc());
        Ok(())
    }

    /// Completes a task in progress and returns the completion event.
    ///
    /// `is_moderator` is the authorisation collaborator's verdict on whether
    /// the requester holds a moderator or administrator role.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidState`] when the task is not in
    /// progress, or [`TaskDomainError::Forbidden`] when the requester is
    /// neither the assignee nor a moderator.
    pub fn complete(
        &mut self,
        requester: &UserId,
        is_moderator: bool,
        actual_hours: Option<Hours>,
        clock: &impl Clock,
    ) -> Result<TaskCompleted, TaskDomainError> {
        self.ensure_transition(TaskStatus::Completed, TaskOperation::Complete)?;
        let is_assignee = self.assigned_to.as_ref() == Some(requester);
        if !is_assignee && !is_moderator {
            return Err(self.forbidden(requester, TaskOperation::Complete));
        }
        if self.assigned_to.is_none() {
            return Err(self.invalid_state(TaskOperation::Complete));
        }

        let now = clock.utc();
        self.status = TaskStatus::Completed;
        self.completed_at = Some(now);
        if let Some(hours) = actual_hours {
            self.actual_hours = Some(hours);
        }
        self.touch(now);
        self.completion_event()
    }

    /// Cancels a task before work starts.
    ///
    /// `is_authorised` is the authorisation collaborator's verdict on whether
    /// the requester may withdraw the task (creator or moderator).
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidState`] unless the task is open or
    /// assigned, or [`TaskDomainError::Forbidden`] when not authorised.
    pub fn cancel(
        &mut self,
        requester: &UserId,
        is_authorised: bool,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_transition(TaskStatus::Cancelled, TaskOperation::Cancel)?;
        if !is_authorised {
            return Err(self.forbidden(requester, TaskOperation::Cancel));
        }

        let now = clock.utc();
        self.status = TaskStatus::Cancelled;
        self.cancelled_at = Some(now);
        self.touch(now);
        Ok(())
    }

    /// Builds the completion event for a completed task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidState`] when the task is not
    /// completed or has no assignee.
    pub fn completion_event(&self) -> Result<TaskCompleted, TaskDomainError> {
        match (&self.status, &self.assigned_to) {
            (TaskStatus::Completed, Some(volunteer_id)) => Ok(TaskCompleted {
                task_id: self.id,
                volunteer_id: volunteer_id.clone(),
                hours_worked: self
                    .actual_hours
                    .or(self.estimated_hours)
                    .unwrap_or(Hours::ZERO),
            }),
            _ => Err(self.invalid_state(TaskOperation::RepublishCompletion)),
        }
    }

    fn ensure_transition(
        &self,
        target: TaskStatus,
        operation: TaskOperation,
    ) -> Result<(), TaskDomainError> {
        if self.status.can_transition_to(target) {
            Ok(())
        } else {
            Err(self.invalid_state(operation))
        }
    }

    const fn invalid_state(&self, operation: TaskOperation) -> TaskDomainError {
        TaskDomainError::InvalidState {
            task_id: self.id,
            status: self.status,
            operation,
        }
    }

    fn forbidden(&self, requester: &UserId, operation: TaskOperation) -> TaskDomainError {
        TaskDomainError::Forbidden {
            task_id: self.id,
            user_id: requester.clone(),
            operation,
        }
    }

    const fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
        self.version = self.version.next();
    }
}

impl TryFrom<PersistedTaskData> for VolunteerTask {
    type Error = TaskDomainError;

    fn try_from(data: PersistedTaskData) -> Result<Self, Self::Error> {
        Self::from_persisted(data)
    }
}
