//! Request payloads accepted by the lifecycle service.
//!
//! Requests carry unvalidated caller input; the service validates it into
//! domain types before touching persistence.

use crate::task::domain::{Hours, TaskDifficulty, TaskId, TaskPriority};
use chrono::{DateTime, Utc};

/// Request payload for creating a volunteer task.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTaskRequest {
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) category_id: String,
    pub(crate) created_by: String,
    pub(crate) location: Option<(f64, f64)>,
    pub(crate) address: Option<String>,
    pub(crate) priority: TaskPriority,
    pub(crate) difficulty: TaskDifficulty,
    pub(crate) estimated_hours: Option<Hours>,
    pub(crate) max_volunteers: u32,
    pub(crate) required_skills: Vec<String>,
    pub(crate) deadline: Option<DateTime<Utc>>,
}

impl CreateTaskRequest {
    /// Creates a request with required fields, a capacity of one, and
    /// medium priority and difficulty.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category_id: impl Into<String>,
        created_by: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            category_id: category_id.into(),
            created_by: created_by.into(),
            location: None,
            address: None,
            priority: TaskPriority::default(),
            difficulty: TaskDifficulty::default(),
            estimated_hours: None,
            max_volunteers: 1,
            required_skills: Vec::new(),
            deadline: None,
        }
    }

    /// Sets the task location in degrees.
    #[must_use]
    pub const fn with_location(mut self, latitude: f64, longitude: f64) -> Self {
        self.location = Some((latitude, longitude));
        self
    }

    /// Sets the street address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the difficulty.
    #[must_use]
    pub const fn with_difficulty(mut self, difficulty: TaskDifficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Sets the effort estimate.
    #[must_use]
    pub const fn with_estimated_hours(mut self, hours: Hours) -> Self {
        self.estimated_hours = Some(hours);
        self
    }

    /// Sets the capacity.
    #[must_use]
    pub const fn with_max_volunteers(mut self, max_volunteers: u32) -> Self {
        self.max_volunteers = max_volunteers;
        self
    }

    /// Sets the required skills.
    #[must_use]
    pub fn with_required_skills(mut self, skills: impl IntoIterator<Item = String>) -> Self {
        self.required_skills = skills.into_iter().collect();
        self
    }

    /// Sets the assignment deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// Request payload for binding a volunteer to a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignTaskRequest {
    pub(crate) task_id: TaskId,
    pub(crate) volunteer_id: String,
}

impl AssignTaskRequest {
    /// Creates an assignment request.
    #[must_use]
    pub fn new(task_id: TaskId, volunteer_id: impl Into<String>) -> Self {
        Self {
            task_id,
            volunteer_id: volunteer_id.into(),
        }
    }
}

/// Request payload for starting work on an assigned task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTaskRequest {
    pub(crate) task_id: TaskId,
    pub(crate) requester: String,
}

impl StartTaskRequest {
    /// Creates a start request on behalf of `requester`.
    #[must_use]
    pub fn new(task_id: TaskId, requester: impl Into<String>) -> Self {
        Self {
            task_id,
            requester: requester.into(),
        }
    }
}

/// Request payload for completing a task in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteTaskRequest {
    pub(crate) task_id: TaskId,
    pub(crate) requester: String,
    pub(crate) is_moderator: bool,
    pub(crate) actual_hours: Option<Hours>,
}

impl CompleteTaskRequest {
    /// Creates a completion request on behalf of `requester`.
    #[must_use]
    pub fn new(task_id: TaskId, requester: impl Into<String>) -> Self {
        Self {
            task_id,
            requester: requester.into(),
            is_moderator: false,
            actual_hours: None,
        }
    }

    /// Marks the requester as holding a moderator or administrator role.
    #[must_use]
    pub const fn as_moderator(mut self) -> Self {
        self.is_moderator = true;
        self
    }

    /// Records the effort actually spent.
    #[must_use]
    pub const fn with_actual_hours(mut self, hours: Hours) -> Self {
        self.actual_hours = Some(hours);
        self
    }
}

/// Request payload for cancelling a task before work starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelTaskRequest {
    pub(crate) task_id: TaskId,
    pub(crate) requester: String,
    pub(crate) is_authorised: bool,
}

impl CancelTaskRequest {
    /// Creates a cancellation request on behalf of `requester`.
    ///
    /// The request is unauthorised until [`CancelTaskRequest::authorised`]
    /// is called.
    #[must_use]
    pub fn new(task_id: TaskId, requester: impl Into<String>) -> Self {
        Self {
            task_id,
            requester: requester.into(),
            is_authorised: false,
        }
    }

    /// Marks the requester as allowed to cancel (creator or moderator).
    #[must_use]
    pub const fn authorised(mut self) -> Self {
        self.is_authorised = true;
        self
    }
}
