//! Error types for task domain validation, parsing, and lifecycle rules.

use super::{Hours, TaskId, TaskOperation, TaskStatus, UserId};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors returned while constructing or mutating volunteer tasks.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TaskDomainError {
    /// The user identifier is empty after trimming.
    #[error("user identifier must not be empty")]
    EmptyUserId,

    /// The category identifier is empty after trimming.
    #[error("category identifier must not be empty")]
    EmptyCategoryId,

    /// The title length is outside the accepted range.
    #[error("task title must be between 5 and 200 characters, got {0}")]
    InvalidTitleLength(usize),

    /// The description length is outside the accepted range.
    #[error("task description must be between 10 and 2000 characters, got {0}")]
    InvalidDescriptionLength(usize),

    /// A required skill is empty after trimming.
    #[error("required skills must not be empty")]
    EmptySkill,

    /// Coordinates are outside the valid latitude/longitude range.
    #[error("invalid coordinates ({latitude}, {longitude})")]
    InvalidCoordinates {
        /// Requested latitude in degrees.
        latitude: f64,
        /// Requested longitude in degrees.
        longitude: f64,
    },

    /// The volunteer capacity is outside `1..=50`.
    #[error("maximum volunteers must be between 1 and 50, got {0}")]
    InvalidCapacity(u32),

    /// The estimated effort is outside `0.5..=100` hours.
    #[error("estimated hours must be between 0.50 and 100.00, got {0}")]
    InvalidEstimatedHours(Hours),

    /// A new task was given a deadline that has already passed.
    #[error("deadline {0} must be in the future")]
    DeadlineNotInFuture(DateTime<Utc>),

    /// Persisted volunteer counters violate the capacity invariant.
    #[error("inconsistent volunteer count {current} for capacity {max}")]
    InconsistentVolunteerCount {
        /// Persisted accepted assignment count.
        current: u32,
        /// Persisted capacity.
        max: u32,
    },

    /// The operation is not permitted from the task's current status.
    #[error("cannot {operation} task {task_id} in status {status}")]
    InvalidState {
        /// Task identifier.
        task_id: TaskId,
        /// Status the task was in.
        status: TaskStatus,
        /// Operation that was rejected.
        operation: TaskOperation,
    },

    /// The task already holds its maximum number of volunteers.
    #[error("task {task_id} already has its maximum of {max_volunteers} volunteers")]
    CapacityExceeded {
        /// Task identifier.
        task_id: TaskId,
        /// Task capacity.
        max_volunteers: u32,
    },

    /// The caller lacks the relationship or role the operation requires.
    #[error("user {user_id} may not {operation} task {task_id}")]
    Forbidden {
        /// Task identifier.
        task_id: TaskId,
        /// Caller that was rejected.
        user_id: UserId,
        /// Operation that was rejected.
        operation: TaskOperation,
    },

    /// The task deadline has passed, so it no longer accepts assignments.
    #[error("task {task_id} stopped accepting volunteers at {deadline}")]
    DeadlinePassed {
        /// Task identifier.
        task_id: TaskId,
        /// Deadline that has passed.
        deadline: DateTime<Utc>,
    },
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing task priorities.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParsePriorityError(pub String);

/// Error returned while parsing task difficulties.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task difficulty: {0}")]
pub struct ParseDifficultyError(pub String);

/// Error returned while parsing decimal hour values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid hours value '{0}', expected a non-negative decimal with at most two places")]
pub struct ParseHoursError(pub String);
