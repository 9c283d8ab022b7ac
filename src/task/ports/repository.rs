//! Repository port for task persistence with optimistic concurrency.

use super::{TaskPage, TaskQuery};
use crate::task::domain::{TaskId, TaskTally, TaskVersion, VolunteerTask};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn store(&self, task: &VolunteerTask) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<VolunteerTask>>;

    /// Replaces a stored task if its stored version still equals
    /// `expected_version`.
    ///
    /// The comparison and the write are a single atomic step.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist
    /// or [`TaskRepositoryError::VersionConflict`] when another writer saved
    /// first.
    async fn save(
        &self,
        task: &VolunteerTask,
        expected_version: TaskVersion,
    ) -> TaskRepositoryResult<()>;

    /// Returns the page of tasks matching `query`, newest first.
    async fn list(&self, query: &TaskQuery) -> TaskRepositoryResult<TaskPage>;

    /// Counts all tasks by status and difficulty.
    async fn tally(&self) -> TaskRepositoryResult<TaskTally>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The stored version no longer matches the version the caller loaded.
    #[error("task {task_id} was modified concurrently (expected version {expected})")]
    VersionConflict {
        /// Task identifier.
        task_id: TaskId,
        /// Version the caller expected to replace.
        expected: TaskVersion,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Returns `true` for conflicts that a re-read and retry can resolve.
    #[must_use]
    pub const fn is_version_conflict(&self) -> bool {
        matches!(self, Self::VersionConflict { .. })
    }
}
