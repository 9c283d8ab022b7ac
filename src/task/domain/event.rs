//! Events emitted by the task lifecycle for out-of-band collaborators.

use super::{Hours, TaskId, UserId};
use serde::{Deserialize, Serialize};

/// Emitted once a task has been persisted in the completed state.
///
/// Consumers credit `volunteer_id` with `hours_worked`. Delivery is
/// at-least-once, so consumers must deduplicate on
/// `(task_id, volunteer_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskCompleted {
    /// Completed task.
    pub task_id: TaskId,
    /// Volunteer who was assigned to the task.
    pub volunteer_id: UserId,
    /// Hours to credit: actual hours, else the estimate, else zero.
    pub hours_worked: Hours,
}
