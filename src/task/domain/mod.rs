//! Domain model for the volunteer task lifecycle.
//!
//! The task domain models capacity-constrained assignment, the forward-only
//! status machine, and completion events while keeping all infrastructure
//! concerns outside of the domain boundary.

mod details;
mod error;
mod event;
mod hours;
mod ids;
mod statistics;
mod status;
mod task;

pub use details::{EARTH_RADIUS_METRES, GeoPoint, TaskDescription, TaskDetails, TaskTitle};
pub use error::{
    ParseDifficultyError, ParseHoursError, ParsePriorityError, ParseTaskStatusError,
    TaskDomainError,
};
pub use event::TaskCompleted;
pub use hours::Hours;
pub use ids::{CategoryId, TaskId, TaskVersion, UserId};
pub use statistics::{CompletionRate, TaskStatistics, TaskTally};
pub use status::{TaskDifficulty, TaskOperation, TaskPriority, TaskStatus};
pub use task::{NewTaskData, PersistedTaskData, VolunteerTask};
