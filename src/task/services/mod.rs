//! Application services for volunteer task lifecycle orchestration.

mod lifecycle;
mod requests;

pub use lifecycle::{
    DEFAULT_MAX_SAVE_ATTEMPTS, TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService,
    VolunteerTaskRelation,
};
pub use requests::{
    AssignTaskRequest, CancelTaskRequest, CompleteTaskRequest, CreateTaskRequest,
    StartTaskRequest,
};
