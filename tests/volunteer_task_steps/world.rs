//! Shared world state for volunteer task lifecycle BDD scenarios.

use std::sync::Arc;

use civic_tasks::task::{
    adapters::memory::{InMemoryTaskRepository, RecordingEventSink},
    domain::{TaskId, VolunteerTask},
    services::{TaskLifecycleError, TaskLifecycleService},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestTaskService =
    TaskLifecycleService<InMemoryTaskRepository, RecordingEventSink, DefaultClock>;

/// Scenario world for volunteer task behaviour tests.
pub struct VolunteerTaskWorld {
    pub repository: Arc<InMemoryTaskRepository>,
    pub events: Arc<RecordingEventSink>,
    pub service: TestTaskService,
    pub task_id: Option<TaskId>,
    pub last_result: Option<Result<VolunteerTask, TaskLifecycleError>>,
}

impl VolunteerTaskWorld {
    /// Creates a world with no task yet.
    #[must_use]
    pub fn new() -> Self {
        let repository = Arc::new(InMemoryTaskRepository::new());
        let events = Arc::new(RecordingEventSink::new());
        let service = TaskLifecycleService::new(
            Arc::clone(&repository),
            Arc::clone(&events),
            Arc::new(DefaultClock),
        );

        Self {
            repository,
            events,
            service,
            task_id: None,
            last_result: None,
        }
    }

    /// Returns the scenario's task identifier.
    pub fn task_id(&self) -> Result<TaskId, eyre::Report> {
        self.task_id
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }

    /// Loads the current state of the scenario's task.
    pub fn current_task(&self) -> Result<VolunteerTask, eyre::Report> {
        let task_id = self.task_id()?;
        run_async(self.service.find_by_id(task_id))?
            .ok_or_else(|| eyre::eyre!("task {task_id} not found"))
    }
}

impl Default for VolunteerTaskWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> VolunteerTaskWorld {
    VolunteerTaskWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
