//! In-memory repository for task lifecycle tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::task::{
    domain::{TaskId, TaskTally, TaskVersion, VolunteerTask},
    ports::{TaskPage, TaskQuery, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
///
/// Version checks and writes happen under one write lock, so concurrent
/// saves of the same task serialise and all but one observe a conflict.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    tasks: Arc<RwLock<HashMap<TaskId, VolunteerTask>>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> TaskRepositoryResult<RwLockReadGuard<'_, HashMap<TaskId, VolunteerTask>>> {
        self.tasks.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> TaskRepositoryResult<RwLockWriteGuard<'_, HashMap<TaskId, VolunteerTask>>> {
        self.tasks.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &VolunteerTask) -> TaskRepositoryResult<()> {
        let mut tasks = self.write()?;
        if tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<VolunteerTask>> {
        Ok(self.read()?.get(&id).cloned())
    }

    async fn save(
        &self,
        task: &VolunteerTask,
        expected_version: TaskVersion,
    ) -> TaskRepositoryResult<()> {
        let mut tasks = self.write()?;
        let stored = tasks
            .get(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        if stored.version() != expected_version {
            return Err(TaskRepositoryError::VersionConflict {
                task_id: task.id(),
                expected: expected_version,
            });
        }
        tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn list(&self, query: &TaskQuery) -> TaskRepositoryResult<TaskPage> {
        let tasks = self.read()?;
        let mut matching: Vec<&VolunteerTask> =
            tasks.values().filter(|task| query.matches(task)).collect();
        matching.sort_by(|left, right| {
            right
                .created_at()
                .cmp(&left.created_at())
                .then_with(|| right.id().cmp(&left.id()))
        });

        let total_items = u64::try_from(matching.len()).map_err(TaskRepositoryError::persistence)?;
        let offset =
            usize::try_from(query.page.offset()).map_err(TaskRepositoryError::persistence)?;
        let size = usize::try_from(query.page.size()).map_err(TaskRepositoryError::persistence)?;
        let page_tasks = matching
            .into_iter()
            .skip(offset)
            .take(size)
            .cloned()
            .collect();

        Ok(TaskPage {
            tasks: page_tasks,
            total_items,
            page: query.page,
        })
    }

    async fn tally(&self) -> TaskRepositoryResult<TaskTally> {
        let tasks = self.read()?;
        let mut tally = TaskTally::new();
        for task in tasks.values() {
            tally.record(task.status(), task.details().difficulty());
        }
        Ok(tally)
    }
}
