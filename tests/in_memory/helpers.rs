//! Shared builders for in-memory integration tests.

use std::sync::Arc;

use civic_tasks::config::CivicConfig;
use civic_tasks::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{Hours, VolunteerTask},
    services::{CreateTaskRequest, TaskLifecycleService},
};
use civic_tasks::volunteer::{
    adapters::{VolunteerStatsSink, memory::InMemoryVolunteerStatsRepository},
    services::VolunteerStatsService,
};
use mockable::DefaultClock;
use rstest::fixture;

/// Stats service over the in-memory store.
pub type StatsService = VolunteerStatsService<InMemoryVolunteerStatsRepository>;

/// Lifecycle service wired to credit volunteer stats on completion.
pub type WiredService = TaskLifecycleService<
    InMemoryTaskRepository,
    VolunteerStatsSink<InMemoryVolunteerStatsRepository>,
    DefaultClock,
>;

/// Lifecycle and stats services sharing one event flow.
pub struct Platform {
    pub tasks: WiredService,
    pub stats: StatsService,
}

/// Wires the services from configuration defaults.
#[fixture]
pub fn platform() -> Platform {
    build_platform(&CivicConfig::default())
}

/// Wires the services from `config`.
pub fn build_platform(config: &CivicConfig) -> Platform {
    let stats = VolunteerStatsService::new(Arc::new(InMemoryVolunteerStatsRepository::new()))
        .with_points_per_completion(config.lifecycle.points_per_completion);
    let tasks = TaskLifecycleService::new(
        Arc::new(InMemoryTaskRepository::new()),
        Arc::new(VolunteerStatsSink::new(stats.clone())),
        Arc::new(DefaultClock),
    )
    .with_max_save_attempts(config.lifecycle.max_save_attempts);
    Platform { tasks, stats }
}

/// Creates an open task with the given capacity and a two-hour estimate.
pub async fn create_open_task(platform: &Platform, title: &str, capacity: u32) -> VolunteerTask {
    platform
        .tasks
        .create_task(
            CreateTaskRequest::new(
                title,
                "Volunteer task created for integration testing",
                "community",
                "organiser",
            )
            .with_max_volunteers(capacity)
            .with_estimated_hours(Hours::from_hundredths(200)),
        )
        .await
        .expect("task creation should succeed")
}
