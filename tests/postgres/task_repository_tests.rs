//! `PostgreSQL` integration tests for the task repository.

use std::sync::Arc;

use super::helpers::{BoxError, TestDatabase, test_runtime};
use chrono::{Duration, Utc};
use civic_tasks::task::{
    adapters::{memory::RecordingEventSink, postgres::PostgresTaskRepository},
    domain::{
        GeoPoint, Hours, NewTaskData, TaskDifficulty, TaskDomainError, TaskPriority, TaskStatus,
        UserId, VolunteerTask,
    },
    ports::{DEFAULT_RADIUS_METRES, Page, TaskQuery, TaskRepository, TaskRepositoryError},
    services::{
        AssignTaskRequest, CompleteTaskRequest, CreateTaskRequest, StartTaskRequest,
        TaskLifecycleError, TaskLifecycleService,
    },
};
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::{TestCluster, test_support::shared_test_cluster};
use rstest::rstest;
use tokio::runtime::Runtime;

type PgService = TaskLifecycleService<PostgresTaskRepository, RecordingEventSink, DefaultClock>;

/// Fields drop in declaration order, so the database goes last.
struct Context {
    service: Arc<PgService>,
    repository: Arc<PostgresTaskRepository>,
    events: Arc<RecordingEventSink>,
    runtime: Runtime,
    _database: TestDatabase,
}

impl Context {
    fn create(cluster: &'static TestCluster) -> Result<Self, BoxError> {
        let database = TestDatabase::create(cluster)?;
        let repository = Arc::new(PostgresTaskRepository::new(database.pool()?));
        let events = Arc::new(RecordingEventSink::new());
        let service = Arc::new(TaskLifecycleService::new(
            Arc::clone(&repository),
            Arc::clone(&events),
            Arc::new(DefaultClock),
        ));
        Ok(Self {
            service,
            repository,
            events,
            runtime: test_runtime()?,
            _database: database,
        })
    }
}

fn request(title: &str) -> CreateTaskRequest {
    CreateTaskRequest::new(
        title,
        "Task persisted by the PostgreSQL integration suite",
        "community",
        "organiser",
    )
}

#[rstest]
fn postgres_round_trips_task_details(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), BoxError> {
    let ctx = Context::create(shared_test_cluster)?;
    ctx.runtime.block_on(async {
        let deadline = Utc::now() + Duration::days(2);
        let created = ctx
            .service
            .create_task(
                request("Restore the mural")
                    .with_location(53.48, -2.24)
                    .with_address("Oldham Street")
                    .with_priority(TaskPriority::Urgent)
                    .with_difficulty(TaskDifficulty::Hard)
                    .with_required_skills(vec!["painting".to_owned(), "ladders".to_owned()])
                    .with_estimated_hours(Hours::from_hundredths(1250))
                    .with_max_volunteers(5)
                    .with_deadline(deadline),
            )
            .await?;

        let found = ctx
            .repository
            .find_by_id(created.id())
            .await?
            .ok_or("task should exist")?;

        assert_eq!(found.id(), created.id());
        assert_eq!(found.details().title(), created.details().title());
        assert_eq!(found.details().location(), created.details().location());
        assert_eq!(found.details().address(), Some("Oldham Street"));
        assert_eq!(found.details().priority(), TaskPriority::Urgent);
        assert_eq!(found.details().difficulty(), TaskDifficulty::Hard);
        assert_eq!(
            found.details().required_skills(),
            created.details().required_skills()
        );
        assert_eq!(found.estimated_hours(), Some(Hours::from_hundredths(1250)));
        assert_eq!(found.max_volunteers(), 5);
        assert_eq!(found.status(), TaskStatus::Open);
        assert_eq!(found.version(), created.version());
        Ok::<(), BoxError>(())
    })
}

#[rstest]
fn postgres_rejects_duplicate_store(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), BoxError> {
    let ctx = Context::create(shared_test_cluster)?;
    ctx.runtime.block_on(async {
        let created = ctx.service.create_task(request("Prune hedges")).await?;

        let result = ctx.repository.store(&created).await;

        assert!(
            matches!(result, Err(TaskRepositoryError::DuplicateTask(id)) if id == created.id())
        );
        Ok::<(), BoxError>(())
    })
}

#[rstest]
fn postgres_save_checks_version(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), BoxError> {
    let ctx = Context::create(shared_test_cluster)?;
    ctx.runtime.block_on(async {
        let created = ctx.service.create_task(request("Sweep the steps")).await?;
        let mut first = created.clone();
        first.assign(UserId::new("v1")?, &DefaultClock)?;
        ctx.repository.save(&first, created.version()).await?;

        let mut stale = created.clone();
        stale.assign(UserId::new("v2")?, &DefaultClock)?;
        let conflict = ctx.repository.save(&stale, created.version()).await;

        let never_stored = VolunteerTask::create(
            NewTaskData {
                details: created.details().clone(),
                created_by: created.created_by().clone(),
                max_volunteers: 1,
                estimated_hours: None,
                deadline: None,
            },
            &DefaultClock,
        )?;
        let unknown = ctx
            .repository
            .save(&never_stored, never_stored.version())
            .await;

        assert!(matches!(
            conflict,
            Err(TaskRepositoryError::VersionConflict { .. })
        ));
        assert!(matches!(unknown, Err(TaskRepositoryError::NotFound(_))));
        let stored = ctx
            .repository
            .find_by_id(created.id())
            .await?
            .ok_or("task should exist")?;
        assert_eq!(stored.assigned_to().map(UserId::as_str), Some("v1"));
        Ok::<(), BoxError>(())
    })
}

#[rstest]
fn postgres_concurrent_assigns_admit_one(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), BoxError> {
    let ctx = Context::create(shared_test_cluster)?;
    ctx.runtime.block_on(async {
        let created = ctx
            .service
            .create_task(request("Staff the info desk"))
            .await?;

        let handles: Vec<_> = (0..6)
            .map(|index| {
                let service = Arc::clone(&ctx.service);
                let task_id = created.id();
                tokio::spawn(async move {
                    service
                        .assign(AssignTaskRequest::new(task_id, format!("v{index}")))
                        .await
                })
            })
            .collect();
        let mut successes = 0_u32;
        for handle in handles {
            match handle.await? {
                Ok(_) => successes += 1,
                Err(TaskLifecycleError::Domain(TaskDomainError::CapacityExceeded { .. })) => {}
                Err(TaskLifecycleError::Repository(
                    TaskRepositoryError::VersionConflict { .. },
                )) => {}
                Err(other) => return Err(other.into()),
            }
        }

        let stored = ctx
            .repository
            .find_by_id(created.id())
            .await?
            .ok_or("task should exist")?;
        assert_eq!(successes, 1);
        assert_eq!(stored.current_volunteers(), 1);
        assert_eq!(stored.status(), TaskStatus::Assigned);
        Ok::<(), BoxError>(())
    })
}

#[rstest]
fn postgres_lists_and_counts(shared_test_cluster: &'static TestCluster) -> Result<(), BoxError> {
    let ctx = Context::create(shared_test_cluster)?;
    ctx.runtime.block_on(async {
        let done = ctx.service.create_task(request("Collect litter")).await?;
        ctx.service
            .create_task(request("Paint benches").with_difficulty(TaskDifficulty::Easy))
            .await?;
        ctx.service.create_task(request("Fix signage")).await?;
        ctx.service
            .assign(AssignTaskRequest::new(done.id(), "v1"))
            .await?;
        ctx.service
            .start(StartTaskRequest::new(done.id(), "v1"))
            .await?;
        ctx.service
            .complete(CompleteTaskRequest::new(done.id(), "v1"))
            .await?;

        let first_page = ctx
            .service
            .list_tasks(&TaskQuery::new().with_page(Page::new(1, 2)))
            .await?;
        let easy = ctx
            .service
            .list_tasks(&TaskQuery::new().with_difficulty(TaskDifficulty::Easy))
            .await?;
        let available = ctx.service.available_tasks(Page::default()).await?;
        let statistics = ctx.service.statistics().await?;

        assert_eq!(first_page.total_items, 3);
        assert_eq!(first_page.tasks.len(), 2);
        assert_eq!(easy.total_items, 1);
        assert_eq!(available.total_items, 2);
        assert_eq!(statistics.total, 3);
        assert_eq!(statistics.tally.status_count(TaskStatus::Completed), 1);
        assert_eq!(statistics.completion_rate.to_string(), "33.33");
        assert_eq!(ctx.events.completed_events().len(), 1);
        Ok::<(), BoxError>(())
    })
}

#[rstest]
fn postgres_proximity_filter_matches_in_memory_distance(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), BoxError> {
    let ctx = Context::create(shared_test_cluster)?;
    ctx.runtime.block_on(async {
        let near = ctx
            .service
            .create_task(request("Nearby park").with_location(42.8800, 74.5900))
            .await?;
        let edge = ctx
            .service
            .create_task(request("Edge of town").with_location(42.9200, 74.5900))
            .await?;
        ctx.service
            .create_task(request("Lakeside camp").with_location(42.4500, 76.1900))
            .await?;
        ctx.service.create_task(request("Online translation")).await?;
        let centre = GeoPoint::new(42.8746, 74.5900)?;

        let default_radius = ctx
            .service
            .list_tasks(&TaskQuery::new().near(centre, DEFAULT_RADIUS_METRES))
            .await?;
        let tight = ctx
            .service
            .list_tasks(&TaskQuery::new().near(centre, 1_000))
            .await?;

        let mut ids: Vec<_> = default_radius.tasks.iter().map(VolunteerTask::id).collect();
        ids.sort_by_key(|id| id.into_inner());
        let mut expected = vec![near.id(), edge.id()];
        expected.sort_by_key(|id| id.into_inner());
        assert_eq!(default_radius.total_items, 2);
        assert_eq!(ids, expected);
        assert_eq!(
            tight.tasks.iter().map(VolunteerTask::id).collect::<Vec<_>>(),
            vec![near.id()]
        );
        Ok::<(), BoxError>(())
    })
}
