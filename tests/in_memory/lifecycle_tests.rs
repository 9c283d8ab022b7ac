//! End-to-end lifecycle tests through the public service API.

use super::helpers::{Platform, create_open_task, platform};
use civic_tasks::task::{
    domain::{TaskDomainError, TaskStatus},
    ports::{Page, TaskQuery},
    services::{
        AssignTaskRequest, CancelTaskRequest, CompleteTaskRequest, StartTaskRequest,
        TaskLifecycleError, VolunteerTaskRelation,
    },
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn version_advances_with_each_transition(platform: Platform) {
    let task = create_open_task(&platform, "Paint the railings", 1).await;

    let assigned = platform
        .tasks
        .assign(AssignTaskRequest::new(task.id(), "v1"))
        .await
        .expect("assign should succeed");
    let started = platform
        .tasks
        .start(StartTaskRequest::new(task.id(), "v1"))
        .await
        .expect("start should succeed");
    let completed = platform
        .tasks
        .complete(CompleteTaskRequest::new(task.id(), "v1"))
        .await
        .expect("complete should succeed");

    assert!(task.version() < assigned.version());
    assert!(assigned.version() < started.version());
    assert!(started.version() < completed.version());
    assert!(completed.updated_at() >= task.created_at());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cancelled_task_leaves_available_listing(platform: Platform) {
    let keep = create_open_task(&platform, "Tidy the library garden", 1).await;
    let withdrawn = create_open_task(&platform, "Fix the noticeboard", 1).await;

    platform
        .tasks
        .cancel(CancelTaskRequest::new(withdrawn.id(), "organiser").authorised())
        .await
        .expect("cancel should succeed");
    let available = platform
        .tasks
        .available_tasks(Page::default())
        .await
        .expect("listing should succeed");
    let cancelled = platform
        .tasks
        .list_tasks(&TaskQuery::new().with_status(TaskStatus::Cancelled))
        .await
        .expect("listing should succeed");

    assert_eq!(available.tasks.iter().map(|task| task.id()).collect::<Vec<_>>(), vec![keep.id()]);
    assert_eq!(cancelled.total_items, 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn started_task_cannot_be_cancelled(platform: Platform) {
    let task = create_open_task(&platform, "Repair the play area", 1).await;
    platform
        .tasks
        .assign(AssignTaskRequest::new(task.id(), "v1"))
        .await
        .expect("assign should succeed");
    platform
        .tasks
        .start(StartTaskRequest::new(task.id(), "v1"))
        .await
        .expect("start should succeed");

    let result = platform
        .tasks
        .cancel(CancelTaskRequest::new(task.id(), "organiser").authorised())
        .await;

    assert!(matches!(
        result,
        Err(TaskLifecycleError::Domain(TaskDomainError::InvalidState {
            status: TaskStatus::InProgress,
            ..
        }))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn volunteer_sees_assigned_tasks(platform: Platform) {
    let first = create_open_task(&platform, "Water the planters", 1).await;
    create_open_task(&platform, "Sort donated books", 1).await;
    platform
        .tasks
        .assign(AssignTaskRequest::new(first.id(), "v1"))
        .await
        .expect("assign should succeed");

    let mine = platform
        .tasks
        .tasks_for_user("v1", VolunteerTaskRelation::Assigned, Page::default())
        .await
        .expect("listing should succeed");
    let organised = platform
        .tasks
        .tasks_for_user("organiser", VolunteerTaskRelation::Created, Page::default())
        .await
        .expect("listing should succeed");

    assert_eq!(mine.total_items, 1);
    assert_eq!(organised.total_items, 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn statistics_track_completion_rate(platform: Platform) {
    let done = create_open_task(&platform, "Clean the bus shelter", 1).await;
    create_open_task(&platform, "Weed the roundabout", 1).await;
    platform
        .tasks
        .assign(AssignTaskRequest::new(done.id(), "v1"))
        .await
        .expect("assign should succeed");
    platform
        .tasks
        .start(StartTaskRequest::new(done.id(), "v1"))
        .await
        .expect("start should succeed");
    platform
        .tasks
        .complete(CompleteTaskRequest::new(done.id(), "v1"))
        .await
        .expect("complete should succeed");

    let statistics = platform
        .tasks
        .statistics()
        .await
        .expect("statistics should succeed");

    assert_eq!(statistics.total, 2);
    assert_eq!(statistics.completion_rate.to_string(), "50.00");
}
