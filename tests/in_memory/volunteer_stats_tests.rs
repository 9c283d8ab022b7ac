//! Completion events flowing into volunteer statistics.

use super::helpers::{Platform, build_platform, create_open_task, platform};
use civic_tasks::config::CivicConfig;
use civic_tasks::task::{
    domain::{Hours, UserId},
    services::{AssignTaskRequest, CompleteTaskRequest, StartTaskRequest},
};
use rstest::rstest;

async fn run_to_completion(
    platform: &Platform,
    title: &str,
    volunteer: &str,
    hours: Option<Hours>,
) {
    let task = create_open_task(platform, title, 1).await;
    platform
        .tasks
        .assign(AssignTaskRequest::new(task.id(), volunteer))
        .await
        .expect("assign should succeed");
    platform
        .tasks
        .start(StartTaskRequest::new(task.id(), volunteer))
        .await
        .expect("start should succeed");
    let request = CompleteTaskRequest::new(task.id(), volunteer);
    let completion = match hours {
        Some(actual) => request.with_actual_hours(actual),
        None => request,
    };
    platform
        .tasks
        .complete(completion)
        .await
        .expect("complete should succeed");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completions_accumulate_per_volunteer(platform: Platform) {
    run_to_completion(
        &platform,
        "Litter pick in the park",
        "v1",
        Some(Hours::from_hundredths(350)),
    )
    .await;
    run_to_completion(&platform, "Deliver leaflets", "v1", None).await;
    run_to_completion(&platform, "Paint the fence", "v2", None).await;

    let first = platform
        .stats
        .stats_for(&UserId::new("v1").expect("valid id"))
        .await
        .expect("lookup should succeed");
    let second = platform
        .stats
        .stats_for(&UserId::new("v2").expect("valid id"))
        .await
        .expect("lookup should succeed");

    assert_eq!(first.tasks_completed(), 2);
    assert_eq!(first.volunteer_hours(), Hours::from_hundredths(550));
    assert_eq!(first.points(), 20);
    assert_eq!(second.tasks_completed(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn configured_points_flow_through() {
    let mut config = CivicConfig::default();
    config.lifecycle.points_per_completion = 15;
    let platform = build_platform(&config);

    run_to_completion(&platform, "Mend the footbridge", "v1", None).await;

    let totals = platform
        .stats
        .stats_for(&UserId::new("v1").expect("valid id"))
        .await
        .expect("lookup should succeed");
    assert_eq!(totals.points(), 15);
}
