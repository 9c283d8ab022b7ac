//! Given steps for volunteer task lifecycle BDD scenarios.

use super::world::{VolunteerTaskWorld, run_async};
use chrono::Utc;
use civic_tasks::task::{
    domain::{
        CategoryId, Hours, PersistedTaskData, TaskDescription, TaskDetails, TaskId, TaskStatus,
        TaskTitle, TaskVersion, UserId, VolunteerTask,
    },
    ports::TaskRepository,
    services::CreateTaskRequest,
};
use eyre::WrapErr;
use rstest_bdd_macros::given;

fn seed_task(
    world: &mut VolunteerTaskWorld,
    status: TaskStatus,
    max_volunteers: u32,
    current_volunteers: u32,
    assignee: Option<&str>,
) -> Result<(), eyre::Report> {
    let now = Utc::now();
    let task = VolunteerTask::from_persisted(PersistedTaskData {
        id: TaskId::new(),
        details: TaskDetails::new(
            TaskTitle::new("Clear graffiti")?,
            TaskDescription::new("Scrub graffiti off the underpass wall")?,
            CategoryId::new("vandalism")?,
        ),
        created_by: UserId::new("creator")?,
        status,
        max_volunteers,
        current_volunteers,
        assigned_to: assignee.map(UserId::new).transpose()?,
        estimated_hours: Some(Hours::from_hundredths(200)),
        actual_hours: None,
        deadline: None,
        completed_at: (status == TaskStatus::Completed).then_some(now),
        cancelled_at: None,
        created_at: now,
        updated_at: now,
        version: TaskVersion::INITIAL,
    })?;
    run_async(world.repository.store(&task)).wrap_err("seed task for scenario")?;
    world.task_id = Some(task.id());
    Ok(())
}

#[given("an open task with capacity {capacity:u32}")]
fn open_task_with_capacity(
    world: &mut VolunteerTaskWorld,
    capacity: u32,
) -> Result<(), eyre::Report> {
    let request = CreateTaskRequest::new(
        "Clear graffiti",
        "Scrub graffiti off the underpass wall",
        "vandalism",
        "creator",
    )
    .with_max_volunteers(capacity);
    let created = run_async(world.service.create_task(request))
        .wrap_err("create task for scenario")?;
    world.task_id = Some(created.id());
    Ok(())
}

#[given("an open task that already holds {current:u32} of {capacity:u32} volunteers")]
fn fully_subscribed_open_task(
    world: &mut VolunteerTaskWorld,
    current: u32,
    capacity: u32,
) -> Result<(), eyre::Report> {
    seed_task(world, TaskStatus::Open, capacity, current, None)
}

#[given(r#"a completed task assigned to "{volunteer}""#)]
fn completed_task(world: &mut VolunteerTaskWorld, volunteer: String) -> Result<(), eyre::Report> {
    seed_task(world, TaskStatus::Completed, 1, 1, Some(volunteer.as_str()))
}
