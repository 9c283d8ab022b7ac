//! When steps for volunteer task lifecycle BDD scenarios.

use super::world::{VolunteerTaskWorld, run_async};
use civic_tasks::task::{
    domain::{Hours, VolunteerTask},
    services::{
        AssignTaskRequest, CancelTaskRequest, CompleteTaskRequest, StartTaskRequest,
        TaskLifecycleError,
    },
};
use rstest_bdd_macros::when;

fn record(world: &mut VolunteerTaskWorld, result: Result<VolunteerTask, TaskLifecycleError>) {
    world.last_result = Some(result);
}

#[when(r#""{volunteer}" is assigned to the task"#)]
fn assign_volunteer(world: &mut VolunteerTaskWorld, volunteer: String) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    let result = run_async(
        world
            .service
            .assign(AssignTaskRequest::new(task_id, volunteer)),
    );
    record(world, result);
    Ok(())
}

#[when(r#""{volunteer}" starts the task"#)]
fn start_task(world: &mut VolunteerTaskWorld, volunteer: String) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    let result = run_async(world.service.start(StartTaskRequest::new(task_id, volunteer)));
    record(world, result);
    Ok(())
}

#[when(r#""{volunteer}" completes the task"#)]
fn complete_task(world: &mut VolunteerTaskWorld, volunteer: String) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    let result = run_async(
        world
            .service
            .complete(CompleteTaskRequest::new(task_id, volunteer)),
    );
    record(world, result);
    Ok(())
}

#[when(r#"the task is completed by "{volunteer}" after "{hours}" hours"#)]
fn complete_task_with_hours(
    world: &mut VolunteerTaskWorld,
    volunteer: String,
    hours: String,
) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    let actual: Hours = hours
        .parse()
        .map_err(|err| eyre::eyre!("invalid hours in scenario: {err}"))?;
    let result = run_async(
        world
            .service
            .complete(CompleteTaskRequest::new(task_id, volunteer).with_actual_hours(actual)),
    );
    record(world, result);
    Ok(())
}

#[when("the creator cancels the task")]
fn creator_cancels(world: &mut VolunteerTaskWorld) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    let result = run_async(
        world
            .service
            .cancel(CancelTaskRequest::new(task_id, "creator").authorised()),
    );
    record(world, result);
    Ok(())
}

#[when(r#""{user}" cancels the task without authorisation"#)]
fn unauthorised_cancel(world: &mut VolunteerTaskWorld, user: String) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    let result = run_async(world.service.cancel(CancelTaskRequest::new(task_id, user)));
    record(world, result);
    Ok(())
}
