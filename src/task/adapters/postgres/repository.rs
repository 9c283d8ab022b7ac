//! `PostgreSQL` repository implementation for volunteer task storage.

use super::{
    models::{NewTaskRow, TaskLifecycleChangeset, TaskRow},
    schema::volunteer_tasks,
};
use crate::postgres::{BlockingError, PgPool, run_blocking};
use crate::task::{
    domain::{
        CategoryId, EARTH_RADIUS_METRES, GeoPoint, Hours, PersistedTaskData, TaskDescription,
        TaskDetails, TaskDifficulty, TaskId, TaskPriority, TaskStatus, TaskTally, TaskTitle,
        TaskVersion, UserId, VolunteerTask,
    },
    ports::{TaskPage, TaskQuery, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::dsl::sql;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::{Bool, Double};

/// `PostgreSQL`-backed task repository.
///
/// Versioned saves compile to a single
/// `UPDATE ... WHERE id = $1 AND version = $2`, so the capacity check in the
/// domain and the write it guards commit atomically.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl From<BlockingError> for TaskRepositoryError {
    fn from(err: BlockingError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &VolunteerTask) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task)?;

        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(volunteer_tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<VolunteerTask>> {
        run_blocking(&self.pool, move |connection| {
            let row = volunteer_tasks::table
                .filter(volunteer_tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn save(
        &self,
        task: &VolunteerTask,
        expected_version: TaskVersion,
    ) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let changeset = to_changeset(task)?;
        let expected = version_to_column(expected_version)?;

        run_blocking(&self.pool, move |connection| {
            let updated = diesel::update(
                volunteer_tasks::table
                    .filter(volunteer_tasks::id.eq(task_id.into_inner()))
                    .filter(volunteer_tasks::version.eq(expected)),
            )
            .set(&changeset)
            .execute(connection)
            .map_err(TaskRepositoryError::persistence)?;

            if updated == 1 {
                return Ok(());
            }
            if task_exists(connection, task_id)? {
                Err(TaskRepositoryError::VersionConflict {
                    task_id,
                    expected: expected_version,
                })
            } else {
                Err(TaskRepositoryError::NotFound(task_id))
            }
        })
        .await
    }

    async fn list(&self, query: &TaskQuery) -> TaskRepositoryResult<TaskPage> {
        let owned_query = query.clone();
        run_blocking(&self.pool, move |connection| {
            let total = filtered(&owned_query)
                .count()
                .get_result::<i64>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            let limit = i64::from(owned_query.page.size());
            let offset =
                i64::try_from(owned_query.page.offset()).map_err(TaskRepositoryError::persistence)?;
            let rows = filtered(&owned_query)
                .order((volunteer_tasks::created_at.desc(), volunteer_tasks::id.desc()))
                .limit(limit)
                .offset(offset)
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;

            Ok(TaskPage {
                tasks: rows
                    .into_iter()
                    .map(row_to_task)
                    .collect::<TaskRepositoryResult<_>>()?,
                total_items: u64::try_from(total).map_err(TaskRepositoryError::persistence)?,
                page: owned_query.page,
            })
        })
        .await
    }

    async fn tally(&self) -> TaskRepositoryResult<TaskTally> {
        run_blocking(&self.pool, move |connection| {
            let status_counts = volunteer_tasks::table
                .group_by(volunteer_tasks::status)
                .select((volunteer_tasks::status, diesel::dsl::count_star()))
                .load::<(String, i64)>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            let difficulty_counts = volunteer_tasks::table
                .group_by(volunteer_tasks::difficulty)
                .select((volunteer_tasks::difficulty, diesel::dsl::count_star()))
                .load::<(String, i64)>(connection)
                .map_err(TaskRepositoryError::persistence)?;

            let mut tally = TaskTally::new();
            for (status, count) in status_counts {
                let parsed = TaskStatus::try_from(status.as_str())
                    .map_err(TaskRepositoryError::persistence)?;
                tally.add_status(
                    parsed,
                    u64::try_from(count).map_err(TaskRepositoryError::persistence)?,
                );
            }
            for (difficulty, count) in difficulty_counts {
                let parsed = TaskDifficulty::try_from(difficulty.as_str())
                    .map_err(TaskRepositoryError::persistence)?;
                tally.add_difficulty(
                    parsed,
                    u64::try_from(count).map_err(TaskRepositoryError::persistence)?,
                );
            }
            Ok(tally)
        })
        .await
    }
}

/// Builds the filtered, unordered base query for a listing.
fn filtered(query: &TaskQuery) -> volunteer_tasks::BoxedQuery<'static, Pg> {
    let mut statement = volunteer_tasks::table.into_boxed();
    if let Some(status) = query.status {
        statement = statement.filter(volunteer_tasks::status.eq(status.as_str()));
    }
    if let Some(difficulty) = query.difficulty {
        statement = statement.filter(volunteer_tasks::difficulty.eq(difficulty.as_str()));
    }
    if let Some(priority) = query.priority {
        statement = statement.filter(volunteer_tasks::priority.eq(priority.as_str()));
    }
    if let Some(category_id) = &query.category_id {
        statement =
            statement.filter(volunteer_tasks::category_id.eq(category_id.as_str().to_owned()));
    }
    if let Some(creator) = &query.created_by {
        statement =
            statement.filter(volunteer_tasks::created_by.eq(creator.as_str().to_owned()));
    }
    if let Some(assignee) = &query.assigned_to {
        statement =
            statement.filter(volunteer_tasks::assigned_to.eq(assignee.as_str().to_owned()));
    }
    if let Some(now) = query.accepting_at {
        statement = statement
            .filter(volunteer_tasks::status.eq(TaskStatus::Open.as_str()))
            .filter(volunteer_tasks::current_volunteers.lt(volunteer_tasks::max_volunteers))
            .filter(
                volunteer_tasks::deadline
                    .is_null()
                    .or(volunteer_tasks::deadline.gt(now)),
            );
    }
    if let Some(near) = query.near {
        // Haversine distance, kept in step with `GeoPoint::distance_metres`.
        let centre_latitude = near.centre.latitude();
        statement = statement.filter(
            sql::<Bool>("latitude IS NOT NULL AND longitude IS NOT NULL AND 2 * ")
                .bind::<Double, _>(EARTH_RADIUS_METRES)
                .sql(" * asin(least(1.0, sqrt(power(sin(radians(latitude - ")
                .bind::<Double, _>(centre_latitude)
                .sql(") / 2), 2) + cos(radians(")
                .bind::<Double, _>(centre_latitude)
                .sql(")) * cos(radians(latitude)) * power(sin(radians(longitude - ")
                .bind::<Double, _>(near.centre.longitude())
                .sql(") / 2), 2)))) <= ")
                .bind::<Double, _>(f64::from(near.radius_metres)),
        );
    }
    statement
}

fn task_exists(connection: &mut PgConnection, task_id: TaskId) -> TaskRepositoryResult<bool> {
    diesel::select(diesel::dsl::exists(
        volunteer_tasks::table.filter(volunteer_tasks::id.eq(task_id.into_inner())),
    ))
    .get_result::<bool>(connection)
    .map_err(TaskRepositoryError::persistence)
}

fn to_new_row(task: &VolunteerTask) -> TaskRepositoryResult<NewTaskRow> {
    let details = task.details();
    let required_skills =
        serde_json::to_value(details.required_skills()).map_err(TaskRepositoryError::persistence)?;
    let location = details.location();

    Ok(NewTaskRow {
        id: task.id().into_inner(),
        title: details.title().as_str().to_owned(),
        description: details.description().as_str().to_owned(),
        category_id: details.category_id().as_str().to_owned(),
        created_by: task.created_by().as_str().to_owned(),
        latitude: location.map(GeoPoint::latitude),
        longitude: location.map(GeoPoint::longitude),
        address: details.address().map(str::to_owned),
        priority: details.priority().as_str().to_owned(),
        difficulty: details.difficulty().as_str().to_owned(),
        required_skills,
        status: task.status().as_str().to_owned(),
        max_volunteers: count_to_column(task.max_volunteers())?,
        current_volunteers: count_to_column(task.current_volunteers())?,
        assigned_to: task.assigned_to().map(|user| user.as_str().to_owned()),
        estimated_hours_centi: task.estimated_hours().map(hours_to_column).transpose()?,
        actual_hours_centi: task.actual_hours().map(hours_to_column).transpose()?,
        deadline: task.deadline(),
        completed_at: task.completed_at(),
        cancelled_at: task.cancelled_at(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
        version: version_to_column(task.version())?,
    })
}

fn to_changeset(task: &VolunteerTask) -> TaskRepositoryResult<TaskLifecycleChangeset> {
    Ok(TaskLifecycleChangeset {
        status: task.status().as_str().to_owned(),
        current_volunteers: count_to_column(task.current_volunteers())?,
        assigned_to: task.assigned_to().map(|user| user.as_str().to_owned()),
        actual_hours_centi: task.actual_hours().map(hours_to_column).transpose()?,
        completed_at: task.completed_at(),
        cancelled_at: task.cancelled_at(),
        updated_at: task.updated_at(),
        version: version_to_column(task.version())?,
    })
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<VolunteerTask> {
    let TaskRow {
        id,
        title,
        description,
        category_id,
        created_by,
        latitude,
        longitude,
        address,
        priority,
        difficulty,
        required_skills,
        status,
        max_volunteers,
        current_volunteers,
        assigned_to,
        estimated_hours_centi,
        actual_hours_centi,
        deadline,
        completed_at,
        cancelled_at,
        created_at,
        updated_at,
        version,
    } = row;

    let skills = serde_json::from_value::<Vec<String>>(required_skills)
        .map_err(TaskRepositoryError::persistence)?;
    let mut details = TaskDetails::new(
        TaskTitle::new(title).map_err(TaskRepositoryError::persistence)?,
        TaskDescription::new(description).map_err(TaskRepositoryError::persistence)?,
        CategoryId::new(category_id).map_err(TaskRepositoryError::persistence)?,
    )
    .with_priority(
        TaskPriority::try_from(priority.as_str()).map_err(TaskRepositoryError::persistence)?,
    )
    .with_difficulty(
        TaskDifficulty::try_from(difficulty.as_str()).map_err(TaskRepositoryError::persistence)?,
    )
    .with_required_skills(skills)
    .map_err(TaskRepositoryError::persistence)?;
    if let (Some(lat), Some(lon)) = (latitude, longitude) {
        let location = GeoPoint::new(lat, lon).map_err(TaskRepositoryError::persistence)?;
        details = details.with_location(location);
    }
    if let Some(street) = address {
        details = details.with_address(street);
    }

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        details,
        created_by: UserId::new(created_by).map_err(TaskRepositoryError::persistence)?,
        status: TaskStatus::try_from(status.as_str()).map_err(TaskRepositoryError::persistence)?,
        max_volunteers: count_from_column(max_volunteers)?,
        current_volunteers: count_from_column(current_volunteers)?,
        assigned_to: assigned_to
            .map(UserId::new)
            .transpose()
            .map_err(TaskRepositoryError::persistence)?,
        estimated_hours: estimated_hours_centi.map(hours_from_column).transpose()?,
        actual_hours: actual_hours_centi.map(hours_from_column).transpose()?,
        deadline,
        completed_at,
        cancelled_at,
        created_at,
        updated_at,
        version: TaskVersion::new(
            u64::try_from(version).map_err(TaskRepositoryError::persistence)?,
        ),
    };
    VolunteerTask::from_persisted(data).map_err(TaskRepositoryError::persistence)
}

fn count_to_column(count: u32) -> TaskRepositoryResult<i32> {
    i32::try_from(count).map_err(TaskRepositoryError::persistence)
}

fn count_from_column(count: i32) -> TaskRepositoryResult<u32> {
    u32::try_from(count).map_err(TaskRepositoryError::persistence)
}

fn hours_to_column(hours: Hours) -> TaskRepositoryResult<i32> {
    i32::try_from(hours.hundredths()).map_err(TaskRepositoryError::persistence)
}

fn hours_from_column(hundredths: i32) -> TaskRepositoryResult<Hours> {
    u32::try_from(hundredths)
        .map(Hours::from_hundredths)
        .map_err(TaskRepositoryError::persistence)
}

fn version_to_column(version: TaskVersion) -> TaskRepositoryResult<i64> {
    i64::try_from(version.value()).map_err(TaskRepositoryError::persistence)
}
