//! `PostgreSQL` repository for idempotent statistics crediting.

use super::schema::{volunteer_completion_credits, volunteer_stats};
use crate::postgres::{BlockingError, PgPool, run_blocking};
use crate::task::domain::{Hours, UserId};
use crate::volunteer::{
    domain::{CompletionCredit, CreditOutcome, VolunteerStats},
    ports::{VolunteerStatsError, VolunteerStatsRepository, VolunteerStatsResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use mockable::Clock;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = volunteer_stats)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct StatsRow {
    volunteer_id: String,
    tasks_completed: i32,
    volunteer_hours_centi: i64,
    points: i64,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = volunteer_completion_credits)]
struct NewCreditRow {
    task_id: uuid::Uuid,
    volunteer_id: String,
    hours_centi: i32,
    points: i32,
    credited_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = volunteer_stats)]
struct NewStatsRow {
    volunteer_id: String,
    tasks_completed: i32,
    volunteer_hours_centi: i64,
    points: i64,
    updated_at: DateTime<Utc>,
}

/// `PostgreSQL`-backed statistics repository.
///
/// The ledger insert and the totals upsert run in one transaction; a ledger
/// conflict skips the upsert. Ledger and totals timestamps come from the
/// injected clock.
#[derive(Debug, Clone)]
pub struct PostgresVolunteerStatsRepository<C: Clock + Send + Sync> {
    pool: PgPool,
    clock: C,
}

impl<C: Clock + Send + Sync> PostgresVolunteerStatsRepository<C> {
    /// Creates a new repository from a `PostgreSQL` connection pool and a
    /// clock.
    #[must_use]
    pub const fn new(pool: PgPool, clock: C) -> Self {
        Self { pool, clock }
    }
}

impl From<BlockingError> for VolunteerStatsError {
    fn from(err: BlockingError) -> Self {
        Self::persistence(err)
    }
}

impl From<DieselError> for VolunteerStatsError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl<C: Clock + Send + Sync> VolunteerStatsRepository for PostgresVolunteerStatsRepository<C> {
    async fn credit(&self, credit: &CompletionCredit) -> VolunteerStatsResult<CreditOutcome> {
        let owned = credit.clone();
        let now = self.clock.utc();
        run_blocking(&self.pool, move |connection| {
            connection.transaction::<_, VolunteerStatsError, _>(|tx| apply_credit(tx, &owned, now))
        })
        .await
    }

    async fn find_by_volunteer(
        &self,
        volunteer_id: &UserId,
    ) -> VolunteerStatsResult<Option<VolunteerStats>> {
        let key = volunteer_id.as_str().to_owned();
        run_blocking(&self.pool, move |connection| {
            let row = volunteer_stats::table
                .find(key)
                .select(StatsRow::as_select())
                .first::<StatsRow>(connection)
                .optional()?;
            row.map(row_to_stats).transpose()
        })
        .await
    }
}

fn apply_credit(
    connection: &mut PgConnection,
    credit: &CompletionCredit,
    now: DateTime<Utc>,
) -> VolunteerStatsResult<CreditOutcome> {
    let hours = credit.hours.hundredths();
    let volunteer = credit.volunteer_id.as_str().to_owned();

    let inserted = diesel::insert_into(volunteer_completion_credits::table)
        .values(&NewCreditRow {
            task_id: credit.task_id.into_inner(),
            volunteer_id: volunteer.clone(),
            hours_centi: to_i32(hours)?,
            points: to_i32(credit.points)?,
            credited_at: now,
        })
        .on_conflict_do_nothing()
        .execute(connection)?;

    if inserted == 1 {
        let hours_delta = i64::from(hours);
        let points_delta = i64::from(credit.points);
        diesel::insert_into(volunteer_stats::table)
            .values(&NewStatsRow {
                volunteer_id: volunteer.clone(),
                tasks_completed: 1,
                volunteer_hours_centi: hours_delta,
                points: points_delta,
                updated_at: now,
            })
            .on_conflict(volunteer_stats::volunteer_id)
            .do_update()
            .set((
                volunteer_stats::tasks_completed.eq(volunteer_stats::tasks_completed + 1),
                volunteer_stats::volunteer_hours_centi
                    .eq(volunteer_stats::volunteer_hours_centi + hours_delta),
                volunteer_stats::points.eq(volunteer_stats::points + points_delta),
                volunteer_stats::updated_at.eq(now),
            ))
            .execute(connection)?;
    }

    let row = volunteer_stats::table
        .find(volunteer)
        .select(StatsRow::as_select())
        .first::<StatsRow>(connection)
        .optional()?;
    let stats = match row {
        Some(found) => row_to_stats(found)?,
        None => VolunteerStats::new(credit.volunteer_id.clone()),
    };

    if inserted == 1 {
        Ok(CreditOutcome::Credited(stats))
    } else {
        Ok(CreditOutcome::AlreadyCredited(stats))
    }
}

fn row_to_stats(row: StatsRow) -> VolunteerStatsResult<VolunteerStats> {
    let volunteer_id = UserId::new(row.volunteer_id).map_err(VolunteerStatsError::persistence)?;
    let tasks_completed =
        u32::try_from(row.tasks_completed).map_err(VolunteerStatsError::persistence)?;
    let hours =
        u32::try_from(row.volunteer_hours_centi).map_err(VolunteerStatsError::persistence)?;
    let points = u32::try_from(row.points).map_err(VolunteerStatsError::persistence)?;
    Ok(VolunteerStats::from_totals(
        volunteer_id,
        tasks_completed,
        Hours::from_hundredths(hours),
        points,
    ))
}

fn to_i32(value: u32) -> VolunteerStatsResult<i32> {
    i32::try_from(value).map_err(VolunteerStatsError::persistence)
}
