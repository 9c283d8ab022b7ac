//! `PostgreSQL` integration tests for idempotent statistics crediting.

use super::helpers::{BoxError, FixedClock, TestDatabase, test_runtime};
use chrono::{DateTime, TimeZone, Utc};
use civic_tasks::task::domain::{Hours, TaskId, UserId};
use civic_tasks::volunteer::{
    adapters::postgres::PostgresVolunteerStatsRepository,
    domain::{CompletionCredit, CreditOutcome},
    ports::VolunteerStatsRepository,
};
use diesel::prelude::*;
use diesel::sql_types::Timestamptz;
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::{TestCluster, test_support::shared_test_cluster};
use rstest::rstest;

#[derive(QueryableByName)]
struct Stamps {
    #[diesel(sql_type = Timestamptz)]
    credited_at: DateTime<Utc>,
    #[diesel(sql_type = Timestamptz)]
    updated_at: DateTime<Utc>,
}

fn credit(
    task_id: TaskId,
    volunteer: &str,
    hundredths: u32,
) -> Result<CompletionCredit, BoxError> {
    Ok(CompletionCredit {
        task_id,
        volunteer_id: UserId::new(volunteer)?,
        hours: Hours::from_hundredths(hundredths),
        points: 10,
    })
}

#[rstest]
fn postgres_credit_is_applied_once(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), BoxError> {
    let database = TestDatabase::create(shared_test_cluster)?;
    let repository = PostgresVolunteerStatsRepository::new(database.pool()?, DefaultClock);
    let first = credit(TaskId::new(), "v1", 350)?;

    test_runtime()?.block_on(async {
        let applied = repository.credit(&first).await?;
        let repeated = repository.credit(&first).await?;
        let other = repository.credit(&credit(TaskId::new(), "v1", 150)?).await?;

        assert!(applied.is_new());
        assert!(matches!(repeated, CreditOutcome::AlreadyCredited(_)));
        assert_eq!(repeated.stats(), applied.stats());
        assert_eq!(other.stats().tasks_completed(), 2);
        assert_eq!(other.stats().volunteer_hours(), Hours::from_hundredths(500));
        assert_eq!(other.stats().points(), 20);
        Ok::<(), BoxError>(())
    })
}

#[rstest]
fn postgres_unknown_volunteer_has_no_stats(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), BoxError> {
    let database = TestDatabase::create(shared_test_cluster)?;
    let repository = PostgresVolunteerStatsRepository::new(database.pool()?, DefaultClock);

    let found = test_runtime()?
        .block_on(repository.find_by_volunteer(&UserId::new("nobody")?))?;

    assert!(found.is_none());
    Ok(())
}

#[rstest]
fn postgres_credit_timestamps_come_from_the_clock(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), BoxError> {
    let database = TestDatabase::create(shared_test_cluster)?;
    let instant = Utc
        .with_ymd_and_hms(2026, 9, 1, 12, 30, 0)
        .single()
        .ok_or("unambiguous instant")?;
    let repository =
        PostgresVolunteerStatsRepository::new(database.pool()?, FixedClock(instant));

    test_runtime()?.block_on(repository.credit(&credit(TaskId::new(), "v1", 200)?))?;

    let mut conn = database.connect()?;
    let stamps: Stamps = diesel::sql_query(
        "SELECT c.credited_at, s.updated_at \
         FROM volunteer_completion_credits c \
         JOIN volunteer_stats s ON s.volunteer_id = c.volunteer_id",
    )
    .get_result(&mut conn)?;
    assert_eq!(stamps.credited_at, instant);
    assert_eq!(stamps.updated_at, instant);
    Ok(())
}
