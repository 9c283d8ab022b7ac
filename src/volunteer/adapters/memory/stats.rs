//! Mutex-guarded statistics store with an idempotency ledger.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::task::domain::{TaskId, UserId};
use crate::volunteer::{
    domain::{CompletionCredit, CreditOutcome, VolunteerStats},
    ports::{VolunteerStatsError, VolunteerStatsRepository, VolunteerStatsResult},
};

#[derive(Debug, Default)]
struct StatsState {
    totals: HashMap<UserId, VolunteerStats>,
    credited: HashSet<(TaskId, UserId)>,
}

/// Thread-safe in-memory statistics repository.
///
/// The ledger and the totals share one lock, so a credit is either fully
/// applied or not at all.
#[derive(Debug, Clone, Default)]
pub struct InMemoryVolunteerStatsRepository {
    state: Arc<Mutex<StatsState>>,
}

impl InMemoryVolunteerStatsRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> VolunteerStatsResult<MutexGuard<'_, StatsState>> {
        self.state.lock().map_err(|err| {
            VolunteerStatsError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl VolunteerStatsRepository for InMemoryVolunteerStatsRepository {
    async fn credit(&self, credit: &CompletionCredit) -> VolunteerStatsResult<CreditOutcome> {
        let mut state = self.lock()?;
        let key = (credit.task_id, credit.volunteer_id.clone());
        if state.credited.contains(&key) {
            let stats = state
                .totals
                .get(&credit.volunteer_id)
                .cloned()
                .unwrap_or_else(|| VolunteerStats::new(credit.volunteer_id.clone()));
            return Ok(CreditOutcome::AlreadyCredited(stats));
        }

        state.credited.insert(key);
        let stats = state
            .totals
            .entry(credit.volunteer_id.clone())
            .or_insert_with(|| VolunteerStats::new(credit.volunteer_id.clone()));
        stats.apply(credit);
        Ok(CreditOutcome::Credited(stats.clone()))
    }

    async fn find_by_volunteer(
        &self,
        volunteer_id: &UserId,
    ) -> VolunteerStatsResult<Option<VolunteerStats>> {
        let state = self.lock()?;
        Ok(state.totals.get(volunteer_id).cloned())
    }
}
