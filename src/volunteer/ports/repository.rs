//! Repository port for idempotent statistics crediting.

use crate::task::domain::UserId;
use crate::volunteer::domain::{CompletionCredit, CreditOutcome, VolunteerStats};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for statistics repository operations.
pub type VolunteerStatsResult<T> = Result<T, VolunteerStatsError>;

/// Volunteer statistics persistence contract.
#[async_trait]
pub trait VolunteerStatsRepository: Send + Sync {
    /// Applies `credit` unless a credit with the same task and volunteer was
    /// already applied.
    ///
    /// Recording the idempotency key and updating the totals are one atomic
    /// step.
    async fn credit(&self, credit: &CompletionCredit) -> VolunteerStatsResult<CreditOutcome>;

    /// Returns the totals for a volunteer, or `None` if nothing was credited.
    async fn find_by_volunteer(
        &self,
        volunteer_id: &UserId,
    ) -> VolunteerStatsResult<Option<VolunteerStats>>;
}

/// Errors returned by statistics repository implementations.
#[derive(Debug, Clone, Error)]
pub enum VolunteerStatsError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl VolunteerStatsError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
