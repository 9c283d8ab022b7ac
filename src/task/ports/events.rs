//! Event sink port for lifecycle events consumed out of band.

use crate::task::domain::TaskCompleted;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for event sink operations.
pub type TaskEventSinkResult<T> = Result<T, TaskEventSinkError>;

/// Receives lifecycle events after the task change has been persisted.
#[async_trait]
pub trait TaskEventSink: Send + Sync {
    /// Delivers a completion event.
    ///
    /// Delivery may be repeated for the same task, so consumers must treat
    /// the event idempotently.
    ///
    /// # Errors
    ///
    /// Returns [`TaskEventSinkError`] when the event could not be delivered.
    async fn publish_completed(&self, event: &TaskCompleted) -> TaskEventSinkResult<()>;
}

/// Errors returned by event sink implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskEventSinkError {
    /// The downstream consumer rejected or failed to receive the event.
    #[error("event delivery failed: {0}")]
    Delivery(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskEventSinkError {
    /// Wraps a delivery error.
    pub fn delivery(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Delivery(Arc::new(err))
    }
}
