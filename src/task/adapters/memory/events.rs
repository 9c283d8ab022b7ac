//! Event sink that records published events in memory.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::task::{
    domain::TaskCompleted,
    ports::{TaskEventSink, TaskEventSinkError, TaskEventSinkResult},
};

/// Thread-safe sink that keeps every published event in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingEventSink {
    completed: Arc<Mutex<Vec<TaskCompleted>>>,
}

impl RecordingEventSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the completion events published so far.
    #[must_use]
    pub fn completed_events(&self) -> Vec<TaskCompleted> {
        self.completed
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TaskEventSink for RecordingEventSink {
    async fn publish_completed(&self, event: &TaskCompleted) -> TaskEventSinkResult<()> {
        let mut events = self.completed.lock().map_err(|err| {
            TaskEventSinkError::delivery(std::io::Error::other(err.to_string()))
        })?;
        events.push(event.clone());
        Ok(())
    }
}
