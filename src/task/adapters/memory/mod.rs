//! In-memory adapters for tests and embedded use.

mod events;
mod task;

pub use events::RecordingEventSink;
pub use task::InMemoryTaskRepository;
