//! Port contracts for the volunteer task lifecycle.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod events;
pub mod query;
pub mod repository;

pub use events::{TaskEventSink, TaskEventSinkError, TaskEventSinkResult};
pub use query::{DEFAULT_RADIUS_METRES, Page, Proximity, TaskPage, TaskQuery};
pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
