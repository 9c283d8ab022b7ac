//! Volunteer statistics credited from completed tasks.
//!
//! Consumes [`crate::task::domain::TaskCompleted`] events out of band and
//! credits each volunteer's completed-task count, hours, and points exactly
//! once per `(task, volunteer)` pair, however often an event is redelivered.
//! Layout mirrors [`crate::task`]:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
