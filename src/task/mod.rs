//! Volunteer task lifecycle.
//!
//! A task moves `open -> assigned -> in_progress -> completed`, and may be
//! cancelled from `open` or `assigned`. Every mutation is a versioned
//! read-modify-write, so concurrent requests cannot push a task past its
//! volunteer capacity. Completion emits a [`domain::TaskCompleted`] event for
//! out-of-band consumers. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
