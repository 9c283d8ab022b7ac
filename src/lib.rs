//! Civic tasks: volunteer task lifecycle for a civic issue platform.
//!
//! Citizens report civic issues and volunteers take on tasks that address
//! them. This crate owns the task lifecycle (creation, assignment, start,
//! completion, cancellation), enforces its capacity and authorisation rules
//! under concurrent requests, and credits volunteer statistics from
//! completion events.
//!
//! # Architecture
//!
//! Each feature module follows hexagonal architecture:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//! - **Services**: Orchestration over ports
//!
//! # Modules
//!
//! - [`task`]: Volunteer task state machine, queries, and statistics
//! - [`volunteer`]: Idempotent per-volunteer statistics
//! - [`config`]: Layered configuration
//! - [`telemetry`]: Tracing subscriber setup
//! - [`postgres`]: Shared connection pool plumbing

pub mod config;
pub mod postgres;
pub mod task;
pub mod telemetry;
pub mod volunteer;
