//! Orchestration services for volunteer statistics.

mod stats;

pub use stats::{DEFAULT_POINTS_PER_COMPLETION, VolunteerStatsService};
