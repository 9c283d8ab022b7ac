//! Port contracts for volunteer statistics.

pub mod repository;

pub use repository::{VolunteerStatsError, VolunteerStatsRepository, VolunteerStatsResult};
