//! In-memory statistics repository.

mod stats;

pub use stats::InMemoryVolunteerStatsRepository;
