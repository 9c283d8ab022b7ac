//! `PostgreSQL` adapter for volunteer statistics.

mod repository;
mod schema;

pub use repository::PostgresVolunteerStatsRepository;
