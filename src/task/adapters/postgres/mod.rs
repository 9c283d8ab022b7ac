//! `PostgreSQL` adapters for volunteer task persistence.

mod models;
mod repository;
mod schema;

pub use repository::PostgresTaskRepository;
