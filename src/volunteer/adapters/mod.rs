//! Adapter implementations for volunteer statistics.

pub mod memory;
pub mod postgres;
mod sink;

pub use sink::VolunteerStatsSink;
