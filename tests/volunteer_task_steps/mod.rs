//! Step definitions for volunteer task lifecycle scenarios.

pub mod given;
pub mod when;
pub mod world;
