//! Domain model for volunteer statistics.

mod credit;
mod stats;

pub use credit::{CompletionCredit, CreditOutcome};
pub use stats::VolunteerStats;
