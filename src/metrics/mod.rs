//! Run counters and the final summary.
mod stats;
mod summary;


pub use stats::{Stats, StatsSnapshot};
pub use summary::RunSummary;
