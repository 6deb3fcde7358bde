//! Worker pool and run lifecycle.
//!
//! [`Engine`] is built idle, [`Engine::start`] loads the data table and
//! spawns the workers, and [`RunningEngine`] stops and drains them.
mod config;
mod phase;
mod run;
mod state;
mod worker;

#[cfg(test)]
mod tests;

pub use config::EngineConfig;
pub use phase::EnginePhase;
pub use run::{Engine, EngineMonitor, RunningEngine};
pub use state::Sequence;
