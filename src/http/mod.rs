//! HTTP client setup, pacing and per-request dispatch.
mod client;
mod dispatch;
mod execution;
mod rate;


pub use client::build_client;
pub use dispatch::{DispatchOutcome, Dispatcher};
pub use rate::Pacer;
