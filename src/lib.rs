//! Core library for the `curlpress` CLI.
//!
//! Replays a curl command against a server at a fixed global rate from a
//! pool of workers, optionally substituting `{{field}}` placeholders from a
//! delimited data file, and reports success/failure totals when stopped.
pub mod args;
pub mod config;
pub mod curl;
pub mod data;
pub mod engine;
pub mod entry;
pub mod error;
pub mod http;
pub mod logger;
pub mod metrics;
pub mod shutdown;
pub mod shutdown_handlers;
pub mod template;

#[cfg(test)]
mod test_support;
