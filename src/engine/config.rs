use std::path::PathBuf;
use std::time::Duration;

use crate::args::{PositiveU64, PositiveUsize, PressOptions};

/// Everything a run needs besides the request builder.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Data file; `None` sends the descriptor as-is.
    pub data_path: Option<PathBuf>,
    pub separator: String,
    /// Request descriptor template, already resolved from file or literal.
    pub descriptor: String,
    /// Global requests per second.
    pub rate: PositiveU64,
    pub workers: PositiveUsize,
    /// Log every Nth request and response.
    pub show_every: Option<PositiveU64>,
    pub request_timeout: Option<Duration>,
}

impl EngineConfig {
    #[must_use]
    pub fn new(descriptor: String, rate: PositiveU64, workers: PositiveUsize) -> Self {
        Self {
            data_path: None,
            separator: ",".to_owned(),
            descriptor,
            rate,
            workers,
            show_every: None,
            request_timeout: None,
        }
    }

    #[must_use]
    pub fn from_options(options: &PressOptions, descriptor: String) -> Self {
        Self {
            data_path: options.data_path().map(PathBuf::from),
            separator: options.data_separator.clone(),
            descriptor,
            rate: options.limit_rate,
            workers: options.thread_num,
            show_every: options.show_every(),
            request_timeout: Some(options.timeout),
        }
    }
}
