use std::time::Duration;

use serde::Deserialize;

use crate::args::parsers::parse_duration_arg;
use crate::error::{AppError, AppResult, ConfigError, ValidationError};

/// Settings accepted from `curlpress.toml` / `curlpress.json`.
///
/// Every field is optional; flags given on the command line win.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub data: Option<String>,
    pub curl: Option<String>,
    #[serde(alias = "rate")]
    pub limit_rate: Option<u64>,
    #[serde(alias = "workers")]
    pub thread_num: Option<usize>,
    pub show: Option<i64>,
    pub data_separator: Option<String>,
    pub timeout: Option<DurationValue>,
    pub duration: Option<DurationValue>,
    pub verbose: Option<bool>,
    pub no_color: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self, field: &'static str) -> AppResult<Duration> {
        match self {
            DurationValue::Seconds(0) => Err(AppError::config(ConfigError::InvalidValue {
                field,
                source: ValidationError::DurationZero,
            })),
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => parse_duration_arg(text).map_err(|err| match err {
                AppError::Validation(source) => {
                    AppError::config(ConfigError::InvalidValue { field, source })
                }
                other @ (AppError::Io { .. }
                | AppError::Clap { .. }
                | AppError::Reqwest { .. }
                | AppError::Join { .. }
                | AppError::Config(_)
                | AppError::Data(_)
                | AppError::Descriptor(_)) => other,
            }),
        }
    }
}
