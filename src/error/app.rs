use thiserror::Error;

use super::{ConfigError, DataError, DescriptorError, ValidationError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("CLI error: {source}")]
    Clap {
        #[from]
        source: clap::Error,
    },
    #[error("HTTP client error: {source}")]
    Reqwest {
        #[from]
        source: reqwest::Error,
    },
    #[error("Join error: {source}")]
    Join {
        #[from]
        source: tokio::task::JoinError,
    },
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Data file error: {0}")]
    Data(#[from] DataError),
    #[error("Request descriptor error: {0}")]
    Descriptor(#[from] DescriptorError),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation<E>(error: E) -> Self
    where
        E: Into<ValidationError>,
    {
        error.into().into()
    }

    pub fn config<E>(error: E) -> Self
    where
        E: Into<ConfigError>,
    {
        error.into().into()
    }

    pub fn data<E>(error: E) -> Self
    where
        E: Into<DataError>,
    {
        error.into().into()
    }

    pub fn descriptor<E>(error: E) -> Self
    where
        E: Into<DescriptorError>,
    {
        error.into().into()
    }
}
