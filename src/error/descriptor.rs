use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("Request descriptor is empty.")]
    Empty,
    #[error("Unterminated {quote} quote in request descriptor.")]
    UnterminatedQuote { quote: char },
    #[error("Trailing backslash in request descriptor.")]
    TrailingEscape,
    #[error("Unknown curl option '{option}'.")]
    UnknownOption { option: String },
    #[error("Option '{option}' requires a value.")]
    MissingValue { option: String },
    #[error("Request descriptor has no URL.")]
    MissingUrl,
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Invalid HTTP method '{method}'.")]
    InvalidMethod { method: String },
    #[error("Invalid header '{value}'. Expected 'Key: Value'.")]
    InvalidHeader { value: String },
    #[error("Invalid max-time '{value}'.")]
    InvalidMaxTime { value: String },
    #[error("Failed to read data file '{path}': {source}")]
    ReadBodyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to build request: {source}")]
    Build {
        #[source]
        source: reqwest::Error,
    },
    #[error("{descriptor} can not be parsed as a curl command nor read as a file: {source}")]
    Unreadable {
        descriptor: String,
        #[source]
        source: std::io::Error,
    },
}
