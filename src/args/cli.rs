use clap::{Args, Parser, Subcommand};
use std::time::Duration;

use super::parsers::{
    parse_bool_env, parse_duration_arg, parse_positive_u64, parse_positive_usize, parse_separator,
};
use super::types::{PositiveU64, PositiveUsize};

#[derive(Debug, Subcommand, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start the pressure test until interrupted
    #[command(visible_alias = "p")]
    Press,
}

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Replay a curl command against a server at a fixed rate, optionally driven by a delimited data file."
)]
pub struct PressArgs {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub options: PressOptions,
}

#[derive(Debug, Args, Clone)]
pub struct PressOptions {
    /// Data file for the run; the first line is the header, e.g. -d ./data/path.csv
    #[arg(long, short = 'd', default_value = "", global = true)]
    pub data: String,

    /// Curl command template or a file holding one, e.g. -c 'curl google.com'
    #[arg(long, short = 'c', global = true)]
    pub curl: Option<String>,

    /// Requests per second across all workers
    #[arg(
        long = "limit_rate",
        short = 'r',
        default_value = "10",
        value_parser = parse_positive_u64,
        global = true
    )]
    pub limit_rate: PositiveU64,

    /// Number of concurrent workers sending requests
    #[arg(
        long = "thread_num",
        short = 'n',
        default_value = "10",
        value_parser = parse_positive_usize,
        global = true
    )]
    pub thread_num: PositiveUsize,

    /// Log the request and response of every Nth request (<= 0 disables)
    #[arg(
        long,
        short = 's',
        default_value_t = -1,
        allow_negative_numbers = true,
        global = true
    )]
    pub show: i64,

    /// Field separator for the data file
    #[arg(
        long = "data_separator",
        default_value = ",",
        value_parser = parse_separator,
        global = true
    )]
    pub data_separator: String,

    /// Per-request timeout (supports ms/s/m/h)
    #[arg(long, default_value = "30s", value_parser = parse_duration_arg, global = true)]
    pub timeout: Duration,

    /// Stop automatically after this long (supports ms/s/m/h)
    #[arg(long, value_parser = parse_duration_arg, global = true)]
    pub duration: Option<Duration>,

    /// Enable verbose logging (sets log level to debug unless overridden by CURLPRESS_LOG/RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Path to config file (TOML/JSON). Defaults to ./curlpress.toml or ./curlpress.json if present.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Disable color output
    #[arg(
        long = "no-color",
        env = "NO_COLOR",
        value_parser = parse_bool_env,
        global = true
    )]
    pub no_color: bool,
}

impl PressOptions {
    /// Sampling interval for request/response logging, if enabled.
    #[must_use]
    pub fn show_every(&self) -> Option<PositiveU64> {
        u64::try_from(self.show)
            .ok()
            .and_then(|value| PositiveU64::try_from(value).ok())
    }

    /// Data file path, `None` when the run has no data.
    #[must_use]
    pub fn data_path(&self) -> Option<&str> {
        let path = self.data.trim();
        if path.is_empty() { None } else { Some(path) }
    }
}
