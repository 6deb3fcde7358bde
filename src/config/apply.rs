use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{PositiveU64, PositiveUsize, PressOptions};
use crate::error::{AppError, AppResult, ConfigError, ValidationError};

use super::types::ConfigFile;

/// Applies configuration values to CLI arguments.
///
/// Values given on the command line (or through their env var) are kept.
///
/// # Errors
///
/// Returns an error when a config value is out of range.
pub fn apply_config(
    options: &mut PressOptions,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_cli(matches, "data")
        && let Some(data) = config.data.clone()
    {
        options.data = data;
    }

    if !is_cli(matches, "curl")
        && let Some(curl) = config.curl.clone()
    {
        options.curl = Some(curl);
    }

    if !is_cli(matches, "limit_rate")
        && let Some(rate) = config.limit_rate
    {
        options.limit_rate = ensure_positive_u64(rate, "limit_rate")?;
    }

    if !is_cli(matches, "thread_num")
        && let Some(workers) = config.thread_num
    {
        options.thread_num = ensure_positive_usize(workers, "thread_num")?;
    }

    if !is_cli(matches, "show")
        && let Some(show) = config.show
    {
        options.show = show;
    }

    if !is_cli(matches, "data_separator")
        && let Some(separator) = config.data_separator.as_ref()
    {
        if separator.is_empty() {
            return Err(invalid("data_separator", ValidationError::EmptySeparator));
        }
        separator.clone_into(&mut options.data_separator);
    }

    if !is_cli(matches, "timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        options.timeout = timeout.to_duration("timeout")?;
    }

    if !is_cli(matches, "duration")
        && let Some(duration) = config.duration.as_ref()
    {
        options.duration = Some(duration.to_duration("duration")?);
    }

    if !is_cli(matches, "verbose")
        && let Some(verbose) = config.verbose
    {
        options.verbose = verbose;
    }

    if !is_cli(matches, "no_color")
        && let Some(no_color) = config.no_color
    {
        options.no_color = no_color;
    }

    Ok(())
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches!(
        matches.value_source(name),
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    )
}

fn ensure_positive_u64(value: u64, field: &'static str) -> AppResult<PositiveU64> {
    PositiveU64::try_from(value).map_err(|err| invalid(field, err))
}

fn ensure_positive_usize(value: usize, field: &'static str) -> AppResult<PositiveUsize> {
    PositiveUsize::try_from(value).map_err(|err| invalid(field, err))
}

const fn invalid(field: &'static str, source: ValidationError) -> AppError {
    AppError::Config(ConfigError::InvalidValue { field, source })
}
