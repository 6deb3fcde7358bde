use std::time::Duration;

use super::types::{PositiveU64, PositiveUsize};
use crate::error::{AppError, AppResult, ValidationError};

pub(super) fn parse_positive_u64(s: &str) -> AppResult<PositiveU64> {
    s.parse::<PositiveU64>().map_err(AppError::from)
}

pub(super) fn parse_positive_usize(s: &str) -> AppResult<PositiveUsize> {
    s.parse::<PositiveUsize>().map_err(AppError::from)
}

pub(crate) fn parse_bool_env(s: &str) -> AppResult<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "no" | "n" | "off" => Ok(false),
        _ => Err(AppError::validation(ValidationError::InvalidBoolean {
            value: s.to_owned(),
        })),
    }
}

/// Separators are taken verbatim, surrounding whitespace included.
pub(crate) fn parse_separator(s: &str) -> AppResult<String> {
    if s.is_empty() {
        return Err(AppError::validation(ValidationError::EmptySeparator));
    }
    Ok(s.to_owned())
}

/// Parses `500ms`, `30s`, `5m`, `1h`; a bare number means seconds.
pub(crate) fn parse_duration_arg(s: &str) -> AppResult<Duration> {
    let value = s.trim();
    if value.is_empty() {
        return Err(AppError::validation(ValidationError::DurationEmpty));
    }

    let digits_len = value.chars().take_while(char::is_ascii_digit).count();
    if digits_len == 0 {
        return Err(AppError::validation(
            ValidationError::InvalidDurationFormat {
                value: value.to_owned(),
            },
        ));
    }
    let (num_part, unit_part) = value.split_at(digits_len);
    let number: u64 = num_part.parse().map_err(|err| {
        AppError::validation(ValidationError::InvalidDurationNumber {
            value: value.to_owned(),
            source: err,
        })
    })?;

    let unit = if unit_part.is_empty() { "s" } else { unit_part };
    let duration = match unit {
        "ms" => Duration::from_millis(number),
        "s" => Duration::from_secs(number),
        "m" => {
            let secs = number
                .checked_mul(60)
                .ok_or_else(|| AppError::validation(ValidationError::DurationOverflow))?;
            Duration::from_secs(secs)
        }
        "h" => {
            let secs = number
                .checked_mul(60)
                .and_then(|seconds| seconds.checked_mul(60))
                .ok_or_else(|| AppError::validation(ValidationError::DurationOverflow))?;
            Duration::from_secs(secs)
        }
        _ => {
            return Err(AppError::validation(ValidationError::InvalidDurationUnit {
                unit: unit.to_owned(),
            }));
        }
    };

    if duration.is_zero() {
        return Err(AppError::validation(ValidationError::DurationZero));
    }

    Ok(duration)
}
