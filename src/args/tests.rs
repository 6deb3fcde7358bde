use std::time::Duration;

use super::parsers::{parse_bool_env, parse_duration_arg, parse_separator};
use super::test_support::parse_test_args;
use super::{Command, PositiveU64, PositiveUsize};
use crate::error::{AppError, AppResult, ValidationError};

#[test]
fn parse_args_defaults() -> AppResult<()> {
    let args = parse_test_args(["curlpress", "press"])?;
    if args.command != Some(Command::Press) {
        return Err(AppError::validation("Expected press subcommand"));
    }
    let options = args.options;
    if options.limit_rate.get() != 10 {
        return Err(AppError::validation("Unexpected default limit_rate"));
    }
    if options.thread_num.get() != 10 {
        return Err(AppError::validation("Unexpected default thread_num"));
    }
    if options.show != -1 || options.show_every().is_some() {
        return Err(AppError::validation("Unexpected default show"));
    }
    if options.data_separator != "," {
        return Err(AppError::validation("Unexpected default separator"));
    }
    if options.timeout != Duration::from_secs(30) {
        return Err(AppError::validation("Unexpected default timeout"));
    }
    if options.duration.is_some() || options.curl.is_some() || options.data_path().is_some() {
        return Err(AppError::validation("Unexpected optional defaults"));
    }
    Ok(())
}

#[test]
fn parse_args_short_flags_before_alias() -> AppResult<()> {
    let args = parse_test_args([
        "curlpress",
        "-d",
        "./data.csv",
        "-c",
        "curl http://localhost/",
        "-r",
        "50",
        "-n",
        "4",
        "-s",
        "100",
        "p",
    ])?;
    if args.command != Some(Command::Press) {
        return Err(AppError::validation("Expected press via alias"));
    }
    let options = args.options;
    if options.data_path() != Some("./data.csv") {
        return Err(AppError::validation("Unexpected data path"));
    }
    if options.curl.as_deref() != Some("curl http://localhost/") {
        return Err(AppError::validation("Unexpected curl"));
    }
    if options.limit_rate.get() != 50 || options.thread_num.get() != 4 {
        return Err(AppError::validation("Unexpected rate or workers"));
    }
    match options.show_every() {
        Some(every) if every.get() == 100 => Ok(()),
        _ => Err(AppError::validation("Unexpected show interval")),
    }
}

#[test]
fn parse_args_flags_after_subcommand() -> AppResult<()> {
    let args = parse_test_args([
        "curlpress",
        "press",
        "--limit_rate",
        "7",
        "--thread_num",
        "2",
        "--data_separator",
        "|",
        "--duration",
        "2s",
    ])?;
    let options = args.options;
    if options.limit_rate.get() != 7 || options.thread_num.get() != 2 {
        return Err(AppError::validation("Global flags not applied"));
    }
    if options.data_separator != "|" {
        return Err(AppError::validation("Unexpected separator"));
    }
    if options.duration != Some(Duration::from_secs(2)) {
        return Err(AppError::validation("Unexpected duration"));
    }
    Ok(())
}

#[test]
fn parse_args_without_subcommand() -> AppResult<()> {
    let args = parse_test_args(["curlpress", "-c", "curl localhost"])?;
    if args.command.is_some() {
        return Err(AppError::validation("Expected no subcommand"));
    }
    Ok(())
}

#[test]
fn parse_args_rejects_zero_rate() -> AppResult<()> {
    match parse_test_args(["curlpress", "-r", "0", "press"]) {
        Err(AppError::Clap { .. }) => Ok(()),
        Err(err) => Err(AppError::validation(format!("Unexpected error: {}", err))),
        Ok(_) => Err(AppError::validation("Expected zero rate to be rejected")),
    }
}

#[test]
fn parse_args_rejects_zero_workers() -> AppResult<()> {
    if parse_test_args(["curlpress", "-n", "0", "press"]).is_ok() {
        return Err(AppError::validation("Expected zero workers to be rejected"));
    }
    Ok(())
}

#[test]
fn parse_args_rejects_empty_separator() -> AppResult<()> {
    if parse_test_args(["curlpress", "--data_separator", "", "press"]).is_ok() {
        return Err(AppError::validation("Expected empty separator to be rejected"));
    }
    Ok(())
}

#[test]
fn show_zero_disables_sampling() -> AppResult<()> {
    let args = parse_test_args(["curlpress", "-s", "0", "press"])?;
    if args.options.show_every().is_some() {
        return Err(AppError::validation("Expected sampling disabled"));
    }
    Ok(())
}

#[test]
fn parse_duration_units() -> AppResult<()> {
    let cases = [
        ("250ms", Duration::from_millis(250)),
        ("5", Duration::from_secs(5)),
        ("3s", Duration::from_secs(3)),
        ("2m", Duration::from_secs(120)),
        ("1h", Duration::from_secs(3600)),
    ];
    for (input, expected) in cases {
        let parsed = parse_duration_arg(input)?;
        if parsed != expected {
            return Err(AppError::validation(format!(
                "Unexpected duration for {}: {:?}",
                input, parsed
            )));
        }
    }
    Ok(())
}

#[test]
fn parse_duration_rejects_bad_input() -> AppResult<()> {
    for input in ["", "ms", "0s", "10d", "x5"] {
        if parse_duration_arg(input).is_ok() {
            return Err(AppError::validation(format!(
                "Expected '{}' to be rejected",
                input
            )));
        }
    }
    Ok(())
}

#[test]
fn parse_bool_env_values() -> AppResult<()> {
    if !parse_bool_env("Yes")? || parse_bool_env("off")? {
        return Err(AppError::validation("Unexpected boolean parse"));
    }
    if parse_bool_env("maybe").is_ok() {
        return Err(AppError::validation("Expected invalid boolean"));
    }
    Ok(())
}

#[test]
fn parse_separator_keeps_whitespace() -> AppResult<()> {
    if parse_separator(" | ")? != " | " {
        return Err(AppError::validation("Separator was altered"));
    }
    match parse_separator("") {
        Err(AppError::Validation(ValidationError::EmptySeparator)) => Ok(()),
        _ => Err(AppError::validation("Expected empty separator error")),
    }
}

#[test]
fn positive_types_reject_zero() -> AppResult<()> {
    if PositiveU64::try_from(0).is_ok() || PositiveUsize::try_from(0).is_ok() {
        return Err(AppError::validation("Zero accepted"));
    }
    let value: PositiveU64 = " 12 ".parse()?;
    if u64::from(value) != 12 {
        return Err(AppError::validation("Unexpected parsed value"));
    }
    Ok(())
}
