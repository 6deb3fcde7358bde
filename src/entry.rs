use std::ffi::OsString;
use std::sync::Arc;
use std::time::Duration;

use clap::{ArgMatches, CommandFactory, FromArgMatches};
use tracing::{error, info};

use crate::args::{Command, PressArgs, PressOptions};
use crate::config::{apply_config, load_config};
use crate::curl::{CurlBuilder, DescriptorBuilder, resolve_descriptor};
use crate::engine::{Engine, EngineConfig};
use crate::error::{AppError, AppResult, ValidationError};
use crate::http::build_client;
use crate::logger::init_logging;
use crate::metrics::RunSummary;
use crate::shutdown_handlers::{
    setup_deadline_shutdown_handler, setup_signal_shutdown_handler, shutdown_channel,
};

/// Binary entry point: parse flags, merge config, run until interrupted.
///
/// # Errors
///
/// Returns an error for invalid flags or config, an unusable request
/// descriptor or data file, or a worker that died.
pub fn run() -> AppResult<()> {
    let raw_args: Vec<OsString> = std::env::args_os().collect();
    let (mut args, matches) = parse_args(raw_args)?;

    if args.command != Some(Command::Press) {
        PressArgs::command().print_help()?;
        println!();
        return Ok(());
    }

    if let Some(config) = load_config(args.options.config.as_deref())? {
        apply_config(&mut args.options, &matches, &config)?;
    }
    init_logging(args.options.verbose, args.options.no_color);

    let options = args.options;
    let source = options.curl.as_deref().ok_or_else(|| {
        error!("Missing request descriptor (set --curl or provide in config).");
        AppError::validation(ValidationError::MissingDescriptor)
    })?;
    let descriptor = resolve_descriptor(source)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::validation(ValidationError::RuntimeBuildFailed { source: err }))?;

    runtime.block_on(press(options, descriptor))
}

fn parse_args(raw_args: Vec<OsString>) -> AppResult<(PressArgs, ArgMatches)> {
    let matches = PressArgs::command().get_matches_from(raw_args);
    let args = PressArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}

/// Parses the raw template once before any worker starts, so a broken
/// descriptor fails the run instead of every iteration.
fn validate_descriptor(
    builder: &dyn DescriptorBuilder,
    descriptor: &str,
    timeout: Duration,
) -> AppResult<()> {
    let client = build_client(Some(timeout))?;
    let request = builder.build(&client, descriptor).map_err(|err| {
        error!("parse curl error: {}", err);
        err
    })?;
    info!("request template: {} {}", request.method(), request.url());
    Ok(())
}

async fn press(options: PressOptions, descriptor: String) -> AppResult<()> {
    let builder: Arc<dyn DescriptorBuilder> = Arc::new(CurlBuilder::new());
    validate_descriptor(builder.as_ref(), &descriptor, options.timeout)?;

    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);

    let engine = Engine::new(EngineConfig::from_options(&options, descriptor), builder);
    let running = match engine.start() {
        Ok(running) => running,
        Err(err) => {
            drop(shutdown_tx.send(()));
            drop(signal_handle.await);
            return Err(err);
        }
    };
    let deadline_handle = options
        .duration
        .map(|duration| setup_deadline_shutdown_handler(&shutdown_tx, duration));

    let summary = running.run_until(shutdown_rx).await;

    drop(shutdown_tx.send(()));
    signal_handle.await?;
    if let Some(handle) = deadline_handle {
        handle.await?;
    }

    print_summary(&summary?);
    Ok(())
}

/// Printed directly so log filtering never hides the result of a run.
fn print_summary(summary: &RunSummary) {
    for line in summary.lines() {
        println!("{}", line);
    }
}
