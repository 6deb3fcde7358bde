use tracing_subscriber::{EnvFilter, FmtSubscriber};

const LOG_ENV: &str = "CURLPRESS_LOG";

fn resolve_filter(directive: Option<String>, verbose: bool) -> EnvFilter {
    let fallback = if verbose { "debug" } else { "info" };
    directive.map_or_else(
        || EnvFilter::new(fallback),
        |value| EnvFilter::try_new(value).unwrap_or_else(|_err| EnvFilter::new(fallback)),
    )
}

/// Installs the global tracing subscriber.
///
/// `CURLPRESS_LOG` wins over `RUST_LOG`; without either the level is `info`,
/// or `debug` when `verbose` is set.
pub fn init_logging(verbose: bool, no_color: bool) {
    let directive = std::env::var(LOG_ENV)
        .or_else(|_err| std::env::var("RUST_LOG"))
        .ok();
    let filter = resolve_filter(directive, verbose);

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_ansi(!no_color)
        .with_target(false)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global default subscriber: {}", err);
    }
}
