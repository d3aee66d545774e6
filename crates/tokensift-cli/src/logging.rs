use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "TOKENSIFT_LOG";

/// Install the stderr subscriber.
///
/// `TOKENSIFT_LOG` wins when set and valid; otherwise `warn`, or `debug`
/// with `--verbose`. Stdout is left to the report.
pub fn init(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(filter)
        .init();
}
