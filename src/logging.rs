// Logging - tracing subscriber setup for the binary
//
// Logs go to stderr; stdout belongs to the terminal view.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub use tracing_subscriber::util::TryInitError;

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over `default_filter` (e.g. "fitpace=info").
/// `verbose` forces debug output for this crate.
pub fn init_logging(default_filter: &str, verbose: bool) -> Result<(), TryInitError> {
    let filter = if verbose {
        EnvFilter::new("fitpace=debug,warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
}
