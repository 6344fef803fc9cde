//! Tracing setup shared by both binaries.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter used when nothing else is configured.
pub const DEFAULT_FILTER: &str = "stencil=info,stencil_command_init=info";

/// Filter used with `--debug` or `LOG_LEVEL=verbose`.
pub const VERBOSE_FILTER: &str = "stencil=debug,stencil_command_init=debug";

/// Pick the log filter.
///
/// Log level is controlled by:
/// 1. `verbose` sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
pub fn filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Initialize the tracing subscriber. Logs go to stderr.
///
/// Calling this more than once keeps the first subscriber.
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter(verbose))
        .try_init();
}
