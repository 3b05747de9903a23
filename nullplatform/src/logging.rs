//! Logging setup
//!
//! Logs go to stderr; stdout belongs to the plugin host. Filtering follows
//! `RUST_LOG` and defaults to `info`, e.g. `RUST_LOG=nullplatform=debug`
//! shows every API request and response body.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn layer<S>() -> impl tracing_subscriber::Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
}

fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the global subscriber
///
/// Panics if a global subscriber is already set; see [`try_init_logging`].
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(filter("info"))
        .with(layer())
        .init();
}

/// Install the global subscriber unless one is already set
///
/// Returns whether this call installed it.
pub fn try_init_logging(default_level: &str) -> bool {
    tracing_subscriber::registry()
        .with(filter(default_level))
        .with(layer())
        .try_init()
        .is_ok()
}
