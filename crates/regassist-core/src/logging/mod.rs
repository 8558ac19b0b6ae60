//! Logging abstractions
//!
//! Components log through the [`Logger`] trait. Binaries use
//! [`TracingLogger`] and call [`init_tracing`] once at startup; tests use
//! [`NoOpLogger`].

mod noop;
mod tracing_logger;
mod traits;

pub use noop::NoOpLogger;
pub use tracing_logger::TracingLogger;
pub use traits::{Logger, SharedLogger};

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber
///
/// `RUST_LOG` wins when set. Otherwise the level is `info`, or `debug` when
/// `verbose` is true. Calling this twice is harmless.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
