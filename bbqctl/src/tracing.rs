//! Logging setup and the macros the rest of the crate logs with.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// `use crate::tracing::prelude::*;` brings the logging macros into scope.
pub mod prelude {
    pub use ::tracing::{debug, error, info, trace, warn};
}

const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber.
///
/// Logs go to the systemd journal when started by systemd (which sets
/// `JOURNAL_STREAM`), and to stdout otherwise. `RUST_LOG` overrides the
/// default `info` filter.
pub fn init_journald_or_stdout() {
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    if std::env::var_os("JOURNAL_STREAM").is_some() {
        match tracing_journald::layer() {
            Ok(journald) => {
                tracing_subscriber::registry()
                    .with(filter())
                    .with(journald)
                    .init();
                return;
            }
            Err(e) => eprintln!("journald unavailable, logging to stdout: {e}"),
        }
    }

    let timer = fmt::time::LocalTime::new(time::macros::format_description!(
        "[hour]:[minute]:[second].[subsecond digits:3]"
    ));
    tracing_subscriber::registry()
        .with(filter())
        .with(fmt::layer().with_timer(timer))
        .init();
}
