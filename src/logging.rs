//! Diagnostic logging on stderr; stdout is reserved for the interactive flow.

use tracing_subscriber::EnvFilter;

/// Maps `-v` occurrences to a filter; without flags `RUST_LOG` wins, then `warn`.
pub fn level_for(verbosity: u8) -> Option<&'static str> {
    match verbosity {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

pub fn init(verbosity: u8) {
    let filter = match level_for(verbosity) {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
