use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

/// Level from the `-v` count, falling back to the configured level name.
pub fn resolve_level(verbosity: u8, configured: &str) -> Level {
    match verbosity {
        0 => configured.parse().unwrap_or(Level::WARN),
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Installs a stderr fmt subscriber. `RUST_LOG` wins over `level` when set.
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging(level: Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_ascii_lowercase()));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
