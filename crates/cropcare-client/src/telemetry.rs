//! Tracing subscriber setup
//!
//! Filter comes from `RUST_LOG`, falling back to `info`. Installing twice is
//! a no-op, so tests and binaries can both call `init_tracing`.

use tracing_subscriber::EnvFilter;

/// Output format of the fmt subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Default filter directive
pub const DEFAULT_FILTER: &str = "info";

/// Install a human-readable subscriber
///
/// Returns `false` when a global subscriber was already set.
pub fn init_tracing() -> bool {
    init_tracing_with(LogFormat::Pretty)
}

/// Install a subscriber in the given format
pub fn init_tracing_with(format: LogFormat) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    let installed = match format {
        LogFormat::Pretty => builder.try_init().is_ok(),
        LogFormat::Json => builder.json().try_init().is_ok(),
    };
    if installed {
        tracing::debug!(?format, "tracing initialised");
    }
    installed
}
