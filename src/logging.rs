//! Structured logging setup.

use tracing_subscriber::EnvFilter;

use crate::domain::LogLevel;

/// Install the global subscriber. `RUST_LOG`, when set, overrides `level`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init(level: LogLevel) {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(level, env.as_deref()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Filter for `level`, unless `env` holds a valid directive.
pub fn build_filter(level: LogLevel, env: Option<&str>) -> EnvFilter {
    env.filter(|e| !e.trim().is_empty())
        .and_then(|e| EnvFilter::try_new(e).ok())
        .unwrap_or_else(|| EnvFilter::new(level.filter_directive()))
}
