//! Log output for native hosts (tests, tools). The browser build logs
//! through whatever subscriber the page installs.

use shared::config::ClientConfig;
use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt};

/// Installs a `fmt` subscriber filtered by `RUST_LOG`, or by the configured
/// level when that is unset. Returns the level in effect, or `None` when a
/// global subscriber was already installed.
pub fn initialize_tracing(config: &ClientConfig) -> Option<String> {
    fmt::fmt()
        .with_env_filter(build_env_filter(config))
        .with_target(false)
        .with_level(true)
        .try_init()
        .ok()
        .map(|()| config.log_level.clone())
}

fn build_env_filter(config: &ClientConfig) -> EnvFilter {
    let default_level = config
        .log_level
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::INFO);

    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::builder()
            .with_default_directive(default_level.into())
            .from_env_lossy()
    })
}
