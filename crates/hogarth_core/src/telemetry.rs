//! Console telemetry initialization.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize console tracing with `RUST_LOG`-driven filtering.
///
/// Falls back to `info` globally with `debug` for hogarth crates when no
/// filter is configured in the environment.
///
/// # Errors
///
/// Returns an error if a subscriber was already installed.
pub fn init_telemetry() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hogarth=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()?;

    Ok(())
}
