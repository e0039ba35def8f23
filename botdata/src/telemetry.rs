// Tracing initialization for processes embedding the data layer

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_filter(log_level: &str) -> Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .map_err(|e| anyhow::anyhow!("Failed to create env filter: {}", e))
}

/// Initialize human-readable logging.
///
/// The level comes from `RUST_LOG` when set, otherwise from the configured
/// log level. Call once at process start.
pub fn init_logging(log_level: &str) -> Result<()> {
    tracing_subscriber::registry()
        .with(env_filter(log_level)?)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing subscriber: {}", e))?;

    Ok(())
}

/// Initialize structured JSON logging for production processes.
pub fn init_json_logging(log_level: &str) -> Result<()> {
    tracing_subscriber::registry()
        .with(env_filter(log_level)?)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_thread_ids(true)
                .with_target(false),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing subscriber: {}", e))?;

    Ok(())
}
