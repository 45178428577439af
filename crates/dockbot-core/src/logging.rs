use tracing_subscriber::{fmt, EnvFilter};

use crate::{errors::Error, Result};

/// Initialize logging/tracing for the bot.
///
/// Records emitted through the `log` facade (teloxide uses it) are forwarded into
/// the same subscriber.
pub fn init(service_name: &str) -> Result<()> {
    // Default: info for our crates and everything else.
    // Can be overridden with `RUST_LOG`.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "info,dockbot_core=info,dockbot_telegram=info,dockbot_docker=info,{service_name}=info"
        ))
    });

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(true)
        .try_init()
        .map_err(|e| Error::External(format!("failed to initialize logging: {e}")))?;

    Ok(())
}
