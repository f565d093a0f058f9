use std::fs::File;
use std::sync::Mutex;

use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::domain::{TVConfig, TVError};

/// Sends all tracing output to the configured log file.
///
/// The terminal belongs to the UI, so nothing is ever written to stdout or
/// stderr. `RUST_LOG` overrides the default `tpv=info` filter.
pub fn init_logging(config: &TVConfig) -> Result<(), TVError> {
    let file = File::create(&config.log_file)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tpv=info"));
    let fmt_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_target(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .try_init()
        .map_err(|e| TVError::LoadingFailed(format!("could not set up logging: {e}")))?;

    tracing::info!("Logging to {:?}", config.log_file);
    Ok(())
}
