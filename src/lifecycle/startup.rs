//! Startup orchestration.
//!
//! # Responsibilities
//! - Layer configuration: file, then environment, then command line
//! - Start metrics, bind the listener, serve until a signal arrives
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

use std::path::Path;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{self, env, ConfigError, GatewayConfig};
use crate::http::GatewayServer;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::resolve::FetchError;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("cannot build upstream client: {0}")]
    Upstream(#[from] FetchError),

    #[error("listener error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the effective configuration.
pub fn load(
    path: Option<&Path>,
    bind_override: Option<String>,
) -> Result<GatewayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => config::load_config(path)?,
        None => GatewayConfig::default(),
    };

    env::apply_process_env(&mut config);

    if let Some(bind) = bind_override {
        config.listener.bind_address = bind;
    }

    config::validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Serve `config` until Ctrl+C or SIGTERM.
pub async fn run(config: GatewayConfig) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = GatewayServer::new(config)?;

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    server.run(listener, shutdown.subscribe()).await?;
    Ok(())
}
