//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all dispatcher
//! - Wire up middleware (tracing, request ID, compression, panic recovery, metrics)
//! - Bind server to listener and stop on the shutdown broadcast
//! - Bound the connection drain that follows shutdown

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, routing::any, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{catch_panic::CatchPanicLayer, compression::CompressionLayer, trace::TraceLayer};

use crate::config::{GatewayConfig, SiteConfig};
use crate::http::handlers::dispatch;
use crate::http::request::RequestIdLayer;
use crate::observability::metrics;
use crate::resolve::{FetchError, HttpRefsFetcher, RefsFetcher, VersionResolver};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub resolver: VersionResolver,
    pub site: Arc<SiteConfig>,
    pub upstream_scheme: Arc<str>,
}

/// HTTP server for the gateway.
pub struct GatewayServer {
    router: Router,
    config: GatewayConfig,
}

impl GatewayServer {
    /// Create a server fetching from upstream hosts over HTTP(S).
    pub fn new(config: GatewayConfig) -> Result<Self, FetchError> {
        let fetcher = HttpRefsFetcher::new(&config.upstream)?;
        Ok(Self::with_fetcher(config, Arc::new(fetcher)))
    }

    /// Create a server with a custom refs source.
    pub fn with_fetcher(config: GatewayConfig, fetcher: Arc<dyn RefsFetcher>) -> Self {
        let state = AppState {
            resolver: VersionResolver::new(fetcher),
            site: Arc::new(config.site.clone()),
            upstream_scheme: Arc::from(config.upstream.scheme.as_str()),
        };

        Self {
            router: build_router(state),
            config,
        }
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Serve until a value arrives on `shutdown`, then give in-flight
    /// connections `listener.drain_timeout_secs` to finish.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        let drain_timeout = Duration::from_secs(self.config.listener.drain_timeout_secs);
        tracing::info!(address = %addr, "HTTP server starting");

        let mut draining = shutdown.resubscribe();
        let mut serve = Box::pin(
            axum::serve(listener, self.router)
                .with_graceful_shutdown(async move {
                    let _ = shutdown.recv().await;
                })
                .into_future(),
        );

        tokio::select! {
            result = &mut serve => {
                result?;
                tracing::info!("HTTP server stopped");
                return Ok(());
            }
            _ = draining.recv() => {}
        }

        tracing::info!(timeout_secs = drain_timeout.as_secs(), "Draining connections");
        match tokio::time::timeout(drain_timeout, serve).await {
            Ok(result) => {
                result?;
                tracing::info!("HTTP server stopped");
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = drain_timeout.as_secs(),
                    "Drain timeout elapsed, dropping remaining connections"
                );
            }
        }
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", any(dispatch))
        .route("/{*path}", any(dispatch))
        .with_state(state)
        .layer(CatchPanicLayer::new())
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(CompressionLayer::new())
        .layer(RequestIdLayer)
        .layer(TraceLayer::new_for_http())
}
