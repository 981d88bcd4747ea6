//! vanity-gateway
//!
//! ```text
//!   go get                      gateway                        upstream
//!   ──────                      ───────                        ────────
//!   GET  /<path>?go-get=1   →   go-import meta page
//!   GET  /<path>/info/refs  →   candidates → fetch refs   →    GET <base>.git/info/refs
//!                           ←   advertisement, master repointed
//!   POST /<path>/git-upload-pack
//!                           ←   301 <base>.git/git-upload-pack
//! ```

use std::path::PathBuf;

use clap::Parser;

use vanity_gateway::lifecycle::startup;
use vanity_gateway::observability::logging;

#[derive(Parser)]
#[command(name = "vanity-gateway")]
#[command(about = "Serve versioned vanity import paths for go get", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overriding the file and environment.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = startup::load(cli.config.as_deref(), cli.bind)?;
    logging::init(&config.observability, config.site.debug);

    tracing::info!("vanity-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        hostname = %config.site.hostname,
        upstream_scheme = %config.upstream.scheme,
        "Configuration loaded"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
