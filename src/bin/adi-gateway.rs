//! HTTP server for the ADI Writer gateway.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use adi_gateway::logging::{LogFormat, LoggingConfig, init_logging};
use adi_gateway::server_adapters::axum::router;
use adi_gateway::{Gateway, GatewayConfig};

#[derive(Debug, Parser)]
#[command(name = "adi-gateway", version, about = "Serve the ADI Writer LLM gateway over HTTP")]
struct Cli {
    /// Address to listen on
    #[arg(long, env = "ADI_GATEWAY_LISTEN", default_value = "0.0.0.0:3000")]
    listen: SocketAddr,

    /// Console log format: pretty, compact or json
    #[arg(long, env = "ADI_LOG_FORMAT", default_value = "pretty")]
    log_format: LogFormat,

    /// Default log filter; RUST_LOG takes precedence
    #[arg(long, env = "ADI_LOG_LEVEL", default_value = "adi_gateway=info,info")]
    log_level: String,

    /// Also write daily rolling JSON logs into this directory
    #[arg(long, env = "ADI_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::default()
        .with_level(cli.log_level)
        .with_format(cli.log_format);
    if let Some(dir) = cli.log_dir {
        logging = logging.with_log_dir(dir);
    }
    let _guard = init_logging(&logging)?;

    let config = GatewayConfig::from_env()?;
    let gateway = Arc::new(Gateway::new(config)?);

    let listener = tokio::net::TcpListener::bind(cli.listen).await?;
    tracing::info!(addr = %cli.listen, "adi-gateway listening");

    axum::serve(listener, router(gateway))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("adi-gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
