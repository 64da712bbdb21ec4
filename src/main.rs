use anyhow::Result;
use clap::Parser;
use tracing::info;

use traffic_aggregator::{
    AppState, Port, RateSampler, load_config_with_fallback, logging, router,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Host address to listen on (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    port: Option<Port>,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging();

    let args = Args::parse();

    let (config, source) = load_config_with_fallback(&args.config)?;
    info!("Loaded configuration from {}", source.description());

    let host = args.host.unwrap_or_else(|| config.host.clone());
    let port = args.port.unwrap_or(config.port);

    let state = AppState::new();
    let sampler = RateSampler::spawn(state.metrics.clone(), config.sample_interval());

    let listen_addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    info!("Traffic aggregator listening on {}", listen_addr);

    axum::serve(listener, router(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down, stopping rate sampler");
    sampler.shutdown().await;
    info!(
        "Graceful shutdown complete: {} ingests over {:?}",
        state.metrics.total_requests(),
        state.metrics.uptime()
    );

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM on Unix)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
