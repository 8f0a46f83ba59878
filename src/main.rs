// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::application::plot_service::PlotService;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::png_renderer::PngRenderer;
use crate::infrastructure::promql_client::PromQlClient;
use crate::presentation::app_state::AppState;

/// Serve PNG charts of PromQL range queries.
#[derive(Debug, Parser)]
#[command(name = "promql-plotter", version)]
struct Cli {
    /// Configuration file, without extension (toml, yaml or json).
    #[arg(long, default_value = "config/plotter")]
    config: String,

    /// Expressions plotted on every request. Numeric literals become reference lines.
    expressions: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let cfg = load_app_config(&cli.config)?;

    // Create backend and renderer (infrastructure layer)
    let backend = Arc::new(PromQlClient::new(
        cfg.backend.address.clone(),
        cfg.backend.auth_token.clone(),
        cfg.query_timeout(),
    )?);
    let renderer = Arc::new(PngRenderer::new(cfg.plot.width, cfg.plot.height));

    // Create service (application layer)
    let plot_service = PlotService::new(backend, renderer, cfg.plot_options());

    let state = Arc::new(AppState {
        plot_service,
        expressions: cli.expressions,
        query_timeout: cfg.query_timeout(),
    });

    if state.expressions.is_empty() {
        tracing::info!("No bound expressions, plotting source_id/metric from each request");
    } else {
        tracing::info!("Plotting bound expressions {:?}", state.expressions);
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.server.port));
    tracing::info!(
        "Starting promql-plotter on {} against {}",
        addr,
        cfg.backend.address
    );

    axum::serve(
        tokio::net::TcpListener::bind(addr).await?,
        presentation::router(state),
    )
    .await?;

    Ok(())
}
