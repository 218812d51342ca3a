// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::application::bar_tile_service::BarTileService;
use crate::application::streaming_service::StreamingDashboardService;
use crate::infrastructure::analytics_client::AnalyticsClient;
use crate::infrastructure::config::{load_console_config, load_tiles_config, TileConfig};
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let console_config = load_console_config()?;
    let tiles_config = load_tiles_config()?;

    // Create repository (infrastructure layer)
    let repository = Arc::new(AnalyticsClient::new(
        console_config.console.api_url.clone(),
        console_config.console.request_timeout(),
    )?);

    // Create services (application layer)
    let tiles: Vec<_> = tiles_config
        .tiles
        .into_iter()
        .map(TileConfig::into_tile)
        .collect();
    let first_table = tiles.first().map(|t| t.tile_context.table.clone());
    let tile_service = BarTileService::new(
        repository,
        tiles,
        console_config.dashboard.clone().into_context(),
    );

    if let Some(table) = first_table {
        if let Err(e) = tile_service.refresh_fields(&table).await {
            tracing::warn!("Could not load fields for {}: {}", table, e);
        }
    }

    let streaming_service = StreamingDashboardService::new(tile_service.clone());

    // Create application state
    let state = Arc::new(AppState {
        tile_service,
        streaming_service,
    });

    // Build router (presentation layer)
    let router = build_router(state);

    // Start server
    let addr: SocketAddr = console_config.console.bind_address.parse()?;
    tracing::info!("Starting bar tile console on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
