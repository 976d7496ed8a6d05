use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::config::AppConfig;

pub mod pages;
pub mod routes;

/// Per-process context shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig) -> Arc<Self> {
        Arc::new(AppState { config })
    }
}

pub async fn run_server(config: AppConfig) -> std::io::Result<()> {
    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!(
        addr = %config.bind_addr,
        catalog = %config.catalog_path.display(),
        reservations = %config.reservations_path.display(),
        "biblioteca server listening"
    );
    axum::serve(listener, routes::router(AppState::new(config))).await
}
