use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{debug, error, info, trace};

use crate::config::{initialize_app_state_with_url, Settings};
use crate::router::create_router_with_metrics;

pub async fn serve(settings: &Settings) -> Result<()> {
    trace!("Entering serve function");
    info!("Inventory API starting up");
    debug!("Database URL: {}", settings.database_url);
    debug!("Bind address: {}", settings.bind_address);
    debug!("Request timeout: {:?}", settings.request_timeout());

    trace!("Initializing application state");
    let state = initialize_app_state_with_url(&settings.database_url).await?;
    debug!("Application state initialized successfully");

    let app = create_router_with_metrics(state, settings.request_timeout());
    debug!("Router created successfully");

    trace!("Attempting to bind TCP listener to {}", settings.bind_address);
    let listener = TcpListener::bind(&settings.bind_address)
        .await
        .with_context(|| format!("Failed to bind to address {}", settings.bind_address))?;

    info!("Inventory API server running on http://{}", settings.bind_address);
    info!("Swagger UI available at http://{}/swagger-ui", settings.bind_address);
    info!("Metrics available at http://{}/metrics", settings.bind_address);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Server shutdown gracefully");
    Ok(())
}
