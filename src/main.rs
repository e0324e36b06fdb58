//! Workpace - A state-managed HTTP server that paces focus work
//!
//! This is the main entry point for the workpace application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use workpace::{
    api::create_router,
    config::Config,
    settings::SettingsStore,
    state::AppState,
    tasks::cadence_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("workpace={},tower_http=info", config.log_level()))
        .init();

    info!("Starting workpace server v1.2.0");
    info!("Configuration: host={}, port={}, settings={}",
          config.host, config.port, config.settings.display());

    // Load persisted settings, falling back to defaults
    let store = SettingsStore::new(config.settings.clone());
    let settings = store.load();
    info!("Timer settings: work={}min, break every {}-{}min for {}s, long break {}min",
          settings.work_duration, settings.random_break_min, settings.random_break_max,
          settings.random_break_duration, settings.long_break_duration);

    // Create application state
    let state = Arc::new(AppState::new(config.port, config.host.clone(), store, settings));

    // Start the cadence background task
    let cadence_state = Arc::clone(&state);
    tokio::spawn(async move {
        cadence_task(cadence_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start    - Start a work session");
    info!("  POST /stop     - Stop the timer");
    info!("  GET  /status   - Check the current phase and countdown");
    info!("  GET  /settings - Read the stored settings");
    info!("  PUT  /settings - Save settings (stops a running timer)");
    info!("  GET  /events   - Server-sent tick and cue events");
    info!("  GET  /health   - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    // Cancel any active cadence before exit
    if let Err(e) = state.stop_timer() {
        tracing::error!("Failed to stop timer during shutdown: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}
