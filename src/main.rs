//! hazmap - A fast, in-memory choropleth map server for hazard GeoJSON datasets
//!
//! This is the main entry point for the hazmap application.

use axum::{routing::get, Router};
use std::net::SocketAddr;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use hazmap::handlers::{
    dataset_handler, feature_handler, heartbeat_handler, layer_handler, legend_handler,
    map_handler, metadata_handler,
};
use hazmap::{
    create_http_trace_layer, AppState, Config, FileDataSource, HazmapError, Result,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let (config, data_dir) = Config::load().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        e
    })?;

    // Initialize tracing with the configured level
    hazmap::init_tracing(&config.log_level);

    info!("Starting hazmap v{}", env!("CARGO_PKG_VERSION"));

    // Validate configuration
    config.validate().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;

    if !data_dir.is_dir() {
        let e = HazmapError::Config {
            message: format!("Data directory not found: {}", data_dir.display()),
        };
        error!("{}", e);
        return Err(e);
    }

    info!("Serving datasets from {}", data_dir.display());

    // Build the application state around a file-backed dataset source
    let source = Box::new(FileDataSource::new(&data_dir));
    let state = AppState::new_shared(config.clone(), source)?;

    // Load the initial dataset, if one was configured. A failure here is a
    // degraded start (empty view), not a fatal one.
    if let Some(key) = &config.data.initial_dataset {
        let ticket = state.fetches.begin();
        match state.source.fetch(key).await {
            Ok(collection) => {
                state.apply_dataset(ticket, key, collection);
                info!(key = %key, "Initial dataset loaded");
            }
            Err(e) => {
                hazmap::log_error(&e, "initial dataset load");
                warn!(key = %key, "Starting with an empty view");
            }
        }
    }

    // Build the router
    let app = Router::new()
        .route("/heartbeat", get(heartbeat_handler))
        .route("/metadata", get(metadata_handler))
        .route("/layer", get(layer_handler))
        .route("/dataset", get(dataset_handler))
        .route("/map", get(map_handler))
        .route("/legend", get(legend_handler))
        .route("/feature", get(feature_handler))
        .layer(create_http_trace_layer())
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Create the server address
    let addr = SocketAddr::from((
        config
            .server
            .host
            .parse::<std::net::IpAddr>()
            .map_err(|e| HazmapError::Config {
                message: format!("Invalid host address: {}", e),
            })?,
        config.server.port,
    ));

    info!("Server listening on http://{}", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| HazmapError::Server {
            message: format!("Failed to bind to address: {}", e),
        })?;

    // Set up graceful shutdown
    let shutdown_future = shutdown_signal();

    info!("Server is ready to accept connections");

    // Start the server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_future)
        .await
        .map_err(|e| HazmapError::Server {
            message: format!("Server error: {}", e),
        })?;

    info!("Server has been gracefully shut down");
    Ok(())
}

/// Wait for a shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
