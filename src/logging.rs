//! Logging utilities for the hazmap server.
//!
//! This module provides structured logging functionality to make logs more
//! searchable, analyzable, and useful for production deployments.

use tracing::{error, info, Level};

use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use uuid::Uuid;

/// Creates the tracing layer for HTTP request/response logging
pub fn create_http_trace_layer() -> TraceLayer<
    tower_http::classify::SharedClassifier<tower_http::classify::ServerErrorsAsFailures>,
    DefaultMakeSpan,
    DefaultOnRequest,
    DefaultOnResponse,
> {
    // Create a custom response formatter that includes timing
    let response_formatter = DefaultOnResponse::new()
        .level(Level::DEBUG)
        .latency_unit(LatencyUnit::Micros);

    // Configure the tracing layer
    TraceLayer::new_for_http()
        .make_span_with(
            DefaultMakeSpan::new()
                .level(Level::INFO)
                .include_headers(true),
        )
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(response_formatter)
}

/// Initialize the tracing subscriber with the given log level
pub fn init_tracing(log_level: &str) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(val) => val,
        Err(_) => log_level.to_string(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();
}

/// Log detailed information about a loaded dataset
pub fn log_dataset_load_stats(
    key: &str,
    feature_count: usize,
    layers: &[i64],
    memory_usage: usize,
) {
    info!(
        operation = "dataset_load",
        key = key,
        feature_count = feature_count,
        layers = ?layers,
        memory_kb = memory_usage / 1024,
        "Dataset loaded successfully"
    );
}

/// Log an error with context
pub fn log_error(error: &crate::error::HazmapError, context: &str) {
    error!(
        error = %error,
        context = context,
        error_type = std::any::type_name_of_val(error),
        "Error occurred"
    );
}

/// Log an error that occurred during request processing
pub fn log_request_error(
    error: &crate::error::HazmapError,
    endpoint: &str,
    request_id: &str,
    params: Option<&str>,
) {
    error!(
        error = %error,
        endpoint = endpoint,
        request_id = request_id,
        params = params.unwrap_or("none"),
        error_type = std::any::type_name_of_val(error),
        "Request processing error"
    );
}

/// Generate a unique request ID
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}
