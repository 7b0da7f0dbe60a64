//! Map image endpoint handler.
//!
//! Returns a PNG rendering of the current view: the active layer's features
//! painted with the derived color scale. An empty view renders the bare
//! background, never an error.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::error::HazmapError;
use crate::handlers::error_response;
use crate::logging::{generate_request_id, log_request_error};
use crate::render::ImageSurface;
use crate::state::AppState;

/// Default image dimensions
const DEFAULT_WIDTH: u32 = 800;
const DEFAULT_HEIGHT: u32 = 600;

/// Largest accepted image dimension
const MAX_DIMENSION: u32 = 4096;

/// Query parameters for the map endpoint
#[derive(Debug, Deserialize)]
pub struct MapQuery {
    /// Image width in pixels
    pub width: Option<u32>,
    /// Image height in pixels
    pub height: Option<u32>,
}

/// Handle GET /map requests
pub async fn map_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MapQuery>,
) -> Response {
    let request_id = generate_request_id();
    let start_time = Instant::now();

    let width = params.width.unwrap_or(DEFAULT_WIDTH);
    let height = params.height.unwrap_or(DEFAULT_HEIGHT);

    debug!(
        endpoint = "/map",
        request_id = %request_id,
        width = width,
        height = height,
        "Processing map render"
    );

    if !(1..=MAX_DIMENSION).contains(&width) || !(1..=MAX_DIMENSION).contains(&height) {
        let error = HazmapError::InvalidParameter {
            param: "width/height".to_string(),
            message: format!("dimensions must be within 1..={}", MAX_DIMENSION),
        };
        log_request_error(&error, "/map", &request_id, None);
        return error_response(&error, &request_id);
    }

    let encoded = {
        let mut view = state.view.write();
        let mut surface = ImageSurface::new(width, height);
        view.renderer.repaint(&mut surface);
        surface.encode_png()
    };

    match encoded {
        Ok(png) => {
            info!(
                endpoint = "/map",
                request_id = %request_id,
                width = width,
                height = height,
                bytes = png.len(),
                duration_ms = start_time.elapsed().as_millis() as u64,
                "Map render successful"
            );

            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "image/png")],
                Bytes::from(png),
            )
                .into_response()
        }
        Err(error) => {
            log_request_error(&error, "/map", &request_id, None);
            error_response(&error, &request_id)
        }
    }
}
