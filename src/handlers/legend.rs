//! Legend endpoint handler.
//!
//! Serves the legend for the current view, driven by the same color scale
//! as the map. JSON carries the full structure (swatches, value labels,
//! level labels); `format=png` returns the swatch strip as an image.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::sync::Arc;
use tracing::debug;

use crate::error::{HazmapError, Result};
use crate::handlers::error_response;
use crate::logging::{generate_request_id, log_request_error};
use crate::render::legend::legend_strip;
use crate::render::{percentile_breakpoints, render_legend, Legend, LegendSpec};
use crate::scale::color_hex;
use crate::state::AppState;

/// Dimensions of the rendered legend strip
const STRIP_WIDTH: u32 = 500;
const STRIP_HEIGHT: u32 = 20;

/// Largest accepted legend class count
const MAX_CLASSES: usize = 32;

/// Query parameters for the legend endpoint
#[derive(Debug, Deserialize)]
pub struct LegendQuery {
    /// Number of legend classes (defaults to the configured count)
    pub classes: Option<usize>,
    /// Explicit breakpoints as comma-separated numbers, overriding the
    /// percentile computation
    pub breakpoints: Option<String>,
    /// Legend title (defaults to the dataset key)
    pub title: Option<String>,
    /// Output format (json or png)
    pub format: Option<String>,
}

/// One swatch of the JSON legend
#[derive(Debug, Serialize)]
pub struct SwatchResponse {
    /// Lowercase CSS hex color
    pub color: String,
    /// Fraction of the strip this swatch occupies
    pub width_fraction: f64,
}

/// JSON form of the legend
#[derive(Debug, Serialize)]
pub struct LegendResponse {
    pub title: String,
    pub swatches: Vec<SwatchResponse>,
    pub value_labels: Vec<f64>,
    pub level_labels: Vec<String>,
}

impl From<&Legend> for LegendResponse {
    fn from(legend: &Legend) -> Self {
        Self {
            title: legend.title.clone(),
            swatches: legend
                .swatches
                .iter()
                .map(|s| SwatchResponse {
                    color: color_hex(s.color),
                    width_fraction: s.width_fraction,
                })
                .collect(),
            value_labels: legend.value_labels.clone(),
            level_labels: legend.level_labels.clone(),
        }
    }
}

/// Handle GET /legend requests
pub async fn legend_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LegendQuery>,
) -> Response {
    let request_id = generate_request_id();
    debug!(
        endpoint = "/legend",
        request_id = %request_id,
        classes = ?params.classes,
        breakpoints = ?params.breakpoints,
        format = ?params.format,
        "Processing legend request"
    );

    let classes = params.classes.unwrap_or(state.config.map.legend_classes);
    if !(1..=MAX_CLASSES).contains(&classes) {
        let error = HazmapError::InvalidParameter {
            param: "classes".to_string(),
            message: format!("classes must be within 1..={}", MAX_CLASSES),
        };
        log_request_error(&error, "/legend", &request_id, None);
        return error_response(&error, &request_id);
    }

    let explicit = match params.breakpoints.as_deref().map(parse_breakpoints) {
        Some(Ok(values)) => Some(values),
        Some(Err(error)) => {
            log_request_error(&error, "/legend", &request_id, None);
            return error_response(&error, &request_id);
        }
        None => None,
    };

    // An empty view yields an empty legend, mirroring the empty map
    let legend = {
        let mut view = state.view.write();
        let title = params
            .title
            .clone()
            .or_else(|| view.dataset_key.clone())
            .unwrap_or_else(|| "Hazard".to_string());

        view.renderer.render_state().map(|render| {
            let percentile_values = explicit.unwrap_or_else(|| {
                let values: Vec<f64> =
                    render.features.iter().filter_map(|f| f.value).collect();
                percentile_breakpoints(&values, classes)
            });
            let spec = LegendSpec {
                percentile_values,
                title,
            };
            render_legend(&spec, &render.scale)
        })
    };

    match params.format.as_deref().unwrap_or("json") {
        "png" => match encode_strip(legend.as_ref()) {
            Ok(png) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "image/png")],
                Bytes::from(png),
            )
                .into_response(),
            Err(error) => {
                log_request_error(&error, "/legend", &request_id, None);
                error_response(&error, &request_id)
            }
        },
        "json" => match legend.as_ref() {
            Some(legend) => Json(LegendResponse::from(legend)).into_response(),
            None => Json(serde_json::json!({
                "title": serde_json::Value::Null,
                "swatches": [],
                "value_labels": [],
                "level_labels": [],
            }))
            .into_response(),
        },
        other => {
            let error = HazmapError::InvalidParameter {
                param: "format".to_string(),
                message: format!("unknown format: {}", other),
            };
            log_request_error(&error, "/legend", &request_id, None);
            error_response(&error, &request_id)
        }
    }
}

/// Parse comma-separated breakpoint values.
fn parse_breakpoints(raw: &str) -> Result<Vec<f64>> {
    raw.split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| HazmapError::InvalidParameter {
                    param: "breakpoints".to_string(),
                    message: format!("invalid breakpoint: {:?}", part),
                })
        })
        .collect()
}

/// Encode the legend strip as PNG; an absent legend becomes a blank strip.
fn encode_strip(legend: Option<&Legend>) -> Result<Vec<u8>> {
    let strip = match legend {
        Some(legend) => legend_strip(legend, STRIP_WIDTH, STRIP_HEIGHT),
        None => image::ImageBuffer::from_pixel(
            STRIP_WIDTH,
            STRIP_HEIGHT,
            image::Rgba([255, 255, 255, 255]),
        ),
    };

    let mut buffer = Vec::new();
    strip
        .write_to(
            &mut Cursor::new(&mut buffer),
            image::ImageOutputFormat::Png,
        )
        .map_err(|e| HazmapError::ImageGeneration {
            message: format!("PNG encoding failed: {}", e),
        })?;
    Ok(buffer)
}
