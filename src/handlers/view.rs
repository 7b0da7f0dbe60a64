//! View manipulation endpoints: layer switching and dataset swapping.
//!
//! These are the two event inputs of the interactive map. Both degrade
//! gracefully: an unknown layer or a failed fetch leaves the current view
//! exactly as it was.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::dataset::LayerId;
use crate::error::HazmapError;
use crate::handlers::error_response;
use crate::logging::{generate_request_id, log_dataset_load_stats, log_request_error};
use crate::state::AppState;

/// Query parameters for the layer endpoint
#[derive(Debug, Deserialize)]
pub struct LayerQuery {
    /// Layer id to activate
    pub id: LayerId,
}

/// Handle GET /layer requests
pub async fn layer_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LayerQuery>,
) -> Response {
    let request_id = generate_request_id();
    debug!(
        endpoint = "/layer",
        request_id = %request_id,
        id = params.id,
        "Processing layer switch"
    );

    let outcome = {
        let mut view = state.view.write();
        view.renderer.set_active_layer(params.id).map(|_| {
            let rendered = view
                .renderer
                .render_state()
                .map_or(0, |render| render.features.len());
            (view.dataset_key.clone(), rendered)
        })
    };

    match outcome {
        Ok((dataset_key, rendered_features)) => Json(serde_json::json!({
            "active_layer": params.id,
            "dataset": dataset_key,
            "rendered_features": rendered_features,
        }))
        .into_response(),
        Err(error) => {
            log_request_error(
                &error,
                "/layer",
                &request_id,
                Some(&format!("id={}", params.id)),
            );
            error_response(&error, &request_id)
        }
    }
}

/// Query parameters for the dataset endpoint
#[derive(Debug, Deserialize)]
pub struct DatasetQuery {
    /// Dataset key to fetch and show
    pub key: Option<String>,
    /// Clear the view instead of loading anything
    pub clear: Option<bool>,
}

/// Handle GET /dataset requests
pub async fn dataset_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DatasetQuery>,
) -> Response {
    let request_id = generate_request_id();
    debug!(
        endpoint = "/dataset",
        request_id = %request_id,
        key = ?params.key,
        clear = ?params.clear,
        "Processing dataset change"
    );

    if params.clear.unwrap_or(false) {
        state.clear_dataset();
        return Json(serde_json::json!({ "cleared": true })).into_response();
    }

    let key = match params.key {
        Some(key) => key,
        None => {
            let error = HazmapError::InvalidParameter {
                param: "key".to_string(),
                message: "either key or clear=true is required".to_string(),
            };
            log_request_error(&error, "/dataset", &request_id, None);
            return error_response(&error, &request_id);
        }
    };

    // Take a fetch ticket before awaiting; a later request supersedes this
    // one, and the apply below is skipped for superseded tickets
    let ticket = state.fetches.begin();

    match state.source.fetch(&key).await {
        Ok(collection) => {
            let feature_count = collection.len();
            let layers = collection.layers();
            let applied = state.apply_dataset(ticket, &key, collection);

            if applied {
                log_dataset_load_stats(
                    &key,
                    feature_count,
                    &layers,
                    state.view.read().data_memory_bytes(),
                );
            }

            Json(serde_json::json!({
                "key": key,
                "feature_count": feature_count,
                "layers": layers,
                "superseded": !applied,
            }))
            .into_response()
        }
        Err(error) => {
            // The previous dataset stays rendered; the failure is a notice,
            // not a destructive clear
            log_request_error(&error, "/dataset", &request_id, Some(&format!("key={}", key)));
            error_response(&error, &request_id)
        }
    }
}
