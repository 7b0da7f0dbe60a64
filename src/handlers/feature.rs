//! Per-feature inspection endpoint handler.
//!
//! Returns the inspection popup content for one rendered feature of the
//! current view: its identifier and value as plain text.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::error::HazmapError;
use crate::handlers::error_response;
use crate::logging::{generate_request_id, log_request_error};
use crate::render::style_features;
use crate::state::AppState;

/// Query parameters for the feature endpoint
#[derive(Debug, Deserialize)]
pub struct FeatureQuery {
    /// Regional identifier to inspect
    pub id: String,
}

/// Response for a feature inspection
#[derive(Debug, Serialize)]
pub struct FeatureResponse {
    pub id: String,
    pub value: f64,
    /// Plain-text popup content
    pub popup: String,
}

/// Handle GET /feature requests
pub async fn feature_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FeatureQuery>,
) -> Response {
    let request_id = generate_request_id();
    debug!(
        endpoint = "/feature",
        request_id = %request_id,
        id = %params.id,
        "Processing feature inspection"
    );

    let found = {
        let mut view = state.view.write();
        view.renderer.render_state().and_then(|render| {
            style_features(&render)
                .iter()
                .find(|styled| styled.id == params.id)
                .map(|styled| FeatureResponse {
                    id: styled.id.to_string(),
                    value: styled.value,
                    popup: styled.popup_text(),
                })
        })
    };

    match found {
        Some(response) => Json(response).into_response(),
        None => {
            let error = HazmapError::DataNotFound {
                message: format!("no rendered feature with id {:?}", params.id),
            };
            log_request_error(
                &error,
                "/feature",
                &request_id,
                Some(&format!("id={}", params.id)),
            );
            error_response(&error, &request_id)
        }
    }
}
