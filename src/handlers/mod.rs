//! HTTP request handlers for the hazmap API.
//!
//! This module contains all the endpoint handlers for the web server. The
//! server is the UI boundary of the map view: layer-switch and dataset
//! events arrive here and are forwarded to the renderer, and the rendered
//! map and legend are served back.

pub mod feature;
pub mod heartbeat;
pub mod legend;
pub mod map;
pub mod metadata;
pub mod view;

pub use feature::feature_handler;
pub use heartbeat::heartbeat_handler;
pub use legend::legend_handler;
pub use map::map_handler;
pub use metadata::metadata_handler;
pub use view::{dataset_handler, layer_handler};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error::HazmapError;

/// Map an error to its HTTP response.
///
/// Recoverable view errors degrade to a JSON notice; nothing here panics or
/// propagates into the server shell.
pub(crate) fn error_response(error: &HazmapError, request_id: &str) -> Response {
    let status = match error {
        HazmapError::DatasetFetch { .. } => StatusCode::BAD_GATEWAY,
        HazmapError::DataNotFound { .. } => StatusCode::NOT_FOUND,
        HazmapError::UnknownLayer { .. } | HazmapError::InvalidParameter { .. } => {
            StatusCode::BAD_REQUEST
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status,
        Json(serde_json::json!({
            "error": error.to_string(),
            "request_id": request_id
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let fetch = HazmapError::DatasetFetch {
            key: "x".to_string(),
            message: "boom".to_string(),
        };
        assert_eq!(
            error_response(&fetch, "rid").status(),
            StatusCode::BAD_GATEWAY
        );

        let unknown = HazmapError::UnknownLayer {
            layer: 9,
            configured: vec![0, 1, 2],
        };
        assert_eq!(
            error_response(&unknown, "rid").status(),
            StatusCode::BAD_REQUEST
        );

        let missing = HazmapError::DataNotFound {
            message: "no such feature".to_string(),
        };
        assert_eq!(
            error_response(&missing, "rid").status(),
            StatusCode::NOT_FOUND
        );
    }
}
