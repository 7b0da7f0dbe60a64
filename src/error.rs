//! Error types for the hazmap application.
//!
//! This module defines a comprehensive error enum that covers all possible
//! error conditions in the application. The three map-facing conditions
//! (empty color domain, dataset fetch failure, unknown layer) are recoverable
//! at the component boundary and must never crash the surrounding view.

use thiserror::Error;

/// The main error type for hazmap operations.
#[derive(Error, Debug)]
pub enum HazmapError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Attempted to build a color scale over zero values. This is a caller
    /// bug: rendering must be skipped entirely when a layer has no values.
    #[error("Empty color domain: {message}")]
    EmptyDomain { message: String },

    /// The external dataset source failed or returned malformed data.
    /// Recovered by keeping the previous view; reported as a notice.
    #[error("Dataset fetch failed for '{key}': {message}")]
    DatasetFetch { key: String, message: String },

    /// A layer id outside the configured set was requested. Treated as a
    /// no-op with an empty render, never a fatal fault.
    #[error("Unknown layer id {layer}, configured layers: {configured:?}")]
    UnknownLayer { layer: i64, configured: Vec<i64> },

    /// Invalid parameter errors
    #[error("Invalid parameter: {param} - {message}")]
    InvalidParameter { param: String, message: String },

    /// Data not found errors
    #[error("Data not found: {message}")]
    DataNotFound { message: String },

    /// Image generation errors
    #[error("Image generation error: {message}")]
    ImageGeneration { message: String },

    /// GeoJSON parse errors
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Server errors
    #[error("Server error: {message}")]
    Server { message: String },
}

impl HazmapError {
    /// Whether this error is recoverable at the view boundary, i.e. the map
    /// degrades to an empty or unchanged render instead of failing the UI.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            HazmapError::EmptyDomain { .. }
                | HazmapError::DatasetFetch { .. }
                | HazmapError::UnknownLayer { .. }
        )
    }
}

/// Convenience type alias for Results with HazmapError
pub type Result<T> = std::result::Result<T, HazmapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        let fetch = HazmapError::DatasetFetch {
            key: "flood_eg".to_string(),
            message: "connection refused".to_string(),
        };
        assert!(fetch.is_recoverable());

        let unknown = HazmapError::UnknownLayer {
            layer: 7,
            configured: vec![0, 1, 2],
        };
        assert!(unknown.is_recoverable());

        let config = HazmapError::Config {
            message: "bad port".to_string(),
        };
        assert!(!config.is_recoverable());
    }

    #[test]
    fn test_error_display() {
        let err = HazmapError::EmptyDomain {
            message: "layer 2 produced no values".to_string(),
        };
        assert!(err.to_string().contains("Empty color domain"));
    }
}
