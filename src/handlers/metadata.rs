//! Metadata endpoint handler.
//!
//! Returns a summary of the current view: the loaded dataset's layers with
//! per-layer feature counts and value ranges, plus the view configuration.

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::dataset::{FeatureCollection, LayerId};
use crate::state::AppState;

/// Per-layer summary
#[derive(Debug, Serialize)]
pub struct LayerMetadata {
    /// Layer id
    pub id: LayerId,
    /// Features belonging to this layer
    pub feature_count: usize,
    /// Features excluded from rendering for lack of a value
    pub missing_values: usize,
    /// Smallest defined value, if any
    pub min_value: Option<f64>,
    /// Largest defined value, if any
    pub max_value: Option<f64>,
}

/// Summary of the loaded dataset
#[derive(Debug, Serialize)]
pub struct DatasetMetadata {
    /// Dataset key
    pub key: String,
    /// Total feature count across all layers
    pub feature_count: usize,
    /// Bounding box as [min_lon, min_lat, max_lon, max_lat]
    pub bounds: Option<[f64; 4]>,
    /// Per-layer summaries, ascending by layer id
    pub layers: Vec<LayerMetadata>,
}

/// Response for the metadata endpoint
#[derive(Debug, Serialize)]
pub struct MetadataResponse {
    /// Loaded dataset summary, absent when the view is empty
    pub dataset: Option<DatasetMetadata>,
    /// Currently-active layer
    pub active_layer: LayerId,
    /// Layers the view can switch between
    pub configured_layers: Vec<LayerId>,
    /// Palette in use
    pub colormap: String,
}

/// Handle GET /metadata requests
pub async fn metadata_handler(State(state): State<Arc<AppState>>) -> Json<MetadataResponse> {
    let view = state.view.read();

    let dataset = view.renderer.dataset().map(|collection| DatasetMetadata {
        key: view.dataset_key.clone().unwrap_or_default(),
        feature_count: collection.len(),
        bounds: collection
            .bounds()
            .map(|b| [b.min_lon, b.min_lat, b.max_lon, b.max_lat]),
        layers: summarize_layers(collection),
    });

    Json(MetadataResponse {
        dataset,
        active_layer: view.renderer.active_layer(),
        configured_layers: view.renderer.layers().ids().to_vec(),
        colormap: state.config.map.colormap.clone(),
    })
}

/// Build per-layer summaries for every layer present in the collection.
fn summarize_layers(collection: &FeatureCollection) -> Vec<LayerMetadata> {
    collection
        .layers()
        .into_iter()
        .map(|id| {
            let mut feature_count = 0;
            let mut missing_values = 0;
            let mut min_value: Option<f64> = None;
            let mut max_value: Option<f64> = None;

            for feature in collection.features.iter().filter(|f| f.layer == id) {
                feature_count += 1;
                match feature.value {
                    Some(value) => {
                        min_value = Some(min_value.map_or(value, |m| m.min(value)));
                        max_value = Some(max_value.map_or(value, |m| m.max(value)));
                    }
                    None => missing_values += 1,
                }
            }

            LayerMetadata {
                id,
                feature_count,
                missing_values,
                min_value,
                max_value,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_layers() {
        let collection = FeatureCollection::from_geojson(
            r#"{
                "type": "FeatureCollection",
                "features": [
                    {
                        "type": "Feature",
                        "properties": {"layer": 1, "value": 5.0, "id": "a"},
                        "geometry": {"type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]}
                    },
                    {
                        "type": "Feature",
                        "properties": {"layer": 1, "value": 15.0, "id": "b"},
                        "geometry": {"type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]}
                    },
                    {
                        "type": "Feature",
                        "properties": {"layer": 2, "id": "c"},
                        "geometry": {"type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]}
                    }
                ]
            }"#,
        )
        .unwrap();

        let layers = summarize_layers(&collection);
        assert_eq!(layers.len(), 2);

        assert_eq!(layers[0].id, 1);
        assert_eq!(layers[0].feature_count, 2);
        assert_eq!(layers[0].min_value, Some(5.0));
        assert_eq!(layers[0].max_value, Some(15.0));

        assert_eq!(layers[1].id, 2);
        assert_eq!(layers[1].missing_values, 1);
        assert_eq!(layers[1].min_value, None);
    }
}
