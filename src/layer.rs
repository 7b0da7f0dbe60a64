//! Administrative layer filtering.
//!
//! A dataset mixes features from several administrative granularities; the
//! map only ever shows one granularity at a time. [`filter_layer`] selects
//! the features of the active layer, and [`LayerSet`] describes the layers
//! the view is configured to switch between.

use crate::dataset::{FeatureCollection, LayerId};

/// Select every feature belonging to `layer`, preserving source order.
///
/// The input collection is left untouched, so callers may re-filter
/// repeatedly as the user cycles layers. An empty result means "nothing to
/// paint for this layer" and is not an error.
pub fn filter_layer(collection: &FeatureCollection, layer: LayerId) -> FeatureCollection {
    FeatureCollection {
        features: collection
            .features
            .iter()
            .filter(|f| f.layer == layer)
            .cloned()
            .collect(),
    }
}

/// The fixed set of administrative layers a view can switch between.
#[derive(Debug, Clone)]
pub struct LayerSet {
    ids: Vec<LayerId>,
    default: LayerId,
}

impl LayerSet {
    /// Build a layer set. The default must be one of the configured ids;
    /// config validation enforces this before a renderer is constructed.
    pub fn new(ids: Vec<LayerId>, default: LayerId) -> Self {
        Self { ids, default }
    }

    /// Whether `layer` is one of the configured ids.
    pub fn contains(&self, layer: LayerId) -> bool {
        self.ids.contains(&layer)
    }

    /// The configured ids, in configuration order.
    pub fn ids(&self) -> &[LayerId] {
        &self.ids
    }

    /// The initially-active layer.
    pub fn default_layer(&self) -> LayerId {
        self.default
    }
}

impl Default for LayerSet {
    fn default() -> Self {
        // Admin0 (national) through Admin2, starting on Admin1
        Self::new(vec![0, 1, 2], 1)
    }
}
