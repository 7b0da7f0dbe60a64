//! Pure derivation of render state from a dataset and an active layer.
//!
//! `derive_render_state` is re-run whenever either input changes. The only
//! caching anywhere in the pipeline is [`RenderMemo`], which remembers the
//! last `(collection, layer)` pair to avoid redundant recomputation on
//! unrelated repaints.

use std::sync::Arc;

use tracing::{debug, error};

use crate::dataset::{Feature, FeatureCollection, LayerId};
use crate::layer::filter_layer;
use crate::scale::{ColorScale, Colormap};

/// Everything needed to paint one layer: the renderable features and the
/// color scale derived from their values. Immutable once built.
#[derive(Debug)]
pub struct RenderState {
    /// The layer this state was derived for
    pub layer: LayerId,
    /// Features of the active layer that carry a defined value, source order
    pub features: Vec<Feature>,
    /// Scale over the rendered features' values, domain descending
    pub scale: ColorScale,
}

/// Derive the render state for one layer of a dataset.
///
/// Features without a defined value are excluded before the color domain is
/// computed and are not painted. Returns `None` when the layer has nothing
/// to paint, which is the expected outcome for an empty or unknown layer,
/// not an error.
pub fn derive_render_state(
    collection: &FeatureCollection,
    layer: LayerId,
    colormap: &Arc<dyn Colormap>,
) -> Option<RenderState> {
    let filtered = filter_layer(collection, layer);

    let mut features: Vec<Feature> = Vec::with_capacity(filtered.len());
    let mut skipped = 0usize;
    for feature in filtered.features {
        if feature.value.is_some() {
            features.push(feature);
        } else {
            skipped += 1;
        }
    }

    if skipped > 0 {
        debug!(
            layer = layer,
            skipped = skipped,
            "Excluding features without a value from the color domain"
        );
    }

    if features.is_empty() {
        debug!(layer = layer, "Nothing to paint for this layer");
        return None;
    }

    let values: Vec<f64> = features.iter().filter_map(|f| f.value).collect();
    let scale = match ColorScale::build(&values, colormap.clone()) {
        Ok(scale) => scale,
        Err(e) => {
            // Unreachable given the emptiness check above; degrade to an
            // empty render rather than propagating into the view.
            error!(layer = layer, error = %e, "Color scale derivation failed");
            return None;
        }
    };

    Some(RenderState {
        layer,
        features,
        scale,
    })
}

/// Memoizes the last derivation.
///
/// Keyed by the dataset's allocation identity and the layer id; a dataset
/// swap or layer switch misses, an unrelated repaint hits.
#[derive(Debug, Default)]
pub struct RenderMemo {
    key: Option<(usize, LayerId)>,
    state: Option<Arc<RenderState>>,
}

impl RenderMemo {
    /// Return the memoized state for `(collection, layer)`, deriving it on a
    /// miss. `None` is memoized too: an empty layer stays empty until an
    /// input changes.
    pub fn get_or_derive(
        &mut self,
        collection: &Arc<FeatureCollection>,
        layer: LayerId,
        colormap: &Arc<dyn Colormap>,
    ) -> Option<Arc<RenderState>> {
        let key = (Arc::as_ptr(collection) as usize, layer);
        if self.key != Some(key) {
            self.state = derive_render_state(collection, layer, colormap).map(Arc::new);
            self.key = Some(key);
        }
        self.state.clone()
    }

    /// Drop the memoized entry (used when the dataset is cleared).
    pub fn invalidate(&mut self) {
        self.key = None;
        self.state = None;
    }
}
