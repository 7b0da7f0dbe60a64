//! The interactive choropleth renderer.
//!
//! Holds the current dataset and active layer, derives render state through
//! the memoized pipeline, and paints onto whatever [`RenderSurface`] the
//! caller supplies. Layer transitions happen only through explicit
//! `set_active_layer` calls; dataset swaps replace the collection wholesale.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::dataset::{FeatureCollection, LayerId};
use crate::error::{HazmapError, Result};
use crate::layer::LayerSet;
use crate::render::derive::{RenderMemo, RenderState};
use crate::render::style::style_features;
use crate::render::RenderSurface;
use crate::scale::Colormap;

/// Stateful renderer for one interactive map view.
pub struct ChoroplethRenderer {
    layers: LayerSet,
    colormap: Arc<dyn Colormap>,
    active_layer: LayerId,
    dataset: Option<Arc<FeatureCollection>>,
    memo: RenderMemo,
}

impl ChoroplethRenderer {
    /// Create a renderer with no dataset, starting on the layer set's
    /// default layer.
    pub fn new(layers: LayerSet, colormap: Arc<dyn Colormap>) -> Self {
        let active_layer = layers.default_layer();
        Self {
            layers,
            colormap,
            active_layer,
            dataset: None,
            memo: RenderMemo::default(),
        }
    }

    /// The currently active layer.
    pub fn active_layer(&self) -> LayerId {
        self.active_layer
    }

    /// The configured layer set.
    pub fn layers(&self) -> &LayerSet {
        &self.layers
    }

    /// The current dataset, if any.
    pub fn dataset(&self) -> Option<&Arc<FeatureCollection>> {
        self.dataset.as_ref()
    }

    /// Switch the active layer.
    ///
    /// Calling with the already-active layer is a no-op repaint. A layer id
    /// outside the configured set is rejected without transitioning; the
    /// caller degrades to an empty render, mirroring "no features matched".
    pub fn set_active_layer(&mut self, layer: LayerId) -> Result<()> {
        if !self.layers.contains(layer) {
            warn!(
                layer = layer,
                configured = ?self.layers.ids(),
                "Rejecting unknown layer id"
            );
            return Err(HazmapError::UnknownLayer {
                layer,
                configured: self.layers.ids().to_vec(),
            });
        }

        if layer == self.active_layer {
            debug!(layer = layer, "Layer already active");
            return Ok(());
        }

        info!(
            from = self.active_layer,
            to = layer,
            "Switching active layer"
        );
        self.active_layer = layer;
        Ok(())
    }

    /// Replace the dataset wholesale. `None` clears the view entirely so no
    /// stale paint survives a failed or absent selection.
    pub fn set_dataset(&mut self, dataset: Option<Arc<FeatureCollection>>) {
        match &dataset {
            Some(collection) => {
                info!(features = collection.len(), "Dataset replaced");
            }
            None => {
                info!("Dataset cleared");
                self.memo.invalidate();
            }
        }
        self.dataset = dataset;
    }

    /// Derive (or reuse) the render state for the current dataset and layer.
    /// `None` means there is nothing to paint.
    pub fn render_state(&mut self) -> Option<Arc<RenderState>> {
        let dataset = self.dataset.clone()?;
        self.memo
            .get_or_derive(&dataset, self.active_layer, &self.colormap)
    }

    /// Repaint the surface from the current state: styled features when the
    /// layer has content, a cleared surface otherwise.
    pub fn repaint(&mut self, surface: &mut dyn RenderSurface) {
        match self.render_state() {
            Some(state) => {
                let styled = style_features(&state);
                surface.paint(&styled);
            }
            None => surface.clear(),
        }
    }
}
