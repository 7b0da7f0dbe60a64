//! Choropleth rendering pipeline.
//!
//! The pipeline is: filter the dataset to the active layer, derive a color
//! scale from the filtered values, style each feature, and hand the styled
//! features to a rendering surface. The legend is driven by the same derived
//! scale so map and legend can never diverge.

pub mod choropleth;
pub mod derive;
pub mod legend;
pub mod raster;
pub mod style;

pub use choropleth::ChoroplethRenderer;
pub use derive::{derive_render_state, RenderMemo, RenderState};
pub use legend::{percentile_breakpoints, render_legend, Legend, LegendSpec, LegendSwatch};
pub use raster::ImageSurface;
pub use style::{style_features, StyledFeature};

/// A surface that styled features are painted onto.
///
/// Implementations own the actual drawing (raster, vector, a test recorder);
/// the renderer only decides what to paint.
pub trait RenderSurface {
    /// Replace the surface contents with the given styled features.
    fn paint(&mut self, features: &[StyledFeature<'_>]);

    /// Reset the surface to its empty state.
    fn clear(&mut self);
}
