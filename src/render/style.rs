//! Per-feature styling.
//!
//! Fill color is the one data-encoded channel; stroke width and color are
//! fixed for all features and exist purely for visual separation.

use crate::render::derive::RenderState;

/// Fraction of full opacity applied to region fills
pub const FILL_OPACITY: f32 = 0.7;

/// Stroke width in pixels, identical for every feature
pub const STROKE_WIDTH: u32 = 2;

/// Stroke color, identical for every feature
pub const STROKE_COLOR: [u8; 4] = [255, 255, 255, 255];

/// One feature resolved to its drawable form: geometry plus fill color and
/// the inspection text shown on demand.
#[derive(Debug, Clone)]
pub struct StyledFeature<'a> {
    /// Stable regional identifier
    pub id: &'a str,
    /// The feature's value under the current scenario
    pub value: f64,
    /// Fill color from the active scale, alpha premultiplied by the fixed
    /// fill opacity
    pub fill: [u8; 4],
    /// Boundary geometry, passed through unchanged
    pub geometry: &'a geojson::Geometry,
}

impl StyledFeature<'_> {
    /// Plain-text inspection popup content for this feature.
    pub fn popup_text(&self) -> String {
        format!("Name: {}\nValue: {}", self.id, self.value)
    }
}

/// Resolve every feature of a derived render state to its drawable form.
pub fn style_features(state: &RenderState) -> Vec<StyledFeature<'_>> {
    let alpha = (FILL_OPACITY * 255.0) as u8;

    state
        .features
        .iter()
        .filter_map(|feature| {
            // Render states only hold features with defined values
            let value = feature.value?;
            let mut fill = state.scale.color(value);
            fill[3] = alpha;
            Some(StyledFeature {
                id: &feature.id,
                value,
                fill,
                geometry: &feature.geometry,
            })
        })
        .collect()
}
