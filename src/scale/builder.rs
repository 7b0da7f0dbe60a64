//! Color scale construction.
//!
//! A [`ColorScale`] is a pure value-to-color function plus its defining
//! domain. The domain is derived from the data, not configured, and is held
//! in descending order `[max, min]`: the palette's first endpoint (red) is
//! bound to the data maximum and its last endpoint (green) to the minimum,
//! so high hazard reads as red. Callers must reproduce this inversion
//! exactly; flipping it silently inverts the color semantics.

use std::fmt;
use std::sync::Arc;

use crate::error::{HazmapError, Result};
use crate::scale::colormap::{color_hex, Colormap};

/// A continuous value-to-color mapping over a derived domain.
#[derive(Clone)]
pub struct ColorScale {
    /// Domain endpoints, descending: `(max, min)` of the source values
    domain: (f64, f64),
    colormap: Arc<dyn Colormap>,
}

impl ColorScale {
    /// Build a scale over a set of values.
    ///
    /// Non-finite entries are ignored. Fails with an empty-domain error when
    /// no finite value remains; that is a caller bug (rendering should have
    /// been skipped for an empty layer) and must not be swallowed into a
    /// default color.
    pub fn build(values: &[f64], colormap: Arc<dyn Colormap>) -> Result<Self> {
        let mut max = f64::NEG_INFINITY;
        let mut min = f64::INFINITY;

        for &value in values {
            if value.is_finite() {
                max = max.max(value);
                min = min.min(value);
            }
        }

        if !max.is_finite() || !min.is_finite() {
            return Err(HazmapError::EmptyDomain {
                message: format!("no finite values among {} inputs", values.len()),
            });
        }

        Ok(Self {
            domain: (max, min),
            colormap,
        })
    }

    /// The defining domain, descending: `(max, min)`.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Map a value to an RGBA color.
    ///
    /// A degenerate domain (single value, or all values equal) maps every
    /// input to the palette midpoint, never NaN.
    pub fn color(&self, value: f64) -> [u8; 4] {
        let (max, min) = self.domain;
        let normalized = if max > min {
            ((max - value) / (max - min)).clamp(0.0, 1.0)
        } else {
            0.5
        };
        self.colormap.map_normalized(normalized as f32)
    }

    /// Map a value to a lowercase CSS hex color string.
    pub fn color_hex(&self, value: f64) -> String {
        color_hex(self.color(value))
    }

    /// Name of the underlying palette.
    pub fn colormap_name(&self) -> &str {
        self.colormap.name()
    }
}

impl fmt::Debug for ColorScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColorScale")
            .field("domain", &self.domain)
            .field("colormap", &self.colormap.name())
            .finish()
    }
}
