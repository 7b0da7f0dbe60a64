//! Color scale construction for choropleth rendering.
//!
//! This module maps per-region hazard values to colors: a diverging palette
//! sampled through a domain derived from the data, deliberately ordered
//! descending so that high values land on the "bad" (red) end.

pub mod builder;
pub mod colormap;
pub mod diverging;

pub use builder::ColorScale;
pub use colormap::{color_hex, get_colormap, Colormap};

// Re-export the available palettes
pub use diverging::{RdYlBu, RdYlGn};
