//! Colormap trait and utilities.
//!
//! This module defines the common interface for all colormaps.

use std::sync::Arc;

use crate::error::{HazmapError, Result};

/// Trait for color mapping implementations
pub trait Colormap: Send + Sync {
    /// Map a normalized value (0.0 to 1.0) to an RGBA color
    fn map_normalized(&self, value: f32) -> [u8; 4];

    /// Get the name of this colormap
    fn name(&self) -> &str;
}

/// Get a colormap by name
pub fn get_colormap(name: &str) -> Result<Arc<dyn Colormap>> {
    use super::diverging::*;

    match name.to_lowercase().as_str() {
        "rdylgn" => Ok(Arc::new(RdYlGn)),
        "rdylbu" => Ok(Arc::new(RdYlBu)),
        _ => Err(HazmapError::InvalidParameter {
            param: "colormap".to_string(),
            message: format!("Unknown colormap: {}", name),
        }),
    }
}

/// Linear interpolation between two colors
pub fn lerp_color(c1: [u8; 3], c2: [u8; 3], t: f32) -> [u8; 3] {
    [
        (c1[0] as f32 * (1.0 - t) + c2[0] as f32 * t) as u8,
        (c1[1] as f32 * (1.0 - t) + c2[1] as f32 * t) as u8,
        (c1[2] as f32 * (1.0 - t) + c2[2] as f32 * t) as u8,
    ]
}

/// Format an RGBA color as a lowercase CSS hex string (alpha dropped)
pub fn color_hex(color: [u8; 4]) -> String {
    format!("#{:02x}{:02x}{:02x}", color[0], color[1], color[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_color() {
        let black = [0, 0, 0];
        let white = [255, 255, 255];

        let mid = lerp_color(black, white, 0.5);
        assert_eq!(mid[0], 127);
        assert_eq!(mid[1], 127);
        assert_eq!(mid[2], 127);
    }

    #[test]
    fn test_color_hex() {
        assert_eq!(color_hex([165, 0, 38, 255]), "#a50026");
        assert_eq!(color_hex([255, 255, 191, 255]), "#ffffbf");
    }

    #[test]
    fn test_get_colormap_unknown() {
        assert!(get_colormap("viridis").is_err());
    }
}
