//! Raster rendering surface.
//!
//! Projects feature polygons into pixel space with an equirectangular fit
//! over the dataset's bounding box, scanline-fills each region with its
//! styled color over a neutral background, and strokes ring outlines.

use std::io::Cursor;

use image::{ImageBuffer, Rgba, RgbaImage};
use tracing::debug;

use crate::dataset::{geometry_bounds, Bounds};
use crate::error::{HazmapError, Result};
use crate::render::style::{StyledFeature, STROKE_COLOR, STROKE_WIDTH};
use crate::render::RenderSurface;

/// Background color for pixels no region covers
pub const BACKGROUND: [u8; 4] = [240, 240, 240, 255];

/// A fixed-size RGBA canvas implementing [`RenderSurface`].
pub struct ImageSurface {
    width: u32,
    height: u32,
    bounds: Option<Bounds>,
    image: RgbaImage,
}

impl ImageSurface {
    /// Create a surface that fits its projection to whatever features are
    /// painted onto it.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bounds: None,
            image: ImageBuffer::from_pixel(width, height, Rgba(BACKGROUND)),
        }
    }

    /// Create a surface with a fixed geographic window.
    pub fn with_bounds(width: u32, height: u32, bounds: Bounds) -> Self {
        Self {
            bounds: Some(bounds),
            ..Self::new(width, height)
        }
    }

    /// The rendered canvas.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Consume the surface, yielding the canvas.
    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Encode the canvas as PNG bytes.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.image
            .write_to(
                &mut Cursor::new(&mut buffer),
                image::ImageOutputFormat::Png,
            )
            .map_err(|e| HazmapError::ImageGeneration {
                message: format!("PNG encoding failed: {}", e),
            })?;
        Ok(buffer)
    }
}

impl RenderSurface for ImageSurface {
    fn paint(&mut self, features: &[StyledFeature<'_>]) {
        self.clear();

        let bounds = match self.bounds.or_else(|| features_bounds(features)) {
            Some(b) => b,
            None => {
                debug!("No polygonal features to paint");
                return;
            }
        };
        let projection = Projection::fit(bounds, self.width, self.height);

        for feature in features {
            let rings = project_rings(feature.geometry, &projection);
            if rings.is_empty() {
                debug!(id = feature.id, "Skipping non-polygonal geometry");
                continue;
            }
            fill_rings(&mut self.image, &rings, feature.fill);
        }

        // Stroke after all fills so shared boundaries stay visible
        for feature in features {
            for ring in project_rings(feature.geometry, &projection) {
                stroke_ring(&mut self.image, &ring);
            }
        }
    }

    fn clear(&mut self) {
        self.image = ImageBuffer::from_pixel(self.width, self.height, Rgba(BACKGROUND));
    }
}

/// Bounding box over the painted features' geometries.
fn features_bounds(features: &[StyledFeature<'_>]) -> Option<Bounds> {
    let mut bounds: Option<Bounds> = None;
    for feature in features {
        if let Some(b) = geometry_bounds(feature.geometry) {
            match bounds.as_mut() {
                Some(acc) => acc.merge(&b),
                None => bounds = Some(b),
            }
        }
    }
    bounds
}

/// Linear lon/lat to pixel mapping, north up.
struct Projection {
    bounds: Bounds,
    x_scale: f64,
    y_scale: f64,
}

impl Projection {
    fn fit(mut bounds: Bounds, width: u32, height: u32) -> Self {
        // A degenerate span (single point or a horizontal/vertical line of
        // coordinates) gets a half-degree pad to keep the mapping finite
        if bounds.max_lon <= bounds.min_lon {
            bounds.min_lon -= 0.5;
            bounds.max_lon += 0.5;
        }
        if bounds.max_lat <= bounds.min_lat {
            bounds.min_lat -= 0.5;
            bounds.max_lat += 0.5;
        }

        Self {
            bounds,
            x_scale: (width.saturating_sub(1)).max(1) as f64 / (bounds.max_lon - bounds.min_lon),
            y_scale: (height.saturating_sub(1)).max(1) as f64 / (bounds.max_lat - bounds.min_lat),
        }
    }

    fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        (
            (lon - self.bounds.min_lon) * self.x_scale,
            (self.bounds.max_lat - lat) * self.y_scale,
        )
    }
}

/// Project every ring of a polygonal geometry into pixel coordinates.
/// Non-polygonal geometries yield no rings.
fn project_rings(geometry: &geojson::Geometry, projection: &Projection) -> Vec<Vec<(f64, f64)>> {
    let mut rings = Vec::new();

    let mut push_ring = |ring: &Vec<Vec<f64>>| {
        let projected: Vec<(f64, f64)> = ring
            .iter()
            .filter(|position| position.len() >= 2)
            .map(|position| projection.project(position[0], position[1]))
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect();
        if projected.len() >= 3 {
            rings.push(projected);
        }
    };

    match &geometry.value {
        geojson::Value::Polygon(polygon) => {
            for ring in polygon {
                push_ring(ring);
            }
        }
        geojson::Value::MultiPolygon(polygons) => {
            for polygon in polygons {
                for ring in polygon {
                    push_ring(ring);
                }
            }
        }
        _ => {}
    }

    rings
}

/// Even-odd scanline fill over a set of rings. Holes fall out of the
/// even-odd rule without special casing.
fn fill_rings(image: &mut RgbaImage, rings: &[Vec<(f64, f64)>], fill: [u8; 4]) {
    let height = image.height();
    let width = image.width();

    for y in 0..height {
        let scan_y = y as f64;

        let mut crossings: Vec<f64> = Vec::new();
        for ring in rings {
            for window in ring.windows(2) {
                let (x1, y1) = window[0];
                let (x2, y2) = window[1];
                if (y1 <= scan_y) != (y2 <= scan_y) {
                    let t = (scan_y - y1) / (y2 - y1);
                    crossings.push(x1 + t * (x2 - x1));
                }
            }
        }

        crossings.sort_by(|a, b| a.total_cmp(b));

        for pair in crossings.chunks_exact(2) {
            let x_start = pair[0].ceil().max(0.0) as u32;
            let x_end = pair[1].floor().min(width as f64 - 1.0);
            if x_end < 0.0 {
                continue;
            }
            for x in x_start..=x_end as u32 {
                blend_pixel(image, x, y, fill);
            }
        }
    }
}

/// Stroke one ring's edges with the fixed stroke style.
fn stroke_ring(image: &mut RgbaImage, ring: &[(f64, f64)]) {
    for window in ring.windows(2) {
        draw_line(image, window[0], window[1]);
    }
}

/// Straight line via uniform stepping, thickened to the stroke width.
fn draw_line(image: &mut RgbaImage, from: (f64, f64), to: (f64, f64)) {
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as u32;

    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        let x = from.0 + dx * t;
        let y = from.1 + dy * t;
        for ox in 0..STROKE_WIDTH {
            for oy in 0..STROKE_WIDTH {
                let px = x.floor() as i64 + ox as i64;
                let py = y.floor() as i64 + oy as i64;
                if px >= 0 && py >= 0 && (px as u32) < image.width() && (py as u32) < image.height()
                {
                    image.put_pixel(px as u32, py as u32, Rgba(STROKE_COLOR));
                }
            }
        }
    }
}

/// Composite a translucent color over the existing pixel.
fn blend_pixel(image: &mut RgbaImage, x: u32, y: u32, color: [u8; 4]) {
    let alpha = color[3] as f32 / 255.0;
    let existing = image.get_pixel(x, y).0;
    let blended = [
        (color[0] as f32 * alpha + existing[0] as f32 * (1.0 - alpha)).round() as u8,
        (color[1] as f32 * alpha + existing[1] as f32 * (1.0 - alpha)).round() as u8,
        (color[2] as f32 * alpha + existing[2] as f32 * (1.0 - alpha)).round() as u8,
        255,
    ];
    image.put_pixel(x, y, Rgba(blended));
}
