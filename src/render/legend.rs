//! Legend rendering.
//!
//! The legend is driven by the same color scale as the map, evaluated at a
//! sequence of breakpoint values. Swatches keep the caller's input order;
//! the numeric labels flip when the input is descending so they always read
//! low-to-high, left-to-right. That decoupling is intentional and load
//! bearing: it keeps label direction human-readable regardless of how the
//! caller ordered its breakpoints.

use image::{ImageBuffer, Rgba, RgbaImage};

use crate::scale::ColorScale;

/// Caller-supplied legend description.
#[derive(Debug, Clone)]
pub struct LegendSpec {
    /// Breakpoint values of the distribution, in the caller's order
    pub percentile_values: Vec<f64>,
    /// Human-readable legend title
    pub title: String,
}

/// One color block of the legend strip.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendSwatch {
    /// Color of this block, from the shared scale
    pub color: [u8; 4],
    /// Fraction of the strip this block occupies (always `1 / count`)
    pub width_fraction: f64,
}

/// A fully-resolved legend, ready for a rendering surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub title: String,
    /// Swatches in the spec's input order
    pub swatches: Vec<LegendSwatch>,
    /// Numeric labels, always reading low to high
    pub value_labels: Vec<f64>,
    /// "Level 1".."Level N" in positional order
    pub level_labels: Vec<String>,
}

/// Resolve a legend spec against a color scale.
///
/// Pure and stateless: identical inputs produce identical legends.
pub fn render_legend(spec: &LegendSpec, scale: &ColorScale) -> Legend {
    let count = spec.percentile_values.len();
    if count == 0 {
        return Legend {
            title: spec.title.clone(),
            swatches: Vec::new(),
            value_labels: Vec::new(),
            level_labels: Vec::new(),
        };
    }

    let is_ascending = spec.percentile_values[0] < spec.percentile_values[count - 1];

    let swatches = spec
        .percentile_values
        .iter()
        .map(|&value| LegendSwatch {
            color: scale.color(value),
            width_fraction: 1.0 / count as f64,
        })
        .collect();

    // Swatches keep input order; only the labels may flip
    let value_labels = if is_ascending {
        spec.percentile_values.clone()
    } else {
        let mut reversed = spec.percentile_values.clone();
        reversed.reverse();
        reversed
    };

    let level_labels = (1..=count).map(|i| format!("Level {}", i)).collect();

    Legend {
        title: spec.title.clone(),
        swatches,
        value_labels,
        level_labels,
    }
}

/// Legend breakpoints for a value distribution: interior percentiles at
/// `100 * i / classes` with 0 prepended, rounded to one decimal. Five
/// classes yield `[0, p20, p40, p60, p80]`.
pub fn percentile_breakpoints(values: &[f64], classes: usize) -> Vec<f64> {
    let mut finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || classes == 0 {
        return Vec::new();
    }
    finite.sort_by(|a, b| a.total_cmp(b));

    let mut breakpoints = Vec::with_capacity(classes);
    breakpoints.push(0.0);
    for i in 1..classes {
        let p = 100.0 * i as f64 / classes as f64;
        breakpoints.push(round1(percentile(&finite, p)));
    }
    breakpoints
}

/// Linearly-interpolated percentile of sorted values.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        sorted[lower] + (rank - lower as f64) * (sorted[upper] - sorted[lower])
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Rasterize the legend's swatch row as a horizontal strip. Numeric and
/// level labels travel in the structured [`Legend`], not in the strip.
pub fn legend_strip(legend: &Legend, width: u32, height: u32) -> RgbaImage {
    let mut image = ImageBuffer::from_pixel(width, height, Rgba([255, 255, 255, 255]));
    let count = legend.swatches.len();
    if count == 0 {
        return image;
    }

    for (index, swatch) in legend.swatches.iter().enumerate() {
        let x_start = (index as u32 * width) / count as u32;
        let x_end = ((index as u32 + 1) * width) / count as u32;
        for x in x_start..x_end {
            for y in 0..height {
                image.put_pixel(x, y, Rgba(swatch.color));
            }
        }
    }

    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::get_colormap;
    use pretty_assertions::assert_eq;

    fn scale() -> ColorScale {
        ColorScale::build(&[10.0, 20.0, 30.0], get_colormap("rdylgn").unwrap()).unwrap()
    }

    fn spec(values: Vec<f64>) -> LegendSpec {
        LegendSpec {
            percentile_values: values,
            title: "Flood depth".to_string(),
        }
    }

    #[test]
    fn test_ascending_keeps_label_order() {
        let s = scale();
        let legend = render_legend(&spec(vec![10.0, 20.0, 30.0]), &s);

        let colors: Vec<[u8; 4]> = legend.swatches.iter().map(|sw| sw.color).collect();
        assert_eq!(colors, vec![s.color(10.0), s.color(20.0), s.color(30.0)]);
        assert_eq!(legend.value_labels, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_descending_flips_labels_but_not_swatches() {
        let s = scale();
        let legend = render_legend(&spec(vec![30.0, 20.0, 10.0]), &s);

        // Swatches keep the input order
        let colors: Vec<[u8; 4]> = legend.swatches.iter().map(|sw| sw.color).collect();
        assert_eq!(colors, vec![s.color(30.0), s.color(20.0), s.color(10.0)]);
        // Labels are reversed so they read low to high
        assert_eq!(legend.value_labels, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_equal_width_fractions() {
        let legend = render_legend(&spec(vec![10.0, 20.0, 30.0, 40.0]), &scale());
        for swatch in &legend.swatches {
            assert_eq!(swatch.width_fraction, 0.25);
        }
    }

    #[test]
    fn test_level_labels_are_positional() {
        let legend = render_legend(&spec(vec![30.0, 20.0, 10.0]), &scale());
        assert_eq!(legend.level_labels, vec!["Level 1", "Level 2", "Level 3"]);
    }

    #[test]
    fn test_render_is_pure() {
        let s = scale();
        let spec = spec(vec![10.0, 20.0, 30.0]);
        assert_eq!(render_legend(&spec, &s), render_legend(&spec, &s));
    }

    #[test]
    fn test_empty_spec_renders_empty_legend() {
        let legend = render_legend(&spec(Vec::new()), &scale());
        assert!(legend.swatches.is_empty());
        assert!(legend.value_labels.is_empty());
        assert!(legend.level_labels.is_empty());
    }

    #[test]
    fn test_percentile_breakpoints_match_reference() {
        let values: Vec<f64> = (1..=10).map(|v| v as f64).collect();
        let breakpoints = percentile_breakpoints(&values, 5);
        assert_eq!(breakpoints, vec![0.0, 2.8, 4.6, 6.4, 8.2]);
    }

    #[test]
    fn test_percentile_breakpoints_empty_input() {
        assert!(percentile_breakpoints(&[], 5).is_empty());
    }

    #[test]
    fn test_legend_strip_swatch_placement() {
        let s = scale();
        let legend = render_legend(&spec(vec![10.0, 20.0, 30.0]), &s);
        let strip = legend_strip(&legend, 90, 10);

        assert_eq!(strip.get_pixel(5, 5).0, s.color(10.0));
        assert_eq!(strip.get_pixel(45, 5).0, s.color(20.0));
        assert_eq!(strip.get_pixel(85, 5).0, s.color(30.0));
    }
}
