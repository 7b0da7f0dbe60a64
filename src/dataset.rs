//! Hazard dataset model.
//!
//! This module converts raw GeoJSON feature collections into the in-memory
//! representation used by the rendering pipeline: one [`Feature`] per
//! administrative region, carrying its layer id, hazard value and opaque
//! geometry.

use geojson::GeoJson;
use std::collections::BTreeSet;
use tracing::warn;

use crate::error::{HazmapError, Result};

/// Administrative layer identifier (0 = national, 1 = first subdivision, ...).
pub type LayerId = i64;

/// One administrative region: geometry plus the attributes the renderer needs.
///
/// The geometry is opaque to the rendering core and passed through to the
/// rendering surface unchanged.
#[derive(Debug, Clone)]
pub struct Feature {
    /// Stable regional identifier, used for popups and labeling
    pub id: String,
    /// Administrative granularity this feature belongs to
    pub layer: LayerId,
    /// Hazard/impact magnitude under the selected scenario. `None` when the
    /// source data has no value for this region; such features are excluded
    /// from color-domain computation and from painting, never coerced to zero.
    pub value: Option<f64>,
    /// Region boundary, passed through to the rendering surface
    pub geometry: geojson::Geometry,
}

/// An ordered sequence of features for one dataset (one country/hazard/
/// scenario/exposure combination). Replaced wholesale on selection change,
/// never mutated in place.
#[derive(Debug, Clone, Default)]
pub struct FeatureCollection {
    /// Features in source order
    pub features: Vec<Feature>,
}

/// Geographic bounding box in lon/lat degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl Bounds {
    /// Grow the box to include a single position.
    fn extend(&mut self, lon: f64, lat: f64) {
        self.min_lon = self.min_lon.min(lon);
        self.min_lat = self.min_lat.min(lat);
        self.max_lon = self.max_lon.max(lon);
        self.max_lat = self.max_lat.max(lat);
    }

    /// Grow the box to include another box.
    pub fn merge(&mut self, other: &Bounds) {
        self.extend(other.min_lon, other.min_lat);
        self.extend(other.max_lon, other.max_lat);
    }
}

impl FeatureCollection {
    /// Parse a raw GeoJSON document into a feature collection.
    ///
    /// Features that violate the data model (no geometry, no layer id, no
    /// stable identifier) are skipped with a warning rather than failing the
    /// whole dataset. A missing or non-finite `value` is kept as `None`.
    pub fn from_geojson(raw: &str) -> Result<Self> {
        let geojson: GeoJson = raw.parse()?;

        let collection = match geojson {
            GeoJson::FeatureCollection(fc) => fc,
            _ => {
                return Err(HazmapError::DataNotFound {
                    message: "GeoJSON root is not a FeatureCollection".to_string(),
                });
            }
        };

        let total = collection.features.len();
        let mut features = Vec::with_capacity(total);

        for (index, feature) in collection.features.into_iter().enumerate() {
            match convert_feature(feature) {
                Some(f) => features.push(f),
                None => {
                    warn!(index = index, "Skipping malformed feature");
                }
            }
        }

        Ok(Self { features })
    }

    /// Number of features in the collection.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the collection holds no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// The distinct layer ids present, in ascending order.
    pub fn layers(&self) -> Vec<LayerId> {
        let set: BTreeSet<LayerId> = self.features.iter().map(|f| f.layer).collect();
        set.into_iter().collect()
    }

    /// Bounding box over all feature geometries, `None` when nothing has
    /// coordinates.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut bounds: Option<Bounds> = None;
        for feature in &self.features {
            if let Some(b) = geometry_bounds(&feature.geometry) {
                match bounds.as_mut() {
                    Some(acc) => acc.merge(&b),
                    None => bounds = Some(b),
                }
            }
        }
        bounds
    }
}

/// Convert one GeoJSON feature into the internal model.
///
/// Returns `None` when a required attribute is missing: every feature must
/// belong to exactly one layer and carry a stable identifier.
fn convert_feature(feature: geojson::Feature) -> Option<Feature> {
    let geometry = feature.geometry?;
    let properties = feature.properties?;

    let layer = properties.get("layer").and_then(|v| v.as_i64())?;

    // Missing and non-finite values stay undefined rather than defaulting
    // to zero, which would corrupt the color domain downstream.
    let value = properties
        .get("value")
        .and_then(|v| v.as_f64())
        .filter(|v| v.is_finite());

    let id = match properties.get("id") {
        Some(serde_json::Value::String(s)) => Some(s.clone()),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => feature.id.as_ref().map(|id| match id {
            geojson::feature::Id::String(s) => s.clone(),
            geojson::feature::Id::Number(n) => n.to_string(),
        }),
    }?;

    Some(Feature {
        id,
        layer,
        value,
        geometry,
    })
}

/// Bounding box of a single geometry. Only polygonal geometries contribute;
/// other types yield `None`.
pub fn geometry_bounds(geometry: &geojson::Geometry) -> Option<Bounds> {
    let mut bounds: Option<Bounds> = None;

    let mut visit = |position: &[f64]| {
        if position.len() < 2 {
            return;
        }
        let (lon, lat) = (position[0], position[1]);
        match bounds.as_mut() {
            Some(b) => b.extend(lon, lat),
            None => {
                bounds = Some(Bounds {
                    min_lon: lon,
                    min_lat: lat,
                    max_lon: lon,
                    max_lat: lat,
                })
            }
        }
    };

    match &geometry.value {
        geojson::Value::Polygon(rings) => {
            for ring in rings {
                for position in ring {
                    visit(position);
                }
            }
        }
        geojson::Value::MultiPolygon(polygons) => {
            for rings in polygons {
                for ring in rings {
                    for position in ring {
                        visit(position);
                    }
                }
            }
        }
        _ => {}
    }

    bounds
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_geojson() -> String {
        r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {"layer": 1, "value": 5.0, "id": "EGY.1"},
                    "geometry": {"type": "Polygon", "coordinates": [[[30.0, 30.0], [31.0, 30.0], [31.0, 31.0], [30.0, 31.0], [30.0, 30.0]]]}
                },
                {
                    "type": "Feature",
                    "properties": {"layer": 2, "id": "EGY.1.1"},
                    "geometry": {"type": "Polygon", "coordinates": [[[30.0, 30.0], [30.5, 30.0], [30.5, 30.5], [30.0, 30.5], [30.0, 30.0]]]}
                },
                {
                    "type": "Feature",
                    "properties": {"value": 9.0, "id": "no-layer"},
                    "geometry": {"type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]}
                }
            ]
        }"#
        .to_string()
    }

    #[test]
    fn test_parse_feature_collection() {
        let collection = FeatureCollection::from_geojson(&sample_geojson()).unwrap();

        // The feature without a layer id is dropped
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.features[0].id, "EGY.1");
        assert_eq!(collection.features[0].layer, 1);
        assert_eq!(collection.features[0].value, Some(5.0));
    }

    #[test]
    fn test_missing_value_stays_undefined() {
        let collection = FeatureCollection::from_geojson(&sample_geojson()).unwrap();
        assert_eq!(collection.features[1].value, None);
    }

    #[test]
    fn test_layers_sorted_unique() {
        let collection = FeatureCollection::from_geojson(&sample_geojson()).unwrap();
        assert_eq!(collection.layers(), vec![1, 2]);
    }

    #[test]
    fn test_bounds() {
        let collection = FeatureCollection::from_geojson(&sample_geojson()).unwrap();
        let bounds = collection.bounds().unwrap();
        assert_eq!(bounds.min_lon, 30.0);
        assert_eq!(bounds.max_lon, 31.0);
        assert_eq!(bounds.min_lat, 30.0);
        assert_eq!(bounds.max_lat, 31.0);
    }

    #[test]
    fn test_rejects_non_collection_root() {
        let raw = r#"{"type": "Point", "coordinates": [0.0, 0.0]}"#;
        assert!(FeatureCollection::from_geojson(raw).is_err());
    }

    #[test]
    fn test_non_finite_value_is_dropped() {
        let raw = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {"layer": 1, "value": "not-a-number", "id": "X"},
                "geometry": {"type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]}
            }]
        }"#;
        let collection = FeatureCollection::from_geojson(raw).unwrap();
        assert_eq!(collection.features[0].value, None);
    }
}
