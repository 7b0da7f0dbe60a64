//! Test dataset fixtures.
//!
//! Writes `<key>_geodata.json` files with a small, fully-known feature set:
//! one national polygon on layer 0, two provinces on layer 1 (one of which
//! has no value and must be excluded from rendering), and one district on
//! layer 2.

use std::io::Write;
use std::path::Path;

/// Feature set used by most tests:
/// - layer 0: "EGY" with value 30
/// - layer 1: "EGY.1" (value 5), "EGY.2" (value 15), "EGY.3" (no value)
/// - layer 2: "EGY.1.1" (value 9)
pub fn create_test_geodata(dir: &Path, key: &str) -> std::io::Result<()> {
    let geojson = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"layer": 0, "value": 30.0, "id": "EGY"},
                "geometry": {"type": "Polygon", "coordinates": [[[29.0, 29.0], [33.0, 29.0], [33.0, 32.0], [29.0, 32.0], [29.0, 29.0]]]}
            },
            {
                "type": "Feature",
                "properties": {"layer": 1, "value": 5.0, "id": "EGY.1"},
                "geometry": {"type": "Polygon", "coordinates": [[[29.0, 29.0], [31.0, 29.0], [31.0, 32.0], [29.0, 32.0], [29.0, 29.0]]]}
            },
            {
                "type": "Feature",
                "properties": {"layer": 1, "value": 15.0, "id": "EGY.2"},
                "geometry": {"type": "Polygon", "coordinates": [[[31.0, 29.0], [33.0, 29.0], [33.0, 32.0], [31.0, 32.0], [31.0, 29.0]]]}
            },
            {
                "type": "Feature",
                "properties": {"layer": 1, "id": "EGY.3"},
                "geometry": {"type": "Polygon", "coordinates": [[[33.0, 29.0], [34.0, 29.0], [34.0, 32.0], [33.0, 32.0], [33.0, 29.0]]]}
            },
            {
                "type": "Feature",
                "properties": {"layer": 2, "value": 9.0, "id": "EGY.1.1"},
                "geometry": {"type": "Polygon", "coordinates": [[[29.0, 29.0], [30.0, 29.0], [30.0, 30.5], [29.0, 30.5], [29.0, 29.0]]]}
            }
        ]
    }"#;

    write_dataset(dir, key, geojson)
}

/// A second, smaller dataset for switch tests: a single layer-1 province.
pub fn create_alternate_geodata(dir: &Path, key: &str) -> std::io::Result<()> {
    let geojson = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"layer": 1, "value": 42.0, "id": "KEN.1"},
                "geometry": {"type": "Polygon", "coordinates": [[[36.0, -2.0], [38.0, -2.0], [38.0, 0.0], [36.0, 0.0], [36.0, -2.0]]]}
            }
        ]
    }"#;

    write_dataset(dir, key, geojson)
}

/// A dataset file that is not valid GeoJSON at all.
pub fn create_malformed_geodata(dir: &Path, key: &str) -> std::io::Result<()> {
    write_dataset(dir, key, "{ this is not geojson")
}

fn write_dataset(dir: &Path, key: &str, geojson: &str) -> std::io::Result<()> {
    let path = dir.join(format!("{}_geodata.json", key));
    let mut file = std::fs::File::create(path)?;
    file.write_all(geojson.as_bytes())
}
