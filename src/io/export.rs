// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Feature-collection export in image pixel coordinates.
//!
//! Each stroke becomes one `LineString` feature. Coordinates are the exact
//! product of the normalized point and the image dimensions, with no
//! rounding, so an export can be reproduced bit for bit.

use crate::models::annotation::{Stroke, StrokeMode};
use crate::models::space::ImageDimensions;
use crate::util::geometry::denormalize_coordinates;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    LineString { coordinates: Vec<[f64; 2]> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    pub stroke_id: String,
    pub color: String,
    pub size: f64,
    pub opacity: f64,
    pub mode: StrokeMode,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    pub geometry: Geometry,
    pub properties: FeatureProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

/// Convert strokes into a feature collection in image pixels.
pub fn to_feature_collection(
    strokes: &[Stroke],
    dims: ImageDimensions,
    author: Option<&str>,
) -> FeatureCollection {
    let features = strokes
        .iter()
        .map(|stroke| {
            let coordinates = stroke
                .points
                .iter()
                .map(|p| {
                    let (x, y) = denormalize_coordinates(p, dims.width, dims.height);
                    [x, y]
                })
                .collect();
            Feature {
                geometry: Geometry::LineString { coordinates },
                properties: FeatureProperties {
                    stroke_id: stroke.id.clone(),
                    color: stroke.style.color.to_string(),
                    size: stroke.style.size,
                    opacity: stroke.style.opacity,
                    mode: stroke.style.mode,
                    created_at: stroke.created_at,
                    author: author.map(str::to_string),
                },
            }
        })
        .collect();
    FeatureCollection { features }
}

/// Write a feature collection as pretty JSON.
pub fn export_features(
    strokes: &[Stroke],
    dims: ImageDimensions,
    author: Option<&str>,
    path: &Path,
) -> Result<()> {
    let collection = to_feature_collection(strokes, dims, author);
    let json = serde_json::to_string_pretty(&collection)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Exported {} feature(s) to {}", collection.features.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::{NormalizedPoint, StrokeStyle};

    fn strokes() -> Vec<Stroke> {
        vec![Stroke {
            id: "s1".into(),
            points: vec![
                NormalizedPoint::new(0.1, 0.1),
                NormalizedPoint::new(0.333_333_333_333_333_3, 0.7),
            ],
            style: StrokeStyle::default(),
            created_at: Utc::now(),
        }]
    }

    #[test]
    fn coordinates_are_exact_pixel_products() {
        let dims = ImageDimensions::new(4000, 3000).unwrap();
        let fc = to_feature_collection(&strokes(), dims, Some("ana"));
        let Geometry::LineString { coordinates } = &fc.features[0].geometry;
        assert_eq!(coordinates[0], [0.1 * 4000.0, 0.1 * 3000.0]);
        assert_eq!(coordinates[1], [0.333_333_333_333_333_3 * 4000.0, 0.7 * 3000.0]);
        assert_eq!(fc.features[0].properties.author.as_deref(), Some("ana"));
    }

    #[test]
    fn json_shape_matches_feature_collection() {
        let dims = ImageDimensions::new(100, 50).unwrap();
        let value = serde_json::to_value(to_feature_collection(&strokes(), dims, None)).unwrap();
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["features"][0]["type"], "Feature");
        assert_eq!(value["features"][0]["geometry"]["type"], "LineString");
        assert_eq!(value["features"][0]["properties"]["mode"], "paint");
        assert!(value["features"][0]["properties"].get("author").is_none());
    }

    #[test]
    fn export_round_trips_bit_exact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("features.json");
        let dims = ImageDimensions::new(91_234, 70_001).unwrap();
        export_features(&strokes(), dims, None, &path).unwrap();
        let back: FeatureCollection =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, to_feature_collection(&strokes(), dims, None));
    }
}
