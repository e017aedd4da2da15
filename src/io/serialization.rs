// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project data serialization and deserialization.
//!
//! Projects are stored as YAML or JSON; the file extension decides which.

use crate::models::project::ProjectData;
use anyhow::{bail, Context, Result};
use std::path::Path;

/// On-disk encoding of a project file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProjectFormat {
    Yaml,
    Json,
}

impl ProjectFormat {
    fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            other => bail!("Unsupported project extension {:?} for {}", other, path.display()),
        }
    }
}

/// Save a project, picking YAML or JSON from the file extension.
pub fn save_project(data: &ProjectData, path: &Path) -> Result<()> {
    let text = match ProjectFormat::from_path(path)? {
        ProjectFormat::Yaml => serde_yaml::to_string(data).context("Failed to encode project as YAML")?,
        ProjectFormat::Json => serde_json::to_string_pretty(data).context("Failed to encode project as JSON")?,
    };
    std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
}

/// Load a project, picking YAML or JSON from the file extension.
pub fn load_project(path: &Path) -> Result<ProjectData> {
    let format = ProjectFormat::from_path(path)?;
    let text = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let data = match format {
        ProjectFormat::Yaml => serde_yaml::from_str(&text).map_err(anyhow::Error::from),
        ProjectFormat::Json => serde_json::from_str(&text).map_err(anyhow::Error::from),
    };
    data.with_context(|| format!("Invalid project file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::{NormalizedPoint, Stroke, StrokeMode, StrokeStyle};
    use crate::models::space::ImageDimensions;
    use chrono::{TimeZone, Utc};

    fn project() -> ProjectData {
        let mut project = ProjectData::new(
            "slide-7.tif".into(),
            ImageDimensions::new(80_000, 60_000).unwrap(),
        );
        project.strokes.push(Stroke {
            id: "a1".into(),
            points: vec![
                NormalizedPoint::new(0.1, 0.2),
                NormalizedPoint::new(0.123_456_789_012_345_6, 0.987_654_321_098_765_4),
            ],
            style: StrokeStyle::default().with_mode(StrokeMode::Erase),
            created_at: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
        });
        project
    }

    #[test]
    fn json_preserves_full_precision() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.json");
        save_project(&project(), &path).unwrap();
        assert_eq!(load_project(&path).unwrap(), project());
    }

    #[test]
    fn yaml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.YML");
        save_project(&project(), &path).unwrap();
        let loaded = load_project(&path).unwrap();
        assert_eq!(loaded.image_id, "slide-7.tif");
        assert_eq!(loaded.strokes[0].style.mode, StrokeMode::Erase);
        assert_eq!(loaded.dimensions(), ImageDimensions::new(80_000, 60_000));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(save_project(&project(), &dir.path().join("p.txt")).is_err());
        assert!(load_project(&dir.path().join("p")).is_err());
    }

    #[test]
    fn malformed_file_error_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = load_project(&path).unwrap_err();
        assert!(format!("{err:#}").contains("broken.json"));
    }
}
