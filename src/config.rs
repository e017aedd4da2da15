// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application configuration.
//!
//! Loaded from an optional YAML or JSON file. Every field has a default, so a
//! partial file only overrides what it names.

use crate::models::annotation::StrokeStyle;
use crate::sync::load_guard::DEFAULT_LOAD_TIMEOUT;
use crate::widgets::ClampBounds;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Longest accepted load timeout (one hour).
const MAX_LOAD_TIMEOUT_SECS: f64 = 3600.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Seconds to wait for an image to open before giving up.
    pub load_timeout_secs: f64,
    pub widget_bounds: ClampBounds,
    pub default_brush: StrokeStyle,
    /// Minimap canvas size in points.
    pub minimap_width: f64,
    pub minimap_height: f64,
    /// Attached to submitted and exported strokes.
    pub author: Option<String>,
    pub submission_dir: PathBuf,
    /// Multiplier applied per zoom-in step.
    pub zoom_step: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            load_timeout_secs: DEFAULT_LOAD_TIMEOUT.as_secs_f64(),
            widget_bounds: ClampBounds::default(),
            default_brush: StrokeStyle::default(),
            minimap_width: 200.0,
            minimap_height: 150.0,
            author: None,
            submission_dir: PathBuf::from("submissions"),
            zoom_step: 1.5,
        }
    }
}

impl AppConfig {
    /// Load from a `.yaml`/`.yml` or `.json` file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_ascii_lowercase);
        let config: Self = match ext.as_deref() {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&text)
                .with_context(|| format!("Invalid config {}", path.display()))?,
            Some("json") => serde_json::from_str(&text)
                .with_context(|| format!("Invalid config {}", path.display()))?,
            other => bail!("Unsupported config extension: {:?}", other),
        };
        Ok(config.sanitized())
    }

    /// Replace out-of-range values with defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.load_timeout_secs > 0.0 && self.load_timeout_secs <= MAX_LOAD_TIMEOUT_SECS) {
            log::warn!("Ignoring load_timeout_secs {}", self.load_timeout_secs);
            self.load_timeout_secs = defaults.load_timeout_secs;
        }
        if !(self.zoom_step.is_finite() && self.zoom_step > 1.0) {
            log::warn!("Ignoring zoom_step {}", self.zoom_step);
            self.zoom_step = defaults.zoom_step;
        }
        if !(self.minimap_width > 0.0 && self.minimap_height > 0.0) {
            self.minimap_width = defaults.minimap_width;
            self.minimap_height = defaults.minimap_height;
        }
        let b = self.widget_bounds;
        if !(b.margin.is_finite() && b.margin >= 0.0 && b.top_offset.is_finite() && b.top_offset >= 0.0) {
            self.widget_bounds = defaults.widget_bounds;
        }
        self.default_brush = self.default_brush.sanitized();
        self
    }

    pub fn load_timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.load_timeout_secs).unwrap_or(DEFAULT_LOAD_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::Rgb;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deepink.yaml");
        std::fs::write(&path, "author: ana\nwidget_bounds:\n  margin: 8\n  top_offset: 40\n").unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.author.as_deref(), Some("ana"));
        assert_eq!(config.widget_bounds.margin, 8.0);
        assert_eq!(config.widget_bounds.top_offset, 40.0);
        assert_eq!(config.zoom_step, 1.5);
        assert_eq!(config.load_timeout(), DEFAULT_LOAD_TIMEOUT);
    }

    #[test]
    fn json_brush_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deepink.json");
        std::fs::write(
            &path,
            r##"{"default_brush": {"size": 9, "opacity": 0.5, "color": "#00ff00"}}"##,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.default_brush.size, 9.0);
        assert_eq!(config.default_brush.color, Rgb { r: 0, g: 255, b: 0 });
    }

    #[test]
    fn bad_values_fall_back() {
        let config = AppConfig {
            load_timeout_secs: -1.0,
            zoom_step: 0.5,
            ..AppConfig::default()
        }
        .sanitized();
        assert_eq!(config.load_timeout_secs, 10.0);
        assert_eq!(config.zoom_step, 1.5);
    }

    #[test]
    fn huge_load_timeout_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deepink.yaml");
        std::fs::write(&path, "load_timeout_secs: 1.0e30\n").unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.load_timeout(), DEFAULT_LOAD_TIMEOUT);

        let unsanitized = AppConfig {
            load_timeout_secs: f64::INFINITY,
            ..AppConfig::default()
        };
        assert_eq!(unsanitized.load_timeout(), DEFAULT_LOAD_TIMEOUT);
    }

    #[test]
    fn unknown_extension_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deepink.toml");
        std::fs::write(&path, "").unwrap();
        assert!(AppConfig::load(&path).is_err());
    }
}
