// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data structures.
//!
//! This module defines the freehand stroke and its rendering style. Stroke
//! geometry is stored exclusively as normalized image coordinates so it
//! survives any change of zoom, pan, or served image resolution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 2D point with normalized coordinates (0.0 to 1.0) relative to the image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub x: f64,
    pub y: f64,
}

impl NormalizedPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Check whether both axes are finite and within `0..=1`.
    pub fn is_valid(&self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }
}

/// RGB color, serialized as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const RED: Rgb = Rgb::new(0xe5, 0x39, 0x35);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let hex = value.strip_prefix('#').unwrap_or(&value);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(format!("expected #rrggbb, got {value:?}"));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|e| format!("bad color {value:?}: {e}"))
        };
        Ok(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

/// How a stroke composites onto the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeMode {
    /// Normal source-over painting.
    #[default]
    Paint,
    /// Removes previously painted overlay pixels (destination-out).
    Erase,
}

/// Rendering style of a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    /// Line width in screen pixels.
    pub size: f64,
    pub opacity: f64,
    pub color: Rgb,
    #[serde(default)]
    pub mode: StrokeMode,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            size: 4.0,
            opacity: 1.0,
            color: Rgb::RED,
            mode: StrokeMode::Paint,
        }
    }
}

impl StrokeStyle {
    pub const MIN_SIZE: f64 = 0.5;

    /// Return a copy with size and opacity forced into their valid ranges.
    pub fn sanitized(self) -> Self {
        let size = if self.size.is_finite() {
            self.size.max(Self::MIN_SIZE)
        } else {
            Self::default().size
        };
        let opacity = if self.opacity.is_finite() {
            self.opacity.clamp(0.0, 1.0)
        } else {
            1.0
        };
        Self {
            size,
            opacity,
            ..self
        }
    }

    pub fn with_mode(self, mode: StrokeMode) -> Self {
        Self { mode, ..self }
    }

    /// Color with opacity folded into an 8-bit alpha channel.
    pub fn rgba(&self) -> [u8; 4] {
        let alpha = (self.opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        [self.color.r, self.color.g, self.color.b, alpha]
    }
}

/// One committed freehand gesture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub id: String,
    pub points: Vec<NormalizedPoint>,
    pub style: StrokeStyle,
    pub created_at: DateTime<Utc>,
}

impl Stroke {
    /// Check if the stroke is rendered as an eraser.
    pub fn is_erase(&self) -> bool {
        self.style.mode == StrokeMode::Erase
    }

    /// Number of captured points.
    pub fn point_count(&self) -> usize {
        self.points.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_round_trips_through_hex() {
        let json = serde_json::to_string(&Rgb::new(0x12, 0xab, 0xff)).unwrap();
        assert_eq!(json, "\"#12abff\"");
        let back: Rgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rgb::new(0x12, 0xab, 0xff));
    }

    #[test]
    fn rejects_malformed_color() {
        assert!(serde_json::from_str::<Rgb>("\"#12ab\"").is_err());
        assert!(serde_json::from_str::<Rgb>("\"#zzzzzz\"").is_err());
        assert!(serde_json::from_str::<Rgb>("\"#a€aa\"").is_err());
        assert!(serde_json::from_str::<Rgb>("\"€€\"").is_err());
    }

    #[test]
    fn sanitize_fixes_out_of_range_style() {
        let style = StrokeStyle {
            size: -3.0,
            opacity: 1.7,
            ..StrokeStyle::default()
        }
        .sanitized();
        assert_eq!(style.size, StrokeStyle::MIN_SIZE);
        assert_eq!(style.opacity, 1.0);
    }

    #[test]
    fn point_validity_checks_unit_square() {
        assert!(NormalizedPoint::new(0.0, 1.0).is_valid());
        assert!(!NormalizedPoint::new(1.01, 0.5).is_valid());
        assert!(!NormalizedPoint::new(f64::NAN, 0.5).is_valid());
    }

    #[test]
    fn mode_defaults_to_paint_when_missing() {
        let style: StrokeStyle =
            serde_json::from_str(r##"{"size":2.0,"opacity":0.5,"color":"#000000"}"##).unwrap();
        assert_eq!(style.mode, StrokeMode::Paint);
    }
}
