// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Coordinate space types.
//!
//! Each of the four spaces the annotator deals with gets its own point type
//! so a screen pixel can never be handed to a function expecting an image
//! pixel. All components are `f64`.

use super::annotation::NormalizedPoint;
use serde::{Deserialize, Serialize};

/// Full-resolution pixel size of the loaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    /// Create dimensions, rejecting zero-sized images.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        (width > 0 && height > 0).then_some(Self { width, height })
    }

    /// Length of the longer side in pixels.
    pub fn max_side(&self) -> u32 {
        self.width.max(self.height)
    }

    /// Height divided by width.
    pub fn aspect(&self) -> f64 {
        self.height as f64 / self.width as f64
    }
}

/// A point in full-resolution image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImagePoint {
    pub x: f64,
    pub y: f64,
}

impl ImagePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A point in viewer units, where the image spans `0..1` horizontally.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportPoint {
    pub x: f64,
    pub y: f64,
}

impl ViewportPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A point in pixels relative to the top-left of the viewer's drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: ScreenPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A width/height pair in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when both sides are positive and finite.
    pub fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Whether a screen point lies on a surface of this size.
    pub fn contains(&self, point: ScreenPoint) -> bool {
        point.x >= 0.0 && point.y >= 0.0 && point.x <= self.width && point.y <= self.height
    }
}

/// Axis-aligned rectangle. The unit depends on context.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }
}

/// Snapshot of what the viewer is showing, expressed in normalized image space.
///
/// Derived on every sync tick and never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub center: NormalizedPoint,
    pub zoom: f64,
    /// Visible region; may extend past `0..1` when zoomed out beyond the image.
    pub bounds_normalized: Rect,
}
