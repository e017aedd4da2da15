// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project state management.
//!
//! A project ties a set of strokes to the image they annotate.

use super::annotation::Stroke;
use super::space::ImageDimensions;
use serde::{Deserialize, Serialize};

/// Complete project data for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectData {
    pub image_id: String,
    pub image_width: u32,
    pub image_height: u32,
    #[serde(default)]
    pub strokes: Vec<Stroke>,
}

impl ProjectData {
    /// Create a new project with the given image identity and dimensions.
    pub fn new(image_id: String, dims: ImageDimensions) -> Self {
        Self {
            image_id,
            image_width: dims.width,
            image_height: dims.height,
            strokes: Vec::new(),
        }
    }

    /// Image dimensions recorded in the project, if they are usable.
    pub fn dimensions(&self) -> Option<ImageDimensions> {
        ImageDimensions::new(self.image_width, self.image_height)
    }
}
