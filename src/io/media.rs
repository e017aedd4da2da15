// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image file loading.
//!
//! Decodes an image into RGBA pixels suitable for an egui texture.

use crate::models::space::ImageDimensions;
use anyhow::{anyhow, Context, Result};
use image::imageops::FilterType;
use std::path::Path;

/// A decoded image ready for upload.
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    /// Unpremultiplied RGBA, row-major.
    pub pixels: Vec<u8>,
}

/// An image decoded for display, which may be smaller than the source.
pub struct DisplayImage {
    /// Full-resolution dimensions. Annotation coordinates are relative to these.
    pub dims: ImageDimensions,
    pub preview: LoadedImage,
}

/// Load an image, downscaling it if either side exceeds `max_side` (0 means no limit).
pub fn load_display_image(path: &Path, max_side: u32) -> Result<DisplayImage> {
    let img = image::open(path).with_context(|| format!("Failed to decode {}", path.display()))?;
    let dims = ImageDimensions::new(img.width(), img.height())
        .ok_or_else(|| anyhow!("{} has no pixels", path.display()))?;
    let img = if max_side > 0 && dims.max_side() > max_side {
        log::info!(
            "Downscaling {}x{} image to fit {} px for display",
            dims.width,
            dims.height,
            max_side
        );
        img.resize(max_side, max_side, FilterType::Triangle)
    } else {
        img
    };
    let rgba = img.into_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(DisplayImage {
        dims,
        preview: LoadedImage {
            width,
            height,
            pixels: rgba.into_raw(),
        },
    })
}

/// Stable identity for an image file, used as the persistence key.
pub fn image_id(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_png_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        image::RgbaImage::from_pixel(3, 2, image::Rgba([1, 2, 3, 255]))
            .save(&path)
            .unwrap();

        let loaded = load_display_image(&path, 0).unwrap().preview;
        assert_eq!((loaded.width, loaded.height), (3, 2));
        assert_eq!(loaded.pixels.len(), 3 * 2 * 4);
        assert_eq!(&loaded.pixels[..4], &[1, 2, 3, 255]);
    }

    #[test]
    fn large_images_keep_full_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        image::RgbaImage::from_pixel(40, 20, image::Rgba([9, 9, 9, 255]))
            .save(&path)
            .unwrap();

        let display = load_display_image(&path, 10).unwrap();
        assert_eq!((display.dims.width, display.dims.height), (40, 20));
        assert_eq!((display.preview.width, display.preview.height), (10, 5));

        let full = load_display_image(&path, 64).unwrap();
        assert_eq!((full.preview.width, full.preview.height), (40, 20));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_display_image(Path::new("/definitely/not/here.png"), 0).is_err());
    }

    #[test]
    fn id_is_file_name() {
        assert_eq!(image_id(Path::new("/data/slides/scan-01.tif")), "scan-01.tif");
    }
}
