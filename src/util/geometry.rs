// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! Conversions between the four coordinate spaces: screen pixels, viewport
//! units, full-resolution image pixels, and normalized `[0,1]` image space.
//! Everything here is pure. Viewer-dependent conversions take the viewer
//! explicitly and delegate the pan/zoom matrix to it.
//!
//! These functions run from per-frame redraws and per-pointer-move handlers,
//! so none of them panic: an unavailable viewer yields a fallback or `None`.

use crate::models::annotation::NormalizedPoint;
use crate::models::space::{
    ImageDimensions, ImagePoint, Rect, ScreenPoint, ViewportPoint, ViewportState,
};
use crate::viewer::Viewer;

/// Dimensions reported while no image is loaded.
pub const FALLBACK_DIMENSIONS: ImageDimensions = ImageDimensions {
    width: 4000,
    height: 3000,
};

/// Dimensions of the open image, or [`FALLBACK_DIMENSIONS`] if there is none.
///
/// Use [`is_image_loaded`] to tell real data from the fallback.
pub fn image_dimensions<V: Viewer + ?Sized>(viewer: &V) -> ImageDimensions {
    viewer.image_dimensions().unwrap_or(FALLBACK_DIMENSIONS)
}

pub fn is_image_loaded<V: Viewer + ?Sized>(viewer: &V) -> bool {
    viewer.image_dimensions().is_some()
}

/// Convert pixel coordinates to normalized coordinates (0.0 to 1.0).
pub fn normalize_coordinates(pixel_x: f64, pixel_y: f64, width: u32, height: u32) -> NormalizedPoint {
    NormalizedPoint {
        x: pixel_x / width as f64,
        y: pixel_y / height as f64,
    }
}

/// Convert normalized coordinates to pixel coordinates, without rounding.
pub fn denormalize_coordinates(point: &NormalizedPoint, width: u32, height: u32) -> (f64, f64) {
    (point.x * width as f64, point.y * height as f64)
}

pub fn image_px_to_normalized(px: ImagePoint, dims: ImageDimensions) -> NormalizedPoint {
    normalize_coordinates(px.x, px.y, dims.width, dims.height)
}

/// Normalized to image pixels, rounded to the nearest whole pixel.
pub fn normalized_to_image_px(norm: NormalizedPoint, dims: ImageDimensions) -> ImagePoint {
    let (x, y) = denormalize_coordinates(&norm, dims.width, dims.height);
    ImagePoint::new(x.round(), y.round())
}

/// Clamp each axis independently into `[0, width]` and `[0, height]`.
pub fn clamp_to_image_bounds(px: ImagePoint, dims: ImageDimensions) -> ImagePoint {
    let clamp = |v: f64, max: f64| if v.is_nan() { 0.0 } else { v.clamp(0.0, max) };
    ImagePoint::new(
        clamp(px.x, dims.width as f64),
        clamp(px.y, dims.height as f64),
    )
}

pub fn image_px_to_viewport<V: Viewer + ?Sized>(viewer: &V, px: ImagePoint) -> Option<ViewportPoint> {
    viewer.image_to_viewport(px)
}

pub fn viewport_to_image_px<V: Viewer + ?Sized>(viewer: &V, vp: ViewportPoint) -> Option<ImagePoint> {
    viewer.viewport_to_image(vp)
}

/// Screen point to image pixels, or `None` if it lies off the drawing surface.
///
/// Pointer events routinely land just outside the surface during fast drags,
/// so this is not an error.
pub fn screen_to_image_px<V: Viewer + ?Sized>(viewer: &V, screen: ScreenPoint) -> Option<ImagePoint> {
    if !viewer.container_size()?.contains(screen) {
        return None;
    }
    let vp = viewer.screen_to_viewport(screen)?;
    viewport_to_image_px(viewer, vp)
}

pub fn image_px_to_screen<V: Viewer + ?Sized>(viewer: &V, px: ImagePoint) -> Option<ScreenPoint> {
    let vp = image_px_to_viewport(viewer, px)?;
    viewer.viewport_to_screen(vp)
}

/// Screen point to normalized space, only if it falls on the image itself.
pub fn screen_to_normalized<V: Viewer + ?Sized>(viewer: &V, screen: ScreenPoint) -> Option<NormalizedPoint> {
    let dims = viewer.image_dimensions()?;
    let px = screen_to_image_px(viewer, screen)?;
    let norm = image_px_to_normalized(px, dims);
    norm.is_valid().then_some(norm)
}

/// Project a stored point onto the screen through the current viewport.
pub fn normalized_to_screen<V: Viewer + ?Sized>(viewer: &V, norm: NormalizedPoint) -> Option<ScreenPoint> {
    let dims = viewer.image_dimensions()?;
    let (x, y) = denormalize_coordinates(&norm, dims.width, dims.height);
    image_px_to_screen(viewer, ImagePoint::new(x, y))
}

pub fn normalized_to_viewport<V: Viewer + ?Sized>(viewer: &V, norm: NormalizedPoint) -> Option<ViewportPoint> {
    let dims = viewer.image_dimensions()?;
    let (x, y) = denormalize_coordinates(&norm, dims.width, dims.height);
    image_px_to_viewport(viewer, ImagePoint::new(x, y))
}

fn viewport_to_normalized<V: Viewer + ?Sized>(
    viewer: &V,
    vp: ViewportPoint,
    dims: ImageDimensions,
) -> Option<NormalizedPoint> {
    let px = viewport_to_image_px(viewer, vp)?;
    Some(image_px_to_normalized(px, dims))
}

/// Read the viewer's current center, zoom, and visible bounds in normalized space.
pub fn viewport_state<V: Viewer + ?Sized>(viewer: &V) -> Option<ViewportState> {
    let dims = viewer.image_dimensions()?;
    let bounds = viewer.bounds()?;
    let center = viewport_to_normalized(viewer, viewer.center()?, dims)?;
    let top_left = viewport_to_normalized(viewer, ViewportPoint::new(bounds.x, bounds.y), dims)?;
    let bottom_right =
        viewport_to_normalized(viewer, ViewportPoint::new(bounds.right(), bounds.bottom()), dims)?;
    Some(ViewportState {
        center,
        zoom: viewer.zoom()?,
        bounds_normalized: Rect::new(
            top_left.x,
            top_left.y,
            bottom_right.x - top_left.x,
            bottom_right.y - top_left.y,
        ),
    })
}
