// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Contract with the image viewer that owns pan, zoom, and tile rendering.
//!
//! The annotation core never reimplements the viewer's transform matrix. It
//! only composes the conversions exposed here with normalization. Any viewer
//! that can answer these questions is substitutable; [`FlatViewer`] is the
//! implementation bundled with the desktop front end.

mod flat;

pub use flat::FlatViewer;

use crate::models::space::{ImageDimensions, ImagePoint, Rect, ScreenPoint, Size, ViewportPoint};
use std::sync::mpsc::Receiver;

/// Change notifications published by a viewer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerEvent {
    /// A new image finished opening.
    Open(ImageDimensions),
    Pan,
    Zoom,
    /// One step of an in-flight pan/zoom animation.
    AnimationTick,
    /// The drawing surface changed size.
    Resize(Size),
    /// The viewer was torn down. No further events follow.
    Destroyed,
}

impl ViewerEvent {
    /// Whether this event can change what is on screen.
    pub fn affects_viewport(&self) -> bool {
        !matches!(self, ViewerEvent::Destroyed)
    }
}

/// Operations the annotation core needs from a deep-zoom viewer.
///
/// Every query returns `None` while no image is open or after the viewer has
/// been destroyed. Commands on an unavailable viewer are no-ops.
pub trait Viewer {
    fn image_dimensions(&self) -> Option<ImageDimensions>;

    fn image_to_viewport(&self, point: ImagePoint) -> Option<ViewportPoint>;

    fn viewport_to_image(&self, point: ViewportPoint) -> Option<ImagePoint>;

    fn viewport_to_screen(&self, point: ViewportPoint) -> Option<ScreenPoint>;

    fn screen_to_viewport(&self, point: ScreenPoint) -> Option<ViewportPoint>;

    /// Size of the drawing surface in screen pixels.
    fn container_size(&self) -> Option<Size>;

    fn center(&self) -> Option<ViewportPoint>;

    fn zoom(&self) -> Option<f64>;

    /// Visible region in viewport units.
    fn bounds(&self) -> Option<Rect>;

    fn pan_to(&mut self, point: ViewportPoint, immediate: bool);

    /// Multiply the zoom, keeping `anchor` fixed on screen when given.
    fn zoom_by(&mut self, factor: f64, anchor: Option<ViewportPoint>);

    /// Reset to a view showing the whole image.
    fn go_home(&mut self, immediate: bool);

    /// Register for change notifications.
    fn subscribe(&mut self) -> Receiver<ViewerEvent>;
}
