// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Single-image viewer with animated pan and anchored zoom.
//!
//! Viewport units follow the usual deep-zoom convention: the image spans
//! `0..1` horizontally and `0..height/width` vertically. Zoom 1.0 means the
//! image width exactly fills the container width.

use super::{Viewer, ViewerEvent};
use crate::models::space::{ImageDimensions, ImagePoint, Rect, ScreenPoint, Size, ViewportPoint};
use std::sync::mpsc::{channel, Receiver, Sender};

const MIN_ZOOM: f64 = 0.05;
const MAX_ZOOM: f64 = 256.0;

/// Exponential approach rate of animated pans, per second.
const PAN_STIFFNESS: f64 = 12.0;

/// Animations settle once the remaining distance is under this many screen pixels.
const SETTLE_PX: f64 = 0.5;

/// Viewer for one in-memory image.
pub struct FlatViewer {
    image: Option<ImageDimensions>,
    container: Size,
    center: ViewportPoint,
    zoom: f64,
    target: Option<ViewportPoint>,
    destroyed: bool,
    subscribers: Vec<Sender<ViewerEvent>>,
}

impl FlatViewer {
    /// Create a viewer for a drawing surface of the given size, with no image open.
    pub fn new(container: Size) -> Self {
        Self {
            image: None,
            container,
            center: ViewportPoint::new(0.5, 0.5),
            zoom: 1.0,
            target: None,
            destroyed: false,
            subscribers: Vec::new(),
        }
    }

    /// Open an image, reset to the home view, and announce it.
    pub fn open(&mut self, dims: ImageDimensions) {
        if self.destroyed {
            return;
        }
        self.image = Some(dims);
        self.target = None;
        self.apply_home();
        log::info!("Viewer opened {}x{} image", dims.width, dims.height);
        self.emit(ViewerEvent::Open(dims));
    }

    /// Tear the viewer down. All later queries return `None`.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.emit(ViewerEvent::Destroyed);
        self.destroyed = true;
        self.image = None;
        self.target = None;
        self.subscribers.clear();
    }

    /// Track a new drawing surface size. Emits only when the size actually changed.
    pub fn resize(&mut self, container: Size) {
        if self.destroyed || !container.is_drawable() || container == self.container {
            return;
        }
        self.container = container;
        self.emit(ViewerEvent::Resize(container));
    }

    /// Pan immediately by a screen-space drag delta.
    pub fn pan_by_screen(&mut self, dx: f64, dy: f64) {
        if !self.is_live() || (dx == 0.0 && dy == 0.0) {
            return;
        }
        let scale = self.scale();
        self.target = None;
        self.center.x -= dx / scale;
        self.center.y -= dy / scale;
        self.emit(ViewerEvent::Pan);
    }

    /// Advance an in-flight pan animation. Returns true while still animating.
    pub fn update(&mut self, dt_secs: f64) -> bool {
        let Some(target) = self.target else {
            return false;
        };
        if !self.is_live() {
            self.target = None;
            return false;
        }
        let blend = 1.0 - (-PAN_STIFFNESS * dt_secs.max(0.0)).exp();
        self.center.x += (target.x - self.center.x) * blend;
        self.center.y += (target.y - self.center.y) * blend;

        let remaining = (target.x - self.center.x).hypot(target.y - self.center.y) * self.scale();
        let animating = remaining > SETTLE_PX;
        if !animating {
            self.center = target;
            self.target = None;
        }
        self.emit(ViewerEvent::AnimationTick);
        self.emit(ViewerEvent::Pan);
        animating
    }

    pub fn is_animating(&self) -> bool {
        self.target.is_some()
    }

    fn is_live(&self) -> bool {
        !self.destroyed && self.image.is_some() && self.container.is_drawable()
    }

    /// Screen pixels per viewport unit.
    fn scale(&self) -> f64 {
        self.container.width * self.zoom
    }

    fn home_zoom(&self) -> f64 {
        match self.image {
            Some(dims) if self.container.is_drawable() => {
                let container_aspect = self.container.height / self.container.width;
                (container_aspect / dims.aspect()).min(1.0)
            }
            _ => 1.0,
        }
    }

    fn apply_home(&mut self) {
        let aspect = self.image.map(|d| d.aspect()).unwrap_or(1.0);
        self.center = ViewportPoint::new(0.5, aspect / 2.0);
        self.zoom = self.home_zoom();
    }

    fn emit(&mut self, event: ViewerEvent) {
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }
}

impl Viewer for FlatViewer {
    fn image_dimensions(&self) -> Option<ImageDimensions> {
        if self.destroyed {
            None
        } else {
            self.image
        }
    }

    fn image_to_viewport(&self, point: ImagePoint) -> Option<ViewportPoint> {
        let dims = self.image_dimensions()?;
        let w = dims.width as f64;
        Some(ViewportPoint::new(point.x / w, point.y / w))
    }

    fn viewport_to_image(&self, point: ViewportPoint) -> Option<ImagePoint> {
        let dims = self.image_dimensions()?;
        let w = dims.width as f64;
        Some(ImagePoint::new(point.x * w, point.y * w))
    }

    fn viewport_to_screen(&self, point: ViewportPoint) -> Option<ScreenPoint> {
        if !self.is_live() {
            return None;
        }
        let scale = self.scale();
        Some(ScreenPoint::new(
            (point.x - self.center.x) * scale + self.container.width / 2.0,
            (point.y - self.center.y) * scale + self.container.height / 2.0,
        ))
    }

    fn screen_to_viewport(&self, point: ScreenPoint) -> Option<ViewportPoint> {
        if !self.is_live() {
            return None;
        }
        let scale = self.scale();
        Some(ViewportPoint::new(
            (point.x - self.container.width / 2.0) / scale + self.center.x,
            (point.y - self.container.height / 2.0) / scale + self.center.y,
        ))
    }

    fn container_size(&self) -> Option<Size> {
        (!self.destroyed && self.container.is_drawable()).then_some(self.container)
    }

    fn center(&self) -> Option<ViewportPoint> {
        self.is_live().then_some(self.center)
    }

    fn zoom(&self) -> Option<f64> {
        self.is_live().then_some(self.zoom)
    }

    fn bounds(&self) -> Option<Rect> {
        if !self.is_live() {
            return None;
        }
        let scale = self.scale();
        let width = self.container.width / scale;
        let height = self.container.height / scale;
        Some(Rect::new(
            self.center.x - width / 2.0,
            self.center.y - height / 2.0,
            width,
            height,
        ))
    }

    fn pan_to(&mut self, point: ViewportPoint, immediate: bool) {
        if !self.is_live() {
            return;
        }
        if immediate {
            self.target = None;
            self.center = point;
            self.emit(ViewerEvent::Pan);
        } else {
            self.target = Some(point);
        }
    }

    fn zoom_by(&mut self, factor: f64, anchor: Option<ViewportPoint>) {
        if !self.is_live() || !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let old = self.zoom;
        let new = (old * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        if new == old {
            return;
        }
        if let Some(anchor) = anchor {
            let ratio = old / new;
            self.center.x = anchor.x - (anchor.x - self.center.x) * ratio;
            self.center.y = anchor.y - (anchor.y - self.center.y) * ratio;
            if let Some(target) = self.target.as_mut() {
                target.x = anchor.x - (anchor.x - target.x) * ratio;
                target.y = anchor.y - (anchor.y - target.y) * ratio;
            }
        }
        self.zoom = new;
        self.emit(ViewerEvent::Zoom);
    }

    fn go_home(&mut self, immediate: bool) {
        if !self.is_live() {
            return;
        }
        let aspect = self.image.map(|d| d.aspect()).unwrap_or(1.0);
        let home = ViewportPoint::new(0.5, aspect / 2.0);
        self.zoom = self.home_zoom();
        self.emit(ViewerEvent::Zoom);
        self.pan_to(home, immediate);
    }

    fn subscribe(&mut self) -> Receiver<ViewerEvent> {
        let (tx, rx) = channel();
        if !self.destroyed {
            self.subscribers.push(tx);
        }
        rx
    }
}
