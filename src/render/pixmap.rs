// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Raster overlay backed by tiny-skia.

use super::Surface;
use crate::models::annotation::{StrokeMode, StrokeStyle};
use crate::models::space::{ScreenPoint, Size};
use tiny_skia::{BlendMode, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

/// Transparent RGBA overlay the size of the viewer's drawing surface.
pub struct PixmapSurface {
    pixmap: Option<Pixmap>,
    dirty: bool,
}

impl PixmapSurface {
    pub fn new(size: Size) -> Self {
        let mut surface = Self {
            pixmap: None,
            dirty: true,
        };
        surface.resize(size);
        surface
    }

    /// Reallocate for a new surface size. Contents are dropped; callers replay.
    pub fn resize(&mut self, size: Size) {
        let (w, h) = pixel_size(size);
        if self.size_px() == Some((w, h)) {
            return;
        }
        self.pixmap = Pixmap::new(w, h);
        if self.pixmap.is_none() {
            log::warn!("Cannot allocate {w}x{h} overlay");
        }
        self.dirty = true;
    }

    pub fn size_px(&self) -> Option<(u32, u32)> {
        self.pixmap.as_ref().map(|p| (p.width(), p.height()))
    }

    /// Premultiplied RGBA bytes, row-major.
    pub fn data(&self) -> &[u8] {
        self.pixmap.as_ref().map_or(&[], |p| p.data())
    }

    /// Alpha of one pixel, if it exists.
    pub fn alpha_at(&self, x: u32, y: u32) -> Option<u8> {
        self.pixmap.as_ref()?.pixel(x, y).map(|c| c.alpha())
    }

    /// Report and reset whether the pixels changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}

fn pixel_size(size: Size) -> (u32, u32) {
    if !size.is_drawable() {
        return (1, 1);
    }
    (size.width.ceil().max(1.0) as u32, size.height.ceil().max(1.0) as u32)
}

impl Surface for PixmapSurface {
    fn clear(&mut self) {
        if let Some(pixmap) = self.pixmap.as_mut() {
            pixmap.fill(tiny_skia::Color::TRANSPARENT);
            self.dirty = true;
        }
    }

    fn draw_segment(&mut self, from: ScreenPoint, to: ScreenPoint, style: &StrokeStyle) {
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };

        let mut pb = PathBuilder::new();
        pb.move_to(from.x as f32, from.y as f32);
        pb.line_to(to.x as f32, to.y as f32);
        let Some(path) = pb.finish() else {
            return;
        };

        let [r, g, b, a] = style.rgba();
        let mut paint = Paint::default();
        paint.anti_alias = true;
        match style.mode {
            StrokeMode::Paint => paint.set_color_rgba8(r, g, b, a),
            StrokeMode::Erase => {
                // Destination-out only looks at source alpha.
                paint.set_color_rgba8(0, 0, 0, a);
                paint.blend_mode = BlendMode::DestinationOut;
            }
        }

        let stroke = Stroke {
            width: style.size as f32,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Default::default()
        };
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paint() -> StrokeStyle {
        StrokeStyle {
            size: 6.0,
            ..StrokeStyle::default()
        }
    }

    #[test]
    fn paint_then_erase_clears_pixels() {
        let mut surface = PixmapSurface::new(Size::new(64.0, 64.0));
        let a = ScreenPoint::new(8.0, 32.0);
        let b = ScreenPoint::new(56.0, 32.0);

        surface.draw_segment(a, b, &paint());
        assert_eq!(surface.alpha_at(32, 32), Some(255));

        surface.draw_segment(a, b, &paint().with_mode(StrokeMode::Erase));
        assert_eq!(surface.alpha_at(32, 32), Some(0));
    }

    #[test]
    fn clear_and_resize_mark_dirty() {
        let mut surface = PixmapSurface::new(Size::new(10.0, 10.0));
        assert!(surface.take_dirty());
        assert!(!surface.take_dirty());
        surface.clear();
        assert!(surface.take_dirty());
        surface.resize(Size::new(20.5, 10.0));
        assert_eq!(surface.size_px(), Some((21, 10)));
        assert!(surface.take_dirty());
        assert_eq!(surface.data().len(), 21 * 10 * 4);
    }
}
