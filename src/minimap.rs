// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Overview map of the whole image with the visible region marked.
//!
//! Drawing and click handling share one [`MinimapProjection`], so a click
//! always lands exactly where the map shows it.

use crate::models::annotation::NormalizedPoint;
use crate::models::space::{ImageDimensions, ImagePoint, Rect, Size, ViewportState};
use crate::util::geometry;
use crate::viewer::Viewer;
use std::f64::consts::TAU;

/// Seconds per pulse of the center marker.
const PULSE_PERIOD: f64 = 1.0;

/// Maps normalized image space onto minimap canvas pixels.
///
/// The mapped extent covers both the image and the visible viewport, so when
/// zoomed out past the image the image shrinks inside the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimapProjection {
    dims: ImageDimensions,
    /// Canvas pixels per image pixel.
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

impl MinimapProjection {
    pub fn new(state: &ViewportState, dims: ImageDimensions, canvas: Size, padding: f64) -> Option<Self> {
        let (w, h) = (dims.width as f64, dims.height as f64);
        let image = Rect::new(0.0, 0.0, w, h);
        let b = state.bounds_normalized;
        let visible = Rect::new(b.x * w, b.y * h, b.width * w, b.height * h);
        let extent = if visible.width.is_finite() && visible.height.is_finite() {
            image.union(&visible)
        } else {
            image
        };

        let available = Size::new(canvas.width - 2.0 * padding, canvas.height - 2.0 * padding);
        if !available.is_drawable() {
            return None;
        }
        let scale = (available.width / extent.width).min(available.height / extent.height);
        Some(Self {
            dims,
            scale,
            offset_x: (canvas.width - extent.width * scale) / 2.0 - extent.x * scale,
            offset_y: (canvas.height - extent.height * scale) / 2.0 - extent.y * scale,
        })
    }

    /// Normalized image point to canvas pixels.
    pub fn project(&self, point: NormalizedPoint) -> (f64, f64) {
        let (x, y) = geometry::denormalize_coordinates(&point, self.dims.width, self.dims.height);
        (x * self.scale + self.offset_x, y * self.scale + self.offset_y)
    }

    /// Canvas pixels back to a normalized point, clamped onto the image.
    pub fn unproject(&self, x: f64, y: f64) -> NormalizedPoint {
        let image = ImagePoint::new((x - self.offset_x) / self.scale, (y - self.offset_y) / self.scale);
        let image = geometry::clamp_to_image_bounds(image, self.dims);
        geometry::normalize_coordinates(image.x, image.y, self.dims.width, self.dims.height)
    }

    /// Normalized rectangle to canvas pixels.
    pub fn project_rect(&self, rect: Rect) -> Rect {
        let (x0, y0) = self.project(NormalizedPoint::new(rect.x, rect.y));
        let (x1, y1) = self.project(NormalizedPoint::new(rect.right(), rect.bottom()));
        Rect::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// Where the whole image sits on the canvas.
    pub fn image_rect(&self) -> Rect {
        self.project_rect(Rect::new(0.0, 0.0, 1.0, 1.0))
    }
}

/// One minimap drawing operation, in canvas pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum MinimapCommand {
    Background(Rect),
    ImageBorder(Rect),
    /// Translucent fill plus outline of the visible region.
    ViewportRect(Rect),
    CenterMarker { x: f64, y: f64, radius: f64, alpha: f64 },
}

/// Builds minimap draw commands and turns clicks into pan requests.
#[derive(Debug, Clone, Copy)]
pub struct MinimapRenderer {
    pub padding: f64,
    pub marker_radius: f64,
}

impl Default for MinimapRenderer {
    fn default() -> Self {
        Self {
            padding: 6.0,
            marker_radius: 4.0,
        }
    }
}

impl MinimapRenderer {
    pub fn projection(
        &self,
        state: &ViewportState,
        dims: ImageDimensions,
        canvas: Size,
    ) -> Option<MinimapProjection> {
        MinimapProjection::new(state, dims, canvas, self.padding)
    }

    /// Draw commands for the given view. `elapsed_secs` only drives the marker pulse.
    pub fn render(
        &self,
        state: &ViewportState,
        dims: ImageDimensions,
        canvas: Size,
        elapsed_secs: f64,
    ) -> Vec<MinimapCommand> {
        let background = MinimapCommand::Background(Rect::new(0.0, 0.0, canvas.width, canvas.height));
        let Some(projection) = self.projection(state, dims, canvas) else {
            return vec![background];
        };

        let (x, y) = projection.project(state.center);
        let (radius_scale, alpha) = pulse(elapsed_secs);
        vec![
            background,
            MinimapCommand::ImageBorder(projection.image_rect()),
            MinimapCommand::ViewportRect(projection.project_rect(state.bounds_normalized)),
            MinimapCommand::CenterMarker {
                x,
                y,
                radius: self.marker_radius * radius_scale,
                alpha,
            },
        ]
    }

    /// Pan the viewer to the clicked spot. Returns the normalized target.
    pub fn handle_click<V: Viewer + ?Sized>(
        &self,
        viewer: &mut V,
        state: &ViewportState,
        canvas: Size,
        x: f64,
        y: f64,
    ) -> Option<NormalizedPoint> {
        let dims = viewer.image_dimensions()?;
        let target = self.projection(state, dims, canvas)?.unproject(x, y);
        let viewport_target = geometry::normalized_to_viewport(viewer, target)?;
        log::debug!("Minimap click -> ({:.4}, {:.4})", target.x, target.y);
        viewer.pan_to(viewport_target, false);
        Some(target)
    }
}

/// Marker radius multiplier and opacity at a point in time.
fn pulse(elapsed_secs: f64) -> (f64, f64) {
    let wave = (elapsed_secs * TAU / PULSE_PERIOD).sin();
    (1.0 + 0.25 * wave, 0.65 + 0.35 * wave)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::space::ViewportPoint;
    use crate::viewer::FlatViewer;

    fn dims() -> ImageDimensions {
        ImageDimensions::new(4000, 3000).unwrap()
    }

    fn state(center: (f64, f64), zoom: f64, bounds: Rect) -> ViewportState {
        ViewportState {
            center: NormalizedPoint::new(center.0, center.1),
            zoom,
            bounds_normalized: bounds,
        }
    }

    fn zoomed_in() -> ViewportState {
        state((0.5, 0.5), 4.0, Rect::new(0.375, 0.375, 0.25, 0.25))
    }

    #[test]
    fn image_fills_canvas_when_zoomed_in() {
        let p = MinimapProjection::new(&zoomed_in(), dims(), Size::new(200.0, 150.0), 0.0).unwrap();
        let r = p.image_rect();
        assert!((r.x).abs() < 1e-9 && (r.y).abs() < 1e-9);
        assert!((r.width - 200.0).abs() < 1e-9 && (r.height - 150.0).abs() < 1e-9);
    }

    #[test]
    fn image_shrinks_when_zoomed_out() {
        let s = state((0.5, 0.5), 0.5, Rect::new(-0.5, -0.5, 2.0, 2.0));
        let p = MinimapProjection::new(&s, dims(), Size::new(200.0, 150.0), 0.0).unwrap();
        let r = p.image_rect();
        assert!((r.width - 100.0).abs() < 1e-9);
        assert!((r.x - 50.0).abs() < 1e-9);
        let v = p.project_rect(s.bounds_normalized);
        assert!((v.width - 200.0).abs() < 1e-9);
    }

    #[test]
    fn click_inverts_draw_projection() {
        let p = MinimapProjection::new(&zoomed_in(), dims(), Size::new(240.0, 160.0), 6.0).unwrap();
        for &(x, y) in &[(0.0, 0.0), (0.25, 0.8), (0.5, 0.5), (1.0, 1.0), (0.731, 0.119)] {
            let (cx, cy) = p.project(NormalizedPoint::new(x, y));
            let back = p.unproject(cx, cy);
            assert!((back.x - x).abs() < 1e-12 && (back.y - y).abs() < 1e-12);
        }
    }

    #[test]
    fn click_outside_image_is_clamped() {
        let p = MinimapProjection::new(&zoomed_in(), dims(), Size::new(200.0, 150.0), 10.0).unwrap();
        assert_eq!(p.unproject(-40.0, 500.0), NormalizedPoint::new(0.0, 1.0));
    }

    #[test]
    fn render_emits_all_layers_in_order() {
        let cmds = MinimapRenderer::default().render(&zoomed_in(), dims(), Size::new(200.0, 150.0), 0.0);
        assert_eq!(cmds.len(), 4);
        assert!(matches!(cmds[0], MinimapCommand::Background(_)));
        assert!(matches!(cmds[1], MinimapCommand::ImageBorder(_)));
        assert!(matches!(cmds[2], MinimapCommand::ViewportRect(_)));
        let MinimapCommand::CenterMarker { x, y, radius, alpha } = cmds[3] else {
            panic!("expected center marker");
        };
        assert!((x - 100.0).abs() < 1e-9 && (y - 75.0).abs() < 1e-9);
        assert!((radius - 4.0).abs() < 1e-9);
        assert!((alpha - 0.65).abs() < 1e-9);
    }

    #[test]
    fn tiny_canvas_draws_background_only() {
        let cmds = MinimapRenderer::default().render(&zoomed_in(), dims(), Size::new(8.0, 8.0), 0.0);
        assert_eq!(cmds.len(), 1);
    }

    #[test]
    fn pulse_stays_in_range() {
        for i in 0..100 {
            let (r, a) = pulse(i as f64 * 0.037);
            assert!((0.75..=1.25).contains(&r));
            assert!((0.3..=1.0).contains(&a));
        }
    }

    #[test]
    fn click_pans_viewer() {
        let mut viewer = FlatViewer::new(Size::new(800.0, 600.0));
        viewer.open(dims());
        viewer.zoom_by(4.0, None);
        let state = geometry::viewport_state(&viewer).unwrap();
        let renderer = MinimapRenderer::default();
        let canvas = Size::new(200.0, 150.0);

        let projection = renderer.projection(&state, dims(), canvas).unwrap();
        let (cx, cy) = projection.project(NormalizedPoint::new(0.2, 0.7));
        let target = renderer.handle_click(&mut viewer, &state, canvas, cx, cy).unwrap();
        while viewer.update(1.0 / 60.0) {}

        let center = viewer.center().unwrap();
        let expected = ViewportPoint::new(target.x, target.y * 0.75);
        assert!((center.x - expected.x).abs() < 1e-9 && (center.y - expected.y).abs() < 1e-9);
        assert!((target.x - 0.2).abs() < 1e-9 && (target.y - 0.7).abs() < 1e-9);
    }
}
