// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Viewer canvas with the stroke overlay on top.
//!
//! Interaction and painting are split: [`interact`] reads the pointer and
//! reports what the user did, the app applies it to the viewer and stroke
//! engine, and only then are the image and overlay painted, so both reflect
//! the same viewport.

use crate::engine::Tool;
use crate::models::space::{Rect, ScreenPoint, Size};

/// Scroll distance, in points, that zooms by one zoom step.
const SCROLL_PER_STEP: f64 = 50.0;

/// Result of canvas interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasAction {
    None,
    BeginStroke(ScreenPoint),
    ExtendStroke(ScreenPoint),
    EndStroke,
    Pan { dx: f64, dy: f64 },
    Zoom { factor: f64, anchor: ScreenPoint },
}

/// The canvas area allocated for this frame.
pub struct CanvasFrame {
    pub rect: egui::Rect,
    pub painter: egui::Painter,
    pub action: CanvasAction,
}

impl CanvasFrame {
    /// Drawing surface size in screen pixels.
    pub fn size(&self) -> Size {
        Size::new(self.rect.width() as f64, self.rect.height() as f64)
    }

    /// egui position to a point relative to the canvas origin.
    pub fn to_local(&self, pos: egui::Pos2) -> ScreenPoint {
        ScreenPoint::new((pos.x - self.rect.min.x) as f64, (pos.y - self.rect.min.y) as f64)
    }

    /// Canvas-relative rectangle to egui coordinates.
    pub fn to_screen(&self, rect: Rect) -> egui::Rect {
        egui::Rect::from_min_size(
            self.rect.min + egui::vec2(rect.x as f32, rect.y as f32),
            egui::vec2(rect.width as f32, rect.height as f32),
        )
    }
}

/// Allocate the canvas and translate pointer input into an action.
pub fn interact(ui: &mut egui::Ui, tool: Tool, zoom_step: f64) -> CanvasFrame {
    let (rect, response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
    let mut frame = CanvasFrame {
        rect,
        painter: ui.painter_at(rect),
        action: CanvasAction::None,
    };
    frame.painter.rect_filled(rect, 0.0, egui::Color32::from_gray(40));

    let drawing = tool.is_drawing();
    let primary = egui::PointerButton::Primary;

    if drawing && response.drag_started_by(primary) {
        // Start where the button went down, not where the drag threshold was crossed.
        let origin = ui.input(|i| i.pointer.press_origin()).or(response.interact_pointer_pos());
        if let Some(pos) = origin {
            frame.action = CanvasAction::BeginStroke(frame.to_local(pos));
        }
    } else if drawing && response.drag_stopped_by(primary) {
        frame.action = CanvasAction::EndStroke;
    } else if drawing && response.dragged_by(primary) {
        if let Some(pos) = response.interact_pointer_pos() {
            frame.action = CanvasAction::ExtendStroke(frame.to_local(pos));
        }
    } else if response.dragged() {
        let delta = response.drag_delta();
        frame.action = CanvasAction::Pan {
            dx: delta.x as f64,
            dy: delta.y as f64,
        };
    } else if let Some(pos) = response.hover_pos() {
        let (scroll, pinch) = ui.input(|i| (i.smooth_scroll_delta.y, i.zoom_delta()));
        let factor = pinch as f64 * zoom_step.powf(scroll as f64 / SCROLL_PER_STEP);
        if factor != 1.0 {
            frame.action = CanvasAction::Zoom {
                factor,
                anchor: frame.to_local(pos),
            };
        }
    }

    if drawing {
        ui.ctx().set_cursor_icon(egui::CursorIcon::Crosshair);
    } else if response.dragged() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
    }
    frame
}

/// Draw the image texture where the viewer currently places it.
pub fn paint_image(frame: &CanvasFrame, texture: &egui::TextureHandle, placement: Rect) {
    frame.painter.image(
        texture.id(),
        frame.to_screen(placement),
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );
}

/// Draw the stroke overlay, one texel per screen pixel from the canvas origin.
pub fn paint_overlay(frame: &CanvasFrame, texture: &egui::TextureHandle) {
    let size = texture.size_vec2();
    frame.painter.image(
        texture.id(),
        egui::Rect::from_min_size(frame.rect.min, size),
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );
}

/// Welcome text shown while no image is open.
pub fn paint_placeholder(frame: &CanvasFrame) {
    let center = frame.rect.center();
    frame.painter.text(
        center - egui::vec2(0.0, 20.0),
        egui::Align2::CENTER_CENTER,
        "DEEPINK",
        egui::FontId::proportional(32.0),
        egui::Color32::from_gray(200),
    );
    frame.painter.text(
        center + egui::vec2(0.0, 14.0),
        egui::Align2::CENTER_CENTER,
        "Open an image to begin annotating",
        egui::FontId::proportional(14.0),
        egui::Color32::from_gray(160),
    );
    frame.painter.text(
        center + egui::vec2(0.0, 36.0),
        egui::Align2::CENTER_CENTER,
        "File → Open Image...",
        egui::FontId::proportional(12.0),
        egui::Color32::from_gray(130),
    );
}

/// Spinner and message shown while an image is loading.
pub fn show_loading(ui: &mut egui::Ui, message: &str) {
    ui.centered_and_justified(|ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.spinner();
            ui.add_space(10.0);
            ui.label(
                egui::RichText::new(message)
                    .size(16.0)
                    .color(egui::Color32::from_gray(200)),
            );
        });
    });
}
