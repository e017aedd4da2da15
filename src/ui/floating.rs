// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Chrome for floating panels placed by the widget layout.

use super::canvas::CanvasFrame;
use crate::models::space::Rect;
use crate::widgets::DraggableWidget;

/// A floating panel drawn this frame.
pub struct Panel {
    /// Area below the grab strip, in egui coordinates.
    pub body: egui::Rect,
    /// Response of the grab strip; drags on it move the panel.
    pub handle: egui::Response,
}

/// Draw a panel frame with a titled grab strip at the widget's position.
pub fn panel(ui: &mut egui::Ui, canvas: &CanvasFrame, widget: &DraggableWidget, title: &str) -> Panel {
    let spec = widget.spec();
    let pos = widget.position();
    let outer = canvas.to_screen(Rect::new(pos.x, pos.y, spec.size.width, spec.size.height));
    let split_y = outer.min.y + spec.handle_height as f32;
    let handle_rect = egui::Rect::from_min_max(outer.min, egui::pos2(outer.max.x, split_y));
    let body = egui::Rect::from_min_max(egui::pos2(outer.min.x, split_y), outer.max);

    let visuals = ui.visuals();
    canvas.painter.rect(
        outer,
        6.0,
        visuals.window_fill,
        visuals.window_stroke,
    );
    canvas.painter.rect_filled(
        handle_rect,
        egui::Rounding {
            nw: 6.0,
            ne: 6.0,
            sw: 0.0,
            se: 0.0,
        },
        visuals.faint_bg_color,
    );
    canvas.painter.text(
        handle_rect.left_center() + egui::vec2(8.0, 0.0),
        egui::Align2::LEFT_CENTER,
        title,
        egui::FontId::proportional(13.0),
        visuals.text_color(),
    );

    // Clicks on the panel body must not reach the canvas underneath.
    ui.interact(
        body,
        egui::Id::new(("widget-body", widget.id())),
        egui::Sense::click_and_drag(),
    );

    let handle = ui.interact(
        handle_rect,
        egui::Id::new(("widget-handle", widget.id())),
        egui::Sense::drag(),
    );
    if handle.hovered() || handle.dragged() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
    }
    Panel { body, handle }
}
