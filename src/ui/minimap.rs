// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Paints minimap draw commands into a panel body.

use crate::minimap::MinimapCommand;
use crate::models::space::Rect;

const VIEWPORT_COLOR: egui::Color32 = egui::Color32::from_rgb(0xff, 0x6d, 0x00);

fn to_egui(body: egui::Rect, rect: &Rect) -> egui::Rect {
    egui::Rect::from_min_size(
        body.min + egui::vec2(rect.x as f32, rect.y as f32),
        egui::vec2(rect.width as f32, rect.height as f32),
    )
}

/// Paint the commands and return a click position relative to the body, if any.
pub fn show(ui: &mut egui::Ui, body: egui::Rect, commands: &[MinimapCommand]) -> Option<(f64, f64)> {
    let painter = ui.painter_at(body);
    for command in commands {
        match command {
            MinimapCommand::Background(r) => {
                painter.rect_filled(to_egui(body, r), 0.0, egui::Color32::from_gray(24));
            }
            MinimapCommand::ImageBorder(r) => {
                let rect = to_egui(body, r);
                painter.rect_filled(rect, 0.0, egui::Color32::from_gray(70));
                painter.rect_stroke(rect, 0.0, egui::Stroke::new(1.0, egui::Color32::from_gray(140)));
            }
            MinimapCommand::ViewportRect(r) => {
                let rect = to_egui(body, r);
                painter.rect_filled(rect, 0.0, VIEWPORT_COLOR.gamma_multiply(0.15));
                painter.rect_stroke(rect, 0.0, egui::Stroke::new(1.5, VIEWPORT_COLOR));
            }
            MinimapCommand::CenterMarker { x, y, radius, alpha } => {
                painter.circle_filled(
                    body.min + egui::vec2(*x as f32, *y as f32),
                    *radius as f32,
                    VIEWPORT_COLOR.gamma_multiply(*alpha as f32),
                );
            }
        }
    }

    let response = ui.interact(body, egui::Id::new("minimap-body"), egui::Sense::click());
    if !response.clicked() {
        return None;
    }
    let pos = response.interact_pointer_pos()?;
    Some(((pos.x - body.min.x) as f64, (pos.y - body.min.y) as f64))
}
