// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Zoom controls and readout.

/// Result of navigator interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigatorAction {
    None,
    ZoomIn,
    ZoomOut,
    Home,
}

/// Draw the zoom buttons and current zoom inside a panel body.
pub fn show(ui: &mut egui::Ui, body: egui::Rect, zoom: Option<f64>) -> NavigatorAction {
    let mut action = NavigatorAction::None;
    let enabled = zoom.is_some();
    let button_size = egui::vec2(28.0, 24.0);
    let row = body.shrink(6.0);
    let mut cursor = row.left_center() - egui::vec2(0.0, button_size.y / 2.0);

    for (label, hover, candidate) in [
        ("+", "Zoom in", NavigatorAction::ZoomIn),
        ("−", "Zoom out", NavigatorAction::ZoomOut),
        ("⌂", "Show whole image", NavigatorAction::Home),
    ] {
        let rect = egui::Rect::from_min_size(cursor, button_size);
        if ui
            .put(rect, egui::Button::new(label))
            .on_hover_text(hover)
            .clicked()
            && enabled
        {
            action = candidate;
        }
        cursor.x += button_size.x + 4.0;
    }

    let readout = zoom.map_or_else(|| "—".to_string(), |z| format!("{:.0}%", z * 100.0));
    ui.painter().text(
        row.right_center(),
        egui::Align2::RIGHT_CENTER,
        readout,
        egui::FontId::monospace(13.0),
        ui.visuals().text_color(),
    );
    action
}
