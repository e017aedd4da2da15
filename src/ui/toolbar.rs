// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbox with tool selection and brush controls.
//!
//! This module provides the toolbox contents for selecting the pointer
//! tool, adjusting the brush used for new strokes, and editing history.

use crate::engine::Tool;
use crate::models::annotation::{Rgb, StrokeStyle};

const MAX_BRUSH_SIZE: f64 = 64.0;

/// Result of toolbox interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    None,
    Undo,
    Redo,
    Clear,
}

/// What the toolbox needs to know to enable its buttons.
#[derive(Debug, Clone, Copy)]
pub struct HistoryState {
    pub can_undo: bool,
    pub can_redo: bool,
    pub has_strokes: bool,
}

/// Display the tool buttons and brush settings.
pub fn show(ui: &mut egui::Ui, current_tool: &mut Tool, brush: &mut StrokeStyle, history: HistoryState) -> ToolbarAction {
    let mut action = ToolbarAction::None;
    ui.spacing_mut().slider_width = 110.0;

    ui.horizontal(|ui| {
        if ui.selectable_label(*current_tool == Tool::Pan, "✋ Pan").clicked() {
            *current_tool = Tool::Pan;
        }

        if ui.selectable_label(*current_tool == Tool::Draw, "✏ Draw").clicked() {
            *current_tool = Tool::Draw;
        }

        if ui.selectable_label(*current_tool == Tool::Erase, "⌫ Erase").clicked() {
            *current_tool = Tool::Erase;
        }
    });

    ui.separator();

    ui.horizontal(|ui| {
        ui.label("Size");
        ui.add(egui::Slider::new(&mut brush.size, StrokeStyle::MIN_SIZE..=MAX_BRUSH_SIZE).suffix(" px"));
    });

    ui.horizontal(|ui| {
        ui.label("Opacity");
        ui.add(egui::Slider::new(&mut brush.opacity, 0.0..=1.0).fixed_decimals(2));
    });

    ui.horizontal(|ui| {
        ui.label("Color");
        let mut rgb = [brush.color.r, brush.color.g, brush.color.b];
        if ui.color_edit_button_srgb(&mut rgb).changed() {
            brush.color = Rgb::new(rgb[0], rgb[1], rgb[2]);
        }
    });

    ui.separator();

    ui.horizontal(|ui| {
        if ui.add_enabled(history.can_undo, egui::Button::new("↶ Undo")).clicked() {
            action = ToolbarAction::Undo;
        }
        if ui.add_enabled(history.can_redo, egui::Button::new("↷ Redo")).clicked() {
            action = ToolbarAction::Redo;
        }
        if ui.add_enabled(history.has_strokes, egui::Button::new("Clear")).clicked() {
            action = ToolbarAction::Clear;
        }
    });

    // Tool description
    let tool_text = match current_tool {
        Tool::Pan => "Drag to pan, scroll to zoom",
        Tool::Draw => "Drag to draw, right-drag to pan",
        Tool::Erase => "Drag to erase, right-drag to pan",
    };

    ui.label(egui::RichText::new(tool_text).italics().weak());
    action
}
