// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar and tool selection UI.
//!
//! This module provides the toolbar for picking the select tool or one of
//! the shape drawing tools.

use crate::editor::Tool;

/// Display the toolbar with tool selection buttons. Tool buttons are
/// disabled while editing is not possible.
pub fn show(ui: &mut egui::Ui, current_tool: &mut Tool, editable: bool) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label("Tools:");

        ui.separator();

        ui.add_enabled_ui(editable, |ui| {
            for (tool, label) in [
                (Tool::Select, "⬆ Select"),
                (Tool::Rectangle, "▭ Rectangle"),
                (Tool::Circle, "◯ Circle"),
                (Tool::Line, "⟋ Line"),
            ] {
                if ui.selectable_label(*current_tool == tool, label).clicked() {
                    *current_tool = tool;
                    log::info!("Selected tool {}", tool);
                }
            }
        });

        ui.separator();

        let tool_text = if !editable {
            "Editing is disabled"
        } else {
            match current_tool {
                Tool::Select => "Click to select a shape while paused, drag to move, drag the handle to resize",
                Tool::Rectangle => "Drag to draw a rectangle",
                Tool::Circle => "Drag outward from the centre to draw a circle",
                Tool::Line => "Drag to draw a line",
            }
        };

        ui.label(egui::RichText::new(tool_text).italics().weak());
    });
}
