// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Shape properties panel.
//!
//! This module lists the committed shapes and shows the full record of the
//! selected one: geometry, placement, time window and style.

use crate::editor::state::EditorState;
use crate::models::shape::{Geometry, Shape, ShapeId, ShapeType};
use crate::playback::adapter::format_time;

/// Result of properties panel interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertiesAction {
    None,
    SelectShape(ShapeId),
    DeleteShape(ShapeId),
}

/// Display the shape list and the selected shape's record.
///
/// `can_select` is false while playing or edit-locked; the list is then
/// read-only.
pub fn show(ui: &mut egui::Ui, editor: &EditorState, can_select: bool) -> PropertiesAction {
    let mut action = PropertiesAction::None;

    ui.heading("Shapes");
    ui.label(format!("{} total", editor.shapes().len()));
    ui.separator();

    egui::ScrollArea::vertical()
        .id_source("shape_list")
        .max_height(ui.available_height() * 0.5)
        .show(ui, |ui| {
            for shape in editor.shapes() {
                let selected = editor.selected_id() == Some(shape.id.as_str());
                ui.horizontal(|ui| {
                    let text = format!(
                        "{} {} [{}-{}]",
                        type_name(shape),
                        short_id(&shape.id),
                        format_time(shape.properties.start_time),
                        format_time(shape.properties.end_time),
                    );
                    let response =
                        ui.add_enabled(can_select, egui::SelectableLabel::new(selected, text));
                    if response.clicked() {
                        action = PropertiesAction::SelectShape(shape.id.clone());
                    }
                    if ui
                        .add_enabled(can_select, egui::Button::new("🗑").small())
                        .on_hover_text("Delete shape")
                        .clicked()
                    {
                        action = PropertiesAction::DeleteShape(shape.id.clone());
                    }
                });
            }
        });

    ui.separator();

    match editor.selected_shape() {
        Some(shape) => show_record(ui, shape),
        None => {
            ui.label(egui::RichText::new("No shape selected").weak());
        }
    }

    action
}

fn show_record(ui: &mut egui::Ui, shape: &Shape) {
    let p = &shape.properties;
    egui::Grid::new("shape_record")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui| {
            ui.label("Id");
            ui.label(shape.id.as_str());
            ui.end_row();

            ui.label("Type");
            ui.label(type_name(shape));
            ui.end_row();

            if !shape.label.is_empty() {
                ui.label("Label");
                ui.label(shape.label.as_str());
                ui.end_row();
            }

            ui.label("Position");
            ui.label(format!("({:.1}, {:.1})", p.x, p.y));
            ui.end_row();

            match &p.geometry {
                Geometry::Rectangle { width, height } => {
                    ui.label("Size");
                    ui.label(format!("{:.1} × {:.1}", width, height));
                    ui.end_row();
                }
                Geometry::Circle { radius } => {
                    ui.label("Radius");
                    ui.label(format!("{:.1}", radius));
                    ui.end_row();
                }
                Geometry::Line { points } => {
                    ui.label("Points");
                    ui.label(points.len().to_string());
                    ui.end_row();
                }
            }

            ui.label("Window");
            ui.label(format!("{:.2}s – {:.2}s", p.start_time, p.end_time));
            ui.end_row();

            ui.label("Drawn on");
            ui.label(format!("{:.0} × {:.0}", p.screen_width, p.screen_height));
            ui.end_row();

            ui.label("Colour");
            ui.horizontal(|ui| {
                let (rect, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                ui.painter()
                    .rect_filled(rect, 2.0, super::shape_color(&shape.color, 1.0));
                ui.label(shape.color.as_str());
            });
            ui.end_row();

            ui.label("Stroke");
            ui.label(format!("{:.1} px, {:.0}% opacity", p.stroke_width, p.opacity * 100.0));
            ui.end_row();

            for (key, value) in &shape.data {
                ui.label(key.as_str());
                ui.label(value.to_string());
                ui.end_row();
            }
        });
}

fn type_name(shape: &Shape) -> &'static str {
    match shape.shape_type() {
        ShapeType::Rectangle => "Rectangle",
        ShapeType::Circle => "Circle",
        ShapeType::Line => "Line",
    }
}

/// First block of a generated id, enough to tell shapes apart in a list.
fn short_id(id: &str) -> &str {
    id.split('-').next().unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("1b4e28ba-2fa1-11d2-883f-0016d3cca427"), "1b4e28ba");
        assert_eq!(short_id("plain"), "plain");
    }
}
