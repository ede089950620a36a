// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Timeline strip showing shape time windows and the playhead.

use crate::editor::state::EditorState;

/// Height of one lane in the strip.
const LANE_HEIGHT: f32 = 6.0;

/// Lanes before bars start to overlap.
const LANES: usize = 4;

/// Result of timeline interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimelineAction {
    None,
    /// Seek to this many seconds.
    Seek(f64),
}

/// Draw the timeline. Clicking or dragging on it seeks. Does nothing useful
/// until the duration is known.
pub fn show(
    ui: &mut egui::Ui,
    editor: &EditorState,
    current_time: f64,
    duration: Option<f64>,
) -> TimelineAction {
    let height = LANE_HEIGHT * LANES as f32 + 8.0;
    let (rect, response) = ui.allocate_exact_size(
        egui::vec2(ui.available_width(), height),
        egui::Sense::click_and_drag(),
    );
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 2.0, egui::Color32::from_gray(30));

    let Some(duration) = duration.filter(|d| *d > 0.0) else {
        return TimelineAction::None;
    };

    let x_of = |t: f64| rect.min.x + (t / duration).clamp(0.0, 1.0) as f32 * rect.width();
    let selected = editor.selected_id();

    for (i, shape) in editor.shapes().iter().enumerate() {
        let top = rect.min.y + 4.0 + (i % LANES) as f32 * LANE_HEIGHT;
        let bar = egui::Rect::from_min_max(
            egui::pos2(x_of(shape.properties.start_time), top),
            egui::pos2(
                x_of(shape.properties.end_time).max(x_of(shape.properties.start_time) + 2.0),
                top + LANE_HEIGHT - 1.0,
            ),
        );
        let mut color = super::shape_color(&shape.color, 0.8);
        if selected == Some(shape.id.as_str()) {
            color = egui::Color32::WHITE;
        }
        painter.rect_filled(bar, 1.0, color);
    }

    let playhead = x_of(current_time);
    painter.line_segment(
        [egui::pos2(playhead, rect.min.y), egui::pos2(playhead, rect.max.y)],
        egui::Stroke::new(2.0, egui::Color32::YELLOW),
    );

    if response.clicked() || response.dragged() {
        if let Some(pos) = response.interact_pointer_pos() {
            return TimelineAction::Seek(time_at(pos.x, rect, duration));
        }
    }
    TimelineAction::None
}

/// Time under horizontal screen position `x`.
fn time_at(x: f32, rect: egui::Rect, duration: f64) -> f64 {
    let fraction = ((x - rect.min.x) / rect.width().max(1.0)).clamp(0.0, 1.0);
    fraction as f64 * duration
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_at_maps_and_clamps() {
        let rect = egui::Rect::from_min_size(egui::pos2(100.0, 0.0), egui::vec2(200.0, 20.0));
        assert_eq!(time_at(200.0, rect, 60.0), 30.0);
        assert_eq!(time_at(0.0, rect, 60.0), 0.0);
        assert_eq!(time_at(500.0, rect, 60.0), 60.0);
    }
}
