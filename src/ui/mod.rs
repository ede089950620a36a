// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the annotation editor.

pub mod canvas;
pub mod controls;
pub mod properties;
pub mod timeline;
pub mod toolbar;

/// Parse a `#RRGGBB` style colour and apply `opacity`. Unparseable colours
/// fall back to red.
pub fn shape_color(hex: &str, opacity: f64) -> egui::Color32 {
    let color = egui::Color32::from_hex(hex.trim()).unwrap_or(egui::Color32::RED);
    color.gamma_multiply(opacity.clamp(0.0, 1.0) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_color() {
        assert_eq!(shape_color("#00FF00", 1.0), egui::Color32::from_rgb(0, 255, 0));
        assert_eq!(shape_color("not a colour", 1.0), egui::Color32::RED);
        assert_eq!(shape_color("#FFFFFF", 0.0), egui::Color32::TRANSPARENT);
    }
}
