// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! Shapes are stored in the pixel space of the canvas they were drawn on.
//! This module maps that stored geometry onto the current canvas size and
//! back, and provides the hit testing and drag bounds used by the editor.

use crate::models::shape::{CanvasSize, Geometry, Point, ShapeProperties};

/// Per-axis factors that take stored coordinates to the current canvas.
///
/// A degenerate stored canvas renders geometry unscaled.
pub fn scale_factors(stored: CanvasSize, current: CanvasSize) -> (f64, f64) {
    if stored.is_degenerate() {
        return (1.0, 1.0);
    }
    (current.width / stored.width, current.height / stored.height)
}

/// Convert a stored point to current canvas coordinates.
pub fn to_current(point: Point, stored: CanvasSize, current: CanvasSize) -> Point {
    let (sx, sy) = scale_factors(stored, current);
    Point::new(point.x * sx, point.y * sy)
}

/// Convert a current canvas point back into stored coordinates.
pub fn to_stored(point: Point, stored: CanvasSize, current: CanvasSize) -> Point {
    if stored.is_degenerate() || current.is_degenerate() {
        return point;
    }
    Point::new(
        point.x * stored.width / current.width,
        point.y * stored.height / current.height,
    )
}

/// A shape's geometry expressed on the current canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedShape {
    pub position: Point,
    pub geometry: Geometry,
}

impl RenderedShape {
    /// Axis-aligned bounds `(min, max)` in canvas coordinates.
    pub fn bounds(&self) -> (Point, Point) {
        let (min_x, min_y, max_x, max_y) = self.geometry.extent();
        (
            Point::new(self.position.x + min_x, self.position.y + min_y),
            Point::new(self.position.x + max_x, self.position.y + max_y),
        )
    }

    /// Whether `point` lies on or within `tolerance` pixels of the shape.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let local = Point::new(point.x - self.position.x, point.y - self.position.y);
        match &self.geometry {
            Geometry::Rectangle { .. } => {
                let (min, max) = self.bounds();
                point.x >= min.x - tolerance
                    && point.x <= max.x + tolerance
                    && point.y >= min.y - tolerance
                    && point.y <= max.y + tolerance
            }
            Geometry::Circle { radius } => {
                local.distance_to(&Point::default()) <= radius.abs() + tolerance
            }
            Geometry::Line { points } => points
                .windows(2)
                .any(|seg| distance_to_segment(local, seg[0], seg[1]) <= tolerance),
        }
    }
}

/// Rescale stored properties onto a canvas of size `current`.
pub fn render(properties: &ShapeProperties, current: CanvasSize) -> RenderedShape {
    let (sx, sy) = scale_factors(properties.screen(), current);
    RenderedShape {
        position: Point::new(properties.x * sx, properties.y * sy),
        geometry: properties.geometry.scaled(sx, sy),
    }
}

/// Clamp a shape position so its bounding box stays on the canvas.
///
/// `extent` is the geometry's `(min_x, min_y, max_x, max_y)` offsets. When
/// the shape is larger than the canvas the lower bound wins.
pub fn clamp_position(position: Point, extent: (f64, f64, f64, f64), canvas: CanvasSize) -> Point {
    let (min_x, min_y, max_x, max_y) = extent;
    let x = (-min_x).max(position.x.min(canvas.width - max_x));
    let y = (-min_y).max(position.y.min(canvas.height - max_y));
    Point::new(x, y)
}

/// Shortest distance from `p` to the segment `a`-`b`.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return p.distance_to(&a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance_to(&Point::new(a.x + t * dx, a.y + t * dy))
}
