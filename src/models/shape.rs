// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Shape data structures.
//!
//! This module defines the annotation shapes drawn over the video: their
//! geometry, their time window on the video timeline, and the canvas size
//! they were drawn against.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Shape identifiers are opaque strings (v4 UUIDs for shapes drawn here).
pub type ShapeId = String;

/// Length of the time window given to a freshly drawn shape, in seconds.
pub const DEFAULT_WINDOW_SECS: f64 = 0.5;

/// Stroke width used when none is configured.
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;

/// A 2D point in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Width and height of the drawing canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A canvas with a zero or negative axis cannot be used as a scale base.
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Geometric kind of a shape, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeType {
    Rectangle,
    Circle,
    Line,
}

/// Type-specific geometry, relative to the shape position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Geometry {
    /// Width and height may be negative when drawn up or to the left.
    Rectangle { width: f64, height: f64 },
    Circle { radius: f64 },
    /// Points are offsets from the shape position.
    Line { points: Vec<Point> },
}

impl Geometry {
    /// Initial geometry for a shape that has just been started.
    pub fn initial(shape_type: ShapeType) -> Self {
        match shape_type {
            ShapeType::Rectangle => Geometry::Rectangle {
                width: 4.0,
                height: 4.0,
            },
            ShapeType::Circle => Geometry::Circle { radius: 4.0 },
            ShapeType::Line => Geometry::Line {
                points: vec![
                    Point::new(0.0, 0.0),
                    Point::new(100.0, 0.0),
                    Point::new(100.0, 100.0),
                ],
            },
        }
    }

    pub fn shape_type(&self) -> ShapeType {
        match self {
            Geometry::Rectangle { .. } => ShapeType::Rectangle,
            Geometry::Circle { .. } => ShapeType::Circle,
            Geometry::Line { .. } => ShapeType::Line,
        }
    }

    /// Bounding box offsets `(min_x, min_y, max_x, max_y)` relative to the
    /// shape position.
    pub fn extent(&self) -> (f64, f64, f64, f64) {
        match self {
            Geometry::Rectangle { width, height } => (
                width.min(0.0),
                height.min(0.0),
                width.max(0.0),
                height.max(0.0),
            ),
            Geometry::Circle { radius } => {
                let r = radius.abs();
                (-r, -r, r, r)
            }
            Geometry::Line { points } => {
                if points.is_empty() {
                    return (0.0, 0.0, 0.0, 0.0);
                }
                points.iter().fold(
                    (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
                    |(min_x, min_y, max_x, max_y), p| {
                        (min_x.min(p.x), min_y.min(p.y), max_x.max(p.x), max_y.max(p.y))
                    },
                )
            }
        }
    }

    /// Scale every linear term per axis. Circles follow the horizontal factor.
    pub fn scaled(&self, sx: f64, sy: f64) -> Geometry {
        match self {
            Geometry::Rectangle { width, height } => Geometry::Rectangle {
                width: width * sx,
                height: height * sy,
            },
            Geometry::Circle { radius } => Geometry::Circle { radius: radius * sx },
            Geometry::Line { points } => Geometry::Line {
                points: points
                    .iter()
                    .map(|p| Point::new(p.x * sx, p.y * sy))
                    .collect(),
            },
        }
    }
}

fn one() -> f64 {
    1.0
}

fn default_stroke_width() -> f64 {
    DEFAULT_STROKE_WIDTH
}

/// Geometry, placement, timing and style of a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeProperties {
    #[serde(flatten)]
    pub geometry: Geometry,
    pub x: f64,
    pub y: f64,
    pub start_time: f64,
    pub end_time: f64,
    #[serde(default = "one")]
    pub scale_x: f64,
    #[serde(default = "one")]
    pub scale_y: f64,
    /// Canvas width when the shape was drawn.
    pub screen_width: f64,
    /// Canvas height when the shape was drawn.
    pub screen_height: f64,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    #[serde(default = "one")]
    pub opacity: f64,
}

impl ShapeProperties {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// The canvas the geometry is stored against.
    pub fn screen(&self) -> CanvasSize {
        CanvasSize::new(self.screen_width, self.screen_height)
    }

    /// Whether `time` falls inside the closed window `[start_time, end_time]`.
    pub fn covers(&self, time: f64) -> bool {
        self.start_time <= time && time <= self.end_time
    }
}

/// Colour and stroke applied to new shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    pub color: String,
    pub stroke_width: f64,
    pub opacity: f64,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            color: "#FF0000".to_string(),
            stroke_width: DEFAULT_STROKE_WIDTH,
            opacity: 1.0,
        }
    }
}

/// A drawn annotation with identity, style and a time window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    pub color: String,
    #[serde(default)]
    pub label: String,
    /// Free-form metadata attached by the embedding application.
    #[serde(default)]
    pub data: BTreeMap<String, serde_json::Value>,
    pub properties: ShapeProperties,
}

impl Shape {
    pub fn shape_type(&self) -> ShapeType {
        self.properties.geometry.shape_type()
    }
}
