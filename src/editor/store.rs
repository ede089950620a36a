// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Shape store: the committed collection plus the shape being drawn.
//!
//! Pointer positions arrive in current canvas coordinates. Drafts are
//! created against the current canvas, so their stored space is the canvas
//! space at draw time; edits to committed shapes are converted back into
//! each shape's stored space before they are written.

use super::Tool;
use crate::error::{AnnotationError, Result};
use crate::models::collection::ShapeCollection;
use crate::models::shape::{
    CanvasSize, Geometry, Point, Shape, ShapeId, ShapeProperties, ShapeStyle, DEFAULT_WINDOW_SECS,
};
use crate::util::geometry;
use std::collections::BTreeMap;

/// What a committed mutation did to the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionChanged {
    Added(ShapeId),
    Moved(ShapeId),
    Resized(ShapeId),
    Removed(ShapeId),
    /// The whole collection was swapped (undo, redo or import).
    Restored,
}

/// A shape being drawn, not yet part of the collection.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftShape {
    pub shape: Shape,
}

impl DraftShape {
    /// Start a draft at `origin` for the given tool.
    pub fn begin(
        tool: Tool,
        origin: Point,
        canvas: CanvasSize,
        time: f64,
        style: &ShapeStyle,
    ) -> Result<Self> {
        let shape_type = tool.shape_type().ok_or(AnnotationError::InvalidTool)?;
        let properties = ShapeProperties {
            geometry: Geometry::initial(shape_type),
            x: origin.x,
            y: origin.y,
            start_time: time,
            end_time: time + DEFAULT_WINDOW_SECS,
            scale_x: 1.0,
            scale_y: 1.0,
            screen_width: canvas.width,
            screen_height: canvas.height,
            stroke_width: style.stroke_width,
            opacity: style.opacity,
        };
        Ok(Self {
            shape: Shape {
                id: uuid::Uuid::new_v4().to_string(),
                color: style.color.clone(),
                label: String::new(),
                data: BTreeMap::new(),
                properties,
            },
        })
    }

    pub fn origin(&self) -> Point {
        self.shape.properties.position()
    }

    /// Reshape the draft for a new pointer position.
    ///
    /// Returns `None` when the pointer is still on the origin, so that no
    /// zero-size update is produced.
    pub fn update(&self, pointer: Point) -> Option<DraftShape> {
        let origin = self.origin();
        if pointer == origin {
            return None;
        }
        let dx = pointer.x - origin.x;
        let dy = pointer.y - origin.y;
        let geometry = match &self.shape.properties.geometry {
            Geometry::Rectangle { .. } => Geometry::Rectangle {
                width: dx,
                height: dy,
            },
            Geometry::Circle { .. } => Geometry::Circle {
                radius: pointer.distance_to(&origin),
            },
            Geometry::Line { .. } => Geometry::Line {
                points: vec![Point::new(0.0, 0.0), Point::new(dx, dy)],
            },
        };
        let mut next = self.clone();
        next.shape.properties.geometry = geometry;
        Some(next)
    }
}

/// Ordered committed shapes and the optional draft.
#[derive(Debug, Clone, Default)]
pub struct ShapeStore {
    shapes: ShapeCollection,
    draft: Option<DraftShape>,
}

impl ShapeStore {
    pub fn new(shapes: ShapeCollection) -> Self {
        Self {
            shapes,
            draft: None,
        }
    }

    pub fn shapes(&self) -> &ShapeCollection {
        &self.shapes
    }

    pub fn draft(&self) -> Option<&DraftShape> {
        self.draft.as_ref()
    }

    /// Replace the committed collection wholesale.
    pub fn replace(&mut self, shapes: ShapeCollection) -> ShapeCollection {
        std::mem::replace(&mut self.shapes, shapes)
    }

    pub fn begin(
        &mut self,
        tool: Tool,
        origin: Point,
        canvas: CanvasSize,
        time: f64,
        style: &ShapeStyle,
    ) -> Result<&DraftShape> {
        let draft = DraftShape::begin(tool, origin, canvas, time, style)?;
        let draft = self.draft.insert(draft);
        Ok(&*draft)
    }

    /// Apply a pointer move to the draft. Returns whether it changed.
    pub fn update(&mut self, pointer: Point) -> bool {
        let next = self.draft.as_ref().and_then(|d| d.update(pointer));
        match next {
            Some(next) => {
                self.draft = Some(next);
                true
            }
            None => false,
        }
    }

    pub fn cancel(&mut self) -> Option<DraftShape> {
        self.draft.take()
    }

    /// Move the draft into the collection.
    pub fn commit(&mut self) -> Option<Result<CollectionChanged>> {
        let draft = self.draft.take()?;
        let id = draft.shape.id.clone();
        Some(
            self.shapes
                .push(draft.shape)
                .map(|_| CollectionChanged::Added(id)),
        )
    }

    /// Move a shape so its position lands on `position` (current canvas
    /// coordinates), keeping it inside the canvas.
    pub fn move_shape(
        &mut self,
        id: &str,
        position: Point,
        canvas: CanvasSize,
    ) -> Result<CollectionChanged> {
        let shape = self
            .shapes
            .get_mut(id)
            .ok_or_else(|| AnnotationError::UnknownShape(id.to_string()))?;
        place(&mut shape.properties, position, canvas);
        Ok(CollectionChanged::Moved(id.to_string()))
    }

    /// Scale a shape's geometry about its position.
    pub fn resize(
        &mut self,
        id: &str,
        scale_x: f64,
        scale_y: f64,
        canvas: CanvasSize,
    ) -> Result<CollectionChanged> {
        if !(scale_x.is_finite() && scale_y.is_finite() && scale_x > 0.0 && scale_y > 0.0) {
            return Err(AnnotationError::InvalidScale { scale_x, scale_y });
        }
        let shape = self
            .shapes
            .get_mut(id)
            .ok_or_else(|| AnnotationError::UnknownShape(id.to_string()))?;
        let properties = &mut shape.properties;
        properties.geometry = properties.geometry.scaled(scale_x, scale_y);
        let current = geometry::render(properties, canvas).position;
        place(properties, current, canvas);
        Ok(CollectionChanged::Resized(id.to_string()))
    }

    pub fn remove(&mut self, id: &str) -> Result<CollectionChanged> {
        self.shapes.remove(id)?;
        Ok(CollectionChanged::Removed(id.to_string()))
    }
}

/// Clamp `position` against the rendered extent and write it back in
/// stored coordinates.
fn place(properties: &mut ShapeProperties, position: Point, canvas: CanvasSize) {
    let rendered = geometry::render(properties, canvas);
    let clamped = if canvas.is_degenerate() {
        position
    } else {
        geometry::clamp_position(position, rendered.geometry.extent(), canvas)
    };
    let stored = geometry::to_stored(clamped, properties.screen(), canvas);
    properties.x = stored.x;
    properties.y = stored.y;
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: CanvasSize = CanvasSize {
        width: 500.0,
        height: 300.0,
    };

    fn draw(store: &mut ShapeStore, tool: Tool, from: Point, to: Point) -> ShapeId {
        store
            .begin(tool, from, CANVAS, 1.0, &ShapeStyle::default())
            .unwrap();
        store.update(to);
        match store.commit().unwrap().unwrap() {
            CollectionChanged::Added(id) => id,
            other => panic!("unexpected change {:?}", other),
        }
    }

    #[test]
    fn test_begin_requires_drawing_tool() {
        let mut store = ShapeStore::default();
        let result = store.begin(
            Tool::Select,
            Point::new(1.0, 1.0),
            CANVAS,
            0.0,
            &ShapeStyle::default(),
        );
        assert_eq!(result.unwrap_err(), AnnotationError::InvalidTool);
        assert!(store.draft().is_none());
    }

    #[test]
    fn test_begin_sets_window_and_screen() {
        let draft = DraftShape::begin(
            Tool::Circle,
            Point::new(3.0, 4.0),
            CANVAS,
            7.0,
            &ShapeStyle::default(),
        )
        .unwrap();
        let props = &draft.shape.properties;
        assert_eq!(props.start_time, 7.0);
        assert_eq!(props.end_time, 7.5);
        assert_eq!(props.screen(), CANVAS);
        assert_eq!(props.geometry, Geometry::Circle { radius: 4.0 });
        assert_eq!(draft.shape.color, "#FF0000");
    }

    #[test]
    fn test_rectangle_draw_scenario() {
        let mut store = ShapeStore::default();
        let id = draw(
            &mut store,
            Tool::Rectangle,
            Point::new(10.0, 10.0),
            Point::new(50.0, 40.0),
        );
        let shape = store.shapes().get(&id).unwrap();
        assert_eq!(
            shape.properties.geometry,
            Geometry::Rectangle {
                width: 40.0,
                height: 30.0
            }
        );
        let rendered = geometry::render(&shape.properties, CanvasSize::new(1000.0, 600.0));
        assert_eq!(
            rendered.geometry,
            Geometry::Rectangle {
                width: 80.0,
                height: 60.0
            }
        );
    }

    #[test]
    fn test_circle_radius_is_distance() {
        let draft = DraftShape::begin(
            Tool::Circle,
            Point::new(0.0, 0.0),
            CANVAS,
            0.0,
            &ShapeStyle::default(),
        )
        .unwrap();
        let next = draft.update(Point::new(3.0, 4.0)).unwrap();
        assert_eq!(next.shape.properties.geometry, Geometry::Circle { radius: 5.0 });
    }

    #[test]
    fn test_line_points_are_relative() {
        let draft = DraftShape::begin(
            Tool::Line,
            Point::new(10.0, 20.0),
            CANVAS,
            0.0,
            &ShapeStyle::default(),
        )
        .unwrap();
        let next = draft.update(Point::new(15.0, 10.0)).unwrap();
        assert_eq!(
            next.shape.properties.geometry,
            Geometry::Line {
                points: vec![Point::new(0.0, 0.0), Point::new(5.0, -10.0)]
            }
        );
    }

    #[test]
    fn test_pointer_on_origin_emits_no_update() {
        let mut store = ShapeStore::default();
        store
            .begin(
                Tool::Rectangle,
                Point::new(10.0, 10.0),
                CANVAS,
                0.0,
                &ShapeStyle::default(),
            )
            .unwrap();
        assert!(!store.update(Point::new(10.0, 10.0)));
        assert_eq!(
            store.draft().unwrap().shape.properties.geometry,
            Geometry::initial(crate::models::shape::ShapeType::Rectangle)
        );
    }

    #[test]
    fn test_commit_without_draft() {
        let mut store = ShapeStore::default();
        assert!(store.commit().is_none());
    }

    #[test]
    fn test_move_is_clamped_to_canvas() {
        let mut store = ShapeStore::default();
        let id = draw(
            &mut store,
            Tool::Rectangle,
            Point::new(10.0, 10.0),
            Point::new(50.0, 40.0),
        );
        store
            .move_shape(&id, Point::new(480.0, -20.0), CANVAS)
            .unwrap();
        let props = &store.shapes().get(&id).unwrap().properties;
        assert_eq!(props.position(), Point::new(460.0, 0.0));
    }

    #[test]
    fn test_move_on_resized_canvas_stores_in_original_space() {
        let mut store = ShapeStore::default();
        let id = draw(
            &mut store,
            Tool::Rectangle,
            Point::new(10.0, 10.0),
            Point::new(50.0, 40.0),
        );
        let bigger = CanvasSize::new(1000.0, 600.0);
        store.move_shape(&id, Point::new(200.0, 100.0), bigger).unwrap();
        let props = &store.shapes().get(&id).unwrap().properties;
        assert_eq!(props.position(), Point::new(100.0, 50.0));
        assert_eq!(props.screen(), CANVAS);
    }

    #[test]
    fn test_resize_scales_geometry() {
        let mut store = ShapeStore::default();
        let id = draw(
            &mut store,
            Tool::Line,
            Point::new(10.0, 10.0),
            Point::new(20.0, 30.0),
        );
        store.resize(&id, 2.0, 0.5, CANVAS).unwrap();
        let props = &store.shapes().get(&id).unwrap().properties;
        assert_eq!(
            props.geometry,
            Geometry::Line {
                points: vec![Point::new(0.0, 0.0), Point::new(20.0, 10.0)]
            }
        );
        assert_eq!(props.position(), Point::new(10.0, 10.0));
    }

    #[test]
    fn test_resize_rejects_bad_scale() {
        let mut store = ShapeStore::default();
        let id = draw(
            &mut store,
            Tool::Circle,
            Point::new(100.0, 100.0),
            Point::new(110.0, 100.0),
        );
        assert!(matches!(
            store.resize(&id, 0.0, 1.0, CANVAS),
            Err(AnnotationError::InvalidScale { .. })
        ));
        assert!(matches!(
            store.resize(&id, f64::NAN, 1.0, CANVAS),
            Err(AnnotationError::InvalidScale { .. })
        ));
    }

    #[test]
    fn test_resize_past_edge_pulls_shape_back() {
        let mut store = ShapeStore::default();
        let id = draw(
            &mut store,
            Tool::Circle,
            Point::new(485.0, 150.0),
            Point::new(495.0, 150.0),
        );
        store.resize(&id, 2.0, 2.0, CANVAS).unwrap();
        let props = &store.shapes().get(&id).unwrap().properties;
        assert_eq!(props.geometry, Geometry::Circle { radius: 20.0 });
        assert_eq!(props.position(), Point::new(480.0, 150.0));
    }

    #[test]
    fn test_remove_unknown() {
        let mut store = ShapeStore::default();
        assert!(store.remove("nope").is_err());
    }
}
