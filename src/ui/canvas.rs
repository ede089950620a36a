// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for the video surface and its annotations.
//!
//! This module paints the poster frame and the shapes visible at the
//! current playback time, and turns pointer input into editor actions.
//! Moves and resizes are previewed while dragging and reported once, on
//! release.

use super::shape_color;
use crate::editor::state::EditorState;
use crate::editor::time_gate;
use crate::editor::Tool;
use crate::models::shape::{CanvasSize, Geometry, Point, ShapeId};
use crate::util::geometry::{self, RenderedShape};
use crate::util::throttle::{Throttle, POINTER_INTERVAL};
use std::time::Instant;

/// Aspect ratio used until a poster frame gives a better one.
const DEFAULT_ASPECT: f32 = 16.0 / 9.0;

/// Side of the square resize handle, in points.
const HANDLE_SIZE: f32 = 8.0;

/// Smallest scale a resize drag can produce.
const MIN_SCALE: f64 = 0.05;

/// Stroke colour of the shape being drawn.
const DRAFT_COLOR: egui::Color32 = egui::Color32::from_rgb(238, 130, 238);

/// Result of canvas interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasAction {
    None,
    BeginDraft(Point),
    UpdateDraft(Point),
    /// Apply the final pointer position, then commit.
    CommitDraft(Point),
    Select(ShapeId),
    Deselect,
    Move { id: ShapeId, position: Point },
    Resize { id: ShapeId, scale_x: f64, scale_y: f64 },
}

/// What the canvas needs to draw a frame.
pub struct CanvasView<'a> {
    pub editor: &'a EditorState,
    pub tool: Tool,
    pub time: f64,
    pub filtering: bool,
    pub playing: bool,
    /// Drawing and editing are allowed.
    pub editable: bool,
    pub hide_annotations: bool,
    pub has_source: bool,
    pub poster: Option<&'a egui::TextureHandle>,
    pub poster_size: Option<(u32, u32)>,
}

/// Output of one canvas frame.
pub struct CanvasResponse {
    pub action: CanvasAction,
    /// Current canvas size, for converting actions into stored space.
    pub size: CanvasSize,
}

#[derive(Debug, Clone)]
enum Drag {
    Draw,
    Move {
        id: ShapeId,
        offset: Point,
        position: Point,
    },
    Resize {
        id: ShapeId,
        start: RenderedShape,
        scale: (f64, f64),
    },
}

/// Pointer state carried between frames.
pub struct Interaction {
    drag: Option<Drag>,
    throttle: Throttle,
}

impl Default for Interaction {
    fn default() -> Self {
        Self {
            drag: None,
            throttle: Throttle::new(POINTER_INTERVAL),
        }
    }
}

impl Interaction {
    /// Drop any drag in progress.
    pub fn cancel(&mut self) {
        self.drag = None;
    }

    /// A draw drag is in progress.
    pub fn is_drawing(&self) -> bool {
        matches!(self.drag, Some(Drag::Draw))
    }
}

/// Display the canvas and handle mouse interactions.
pub fn show(ui: &mut egui::Ui, view: &CanvasView, interaction: &mut Interaction) -> CanvasResponse {
    let available = ui.available_rect_before_wrap();
    let aspect = view
        .poster_size
        .filter(|(w, h)| *w > 0 && *h > 0)
        .map(|(w, h)| w as f32 / h as f32)
        .unwrap_or(DEFAULT_ASPECT);
    let rect = fit_rect(available, aspect);
    let size = CanvasSize::new(rect.width() as f64, rect.height() as f64);

    let response = ui.allocate_rect(available, egui::Sense::click_and_drag());
    let painter = ui.painter_at(available);
    painter.rect_filled(available, 0.0, egui::Color32::from_gray(40));
    painter.rect_filled(rect, 0.0, egui::Color32::BLACK);

    if !view.has_source {
        interaction.cancel();
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            "No video source",
            egui::FontId::proportional(18.0),
            egui::Color32::from_gray(180),
        );
        return CanvasResponse {
            action: CanvasAction::None,
            size,
        };
    }

    if let Some(texture) = view.poster {
        painter.image(
            texture.id(),
            rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );
    }

    let action = if view.editable && !view.hide_annotations {
        handle_pointer(&response, rect, size, view, interaction)
    } else {
        interaction.cancel();
        CanvasAction::None
    };

    if !view.hide_annotations {
        draw_shapes(&painter, rect, size, view, interaction);
    }

    CanvasResponse { action, size }
}

fn handle_pointer(
    response: &egui::Response,
    rect: egui::Rect,
    size: CanvasSize,
    view: &CanvasView,
    interaction: &mut Interaction,
) -> CanvasAction {
    let now = Instant::now();
    let Some(pos) = response.interact_pointer_pos() else {
        return CanvasAction::None;
    };
    let pointer = to_canvas(pos, rect);

    if view.tool.is_drawing() {
        if response.drag_started() {
            if !rect.contains(pos) {
                return CanvasAction::None;
            }
            let origin = press_origin(response, rect).unwrap_or(pointer);
            interaction.drag = Some(Drag::Draw);
            interaction.throttle.reset();
            interaction.throttle.ready(now);
            return CanvasAction::BeginDraft(origin);
        }
        if !matches!(interaction.drag, Some(Drag::Draw)) {
            return CanvasAction::None;
        }
        if response.drag_stopped() {
            interaction.drag = None;
            return CanvasAction::CommitDraft(clamp_to_canvas(pointer, size));
        }
        if response.dragged() && interaction.throttle.ready(now) {
            return CanvasAction::UpdateDraft(clamp_to_canvas(pointer, size));
        }
        return CanvasAction::None;
    }

    // Selection is only possible while paused.
    if view.playing {
        interaction.cancel();
        return CanvasAction::None;
    }

    let visible: Vec<(&ShapeId, RenderedShape, f64)> =
        time_gate::visible_shapes(view.editor.shapes(), view.time, view.filtering)
            .map(|shape| {
                (
                    &shape.id,
                    geometry::render(&shape.properties, size),
                    shape.properties.stroke_width,
                )
            })
            .collect();

    if response.drag_started() {
        let press = press_origin(response, rect).unwrap_or(pointer);
        let selected = view.editor.selected_id().and_then(|id| {
            visible
                .iter()
                .find(|(shape_id, _, _)| shape_id.as_str() == id)
        });
        if let Some((id, rendered, _)) = selected {
            let handle = handle_position(rendered);
            if (handle.x - press.x).abs() <= HANDLE_SIZE as f64
                && (handle.y - press.y).abs() <= HANDLE_SIZE as f64
            {
                interaction.drag = Some(Drag::Resize {
                    id: (*id).clone(),
                    start: rendered.clone(),
                    scale: (1.0, 1.0),
                });
                interaction.throttle.reset();
                return CanvasAction::None;
            }
        }
        if let Some((id, rendered, _)) = topmost_hit(&visible, press) {
            let offset = Point::new(
                press.x - rendered.position.x,
                press.y - rendered.position.y,
            );
            interaction.drag = Some(Drag::Move {
                id: (*id).clone(),
                offset,
                position: rendered.position,
            });
            interaction.throttle.reset();
            return CanvasAction::Select((*id).clone());
        }
        return CanvasAction::None;
    }

    if response.dragged() && interaction.throttle.ready(now) {
        match interaction.drag.as_mut() {
            Some(Drag::Move {
                id,
                offset,
                position,
            }) => {
                if let Some((_, rendered, _)) = visible.iter().find(|(v, _, _)| v.as_str() == id.as_str()) {
                    let wanted = Point::new(pointer.x - offset.x, pointer.y - offset.y);
                    *position =
                        geometry::clamp_position(wanted, rendered.geometry.extent(), size);
                }
            }
            Some(Drag::Resize { start, scale, .. }) => {
                *scale = resize_scale(start, pointer);
            }
            Some(Drag::Draw) | None => {}
        }
        return CanvasAction::None;
    }

    if response.drag_stopped() {
        return match interaction.drag.take() {
            Some(Drag::Move { id, offset, .. }) => CanvasAction::Move {
                id,
                position: Point::new(pointer.x - offset.x, pointer.y - offset.y),
            },
            Some(Drag::Resize { id, start, .. }) => {
                let (scale_x, scale_y) = resize_scale(&start, pointer);
                CanvasAction::Resize {
                    id,
                    scale_x,
                    scale_y,
                }
            }
            Some(Drag::Draw) | None => CanvasAction::None,
        };
    }

    if response.clicked() {
        return match topmost_hit(&visible, pointer) {
            Some((id, _, _)) => CanvasAction::Select((*id).clone()),
            None => CanvasAction::Deselect,
        };
    }

    CanvasAction::None
}

/// The last hit in rendering order wins, matching what is drawn on top.
fn topmost_hit<'v, 'a>(
    visible: &'v [(&'a ShapeId, RenderedShape, f64)],
    pointer: Point,
) -> Option<&'v (&'a ShapeId, RenderedShape, f64)> {
    visible
        .iter()
        .rev()
        .find(|(_, rendered, stroke)| rendered.hit_test(pointer, stroke + 4.0))
}

fn draw_shapes(
    painter: &egui::Painter,
    rect: egui::Rect,
    size: CanvasSize,
    view: &CanvasView,
    interaction: &Interaction,
) {
    let selected = view.editor.selected_id();
    for shape in time_gate::visible_shapes(view.editor.shapes(), view.time, view.filtering) {
        let mut rendered = geometry::render(&shape.properties, size);
        match &interaction.drag {
            Some(Drag::Move { id, position, .. }) if *id == shape.id => {
                rendered.position = *position;
            }
            Some(Drag::Resize { id, start, scale }) if *id == shape.id => {
                rendered.geometry = start.geometry.scaled(scale.0, scale.1);
            }
            _ => {}
        }
        let color = shape_color(&shape.color, shape.properties.opacity);
        let stroke = egui::Stroke::new(shape.properties.stroke_width as f32, color);
        draw_rendered(painter, rect, &rendered, stroke);

        if selected == Some(shape.id.as_str()) {
            draw_selection(painter, rect, &rendered);
        }
    }

    if let Some(draft) = view.editor.draft() {
        let rendered = geometry::render(&draft.shape.properties, size);
        let stroke = egui::Stroke::new(draft.shape.properties.stroke_width as f32, DRAFT_COLOR);
        draw_rendered(painter, rect, &rendered, stroke);
    }
}

fn draw_rendered(
    painter: &egui::Painter,
    rect: egui::Rect,
    rendered: &RenderedShape,
    stroke: egui::Stroke,
) {
    let origin = to_screen(rendered.position, rect);
    match &rendered.geometry {
        Geometry::Rectangle { width, height } => {
            let corner = origin + egui::vec2(*width as f32, *height as f32);
            painter.rect_stroke(egui::Rect::from_two_pos(origin, corner), 0.0, stroke);
        }
        Geometry::Circle { radius } => {
            painter.circle_stroke(origin, radius.abs() as f32, stroke);
        }
        Geometry::Line { points } => {
            let points: Vec<egui::Pos2> = points
                .iter()
                .map(|p| origin + egui::vec2(p.x as f32, p.y as f32))
                .collect();
            painter.add(egui::Shape::line(points, stroke));
        }
    }
}

fn draw_selection(painter: &egui::Painter, rect: egui::Rect, rendered: &RenderedShape) {
    let (min, max) = rendered.bounds();
    let bounds = egui::Rect::from_two_pos(to_screen(min, rect), to_screen(max, rect));
    painter.rect_stroke(
        bounds.expand(3.0),
        0.0,
        egui::Stroke::new(1.0, egui::Color32::from_gray(220)),
    );
    let handle = to_screen(handle_position(rendered), rect);
    let handle_rect = egui::Rect::from_center_size(handle, egui::vec2(HANDLE_SIZE, HANDLE_SIZE));
    painter.rect_filled(handle_rect, 0.0, egui::Color32::WHITE);
    painter.rect_stroke(handle_rect, 0.0, egui::Stroke::new(1.0, egui::Color32::BLACK));
}

/// Largest rect of the given aspect ratio centred in `available`.
pub fn fit_rect(available: egui::Rect, aspect: f32) -> egui::Rect {
    let available_aspect = available.width() / available.height().max(1.0);
    let (width, height) = if aspect > available_aspect {
        (available.width(), available.width() / aspect)
    } else {
        (available.height() * aspect, available.height())
    };
    egui::Rect::from_center_size(available.center(), egui::vec2(width, height))
}

/// Corner of the bounding box furthest from the shape position; the
/// resize handle sits here.
fn far_corner(rendered: &RenderedShape) -> (f64, f64) {
    let (min_x, min_y, max_x, max_y) = rendered.geometry.extent();
    let x = if max_x.abs() >= min_x.abs() { max_x } else { min_x };
    let y = if max_y.abs() >= min_y.abs() { max_y } else { min_y };
    (x, y)
}

fn handle_position(rendered: &RenderedShape) -> Point {
    let (x, y) = far_corner(rendered);
    Point::new(rendered.position.x + x, rendered.position.y + y)
}

/// Scale factors that move the resize handle of `start` to `pointer`.
pub fn resize_scale(start: &RenderedShape, pointer: Point) -> (f64, f64) {
    let (span_x, span_y) = far_corner(start);
    let axis = |span: f64, delta: f64| {
        if span.abs() < f64::EPSILON {
            1.0
        } else {
            (delta / span).max(MIN_SCALE)
        }
    };
    let scale_x = axis(span_x, pointer.x - start.position.x);
    let scale_y = axis(span_y, pointer.y - start.position.y);
    match start.geometry {
        Geometry::Circle { .. } => (scale_x, scale_x),
        _ => (scale_x, scale_y),
    }
}

fn clamp_to_canvas(point: Point, size: CanvasSize) -> Point {
    Point::new(
        point.x.clamp(0.0, size.width.max(0.0)),
        point.y.clamp(0.0, size.height.max(0.0)),
    )
}

/// Where the current drag began; egui only reports a drag once the pointer
/// has travelled a few points.
fn press_origin(response: &egui::Response, rect: egui::Rect) -> Option<Point> {
    response
        .ctx
        .input(|i| i.pointer.press_origin())
        .map(|p| to_canvas(p, rect))
}

fn to_canvas(pos: egui::Pos2, rect: egui::Rect) -> Point {
    Point::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64)
}

fn to_screen(point: Point, rect: egui::Rect) -> egui::Pos2 {
    rect.min + egui::vec2(point.x as f32, point.y as f32)
}
