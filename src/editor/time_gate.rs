// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Visibility of shapes against the video timeline.

use crate::models::shape::Shape;

/// Playback and editing conditions that decide what may be shown and
/// selected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateContext {
    /// Current playback position in seconds.
    pub time: f64,
    /// Whether shapes are filtered by their time window.
    pub filtering: bool,
    /// Whether the video is currently playing.
    pub playing: bool,
    /// Whether editing is locked.
    pub lock_edit: bool,
}

/// A shape is visible when filtering is off or `time` lies in its window.
pub fn is_visible(shape: &Shape, time: f64, filtering: bool) -> bool {
    !filtering || shape.properties.covers(time)
}

/// Shapes visible at `time`, in rendering order.
pub fn visible_shapes<'a, I>(shapes: I, time: f64, filtering: bool) -> impl Iterator<Item = &'a Shape>
where
    I: IntoIterator<Item = &'a Shape>,
{
    shapes
        .into_iter()
        .filter(move |shape| is_visible(shape, time, filtering))
}

/// Whether `selected` may stay selected under `ctx`.
///
/// Selection is dropped while playing, while edit-locked, and when the
/// selected shape is missing or outside its window.
pub fn selection_allowed(selected: Option<&Shape>, ctx: &GateContext) -> bool {
    if ctx.playing || ctx.lock_edit {
        return false;
    }
    selected.is_some_and(|shape| is_visible(shape, ctx.time, ctx.filtering))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::shape::{Geometry, ShapeProperties};
    use std::collections::BTreeMap;

    fn windowed(start: f64, end: f64) -> Shape {
        Shape {
            id: "w".to_string(),
            color: "#FFFFFF".to_string(),
            label: String::new(),
            data: BTreeMap::new(),
            properties: ShapeProperties {
                geometry: Geometry::Circle { radius: 1.0 },
                x: 0.0,
                y: 0.0,
                start_time: start,
                end_time: end,
                scale_x: 1.0,
                scale_y: 1.0,
                screen_width: 100.0,
                screen_height: 100.0,
                stroke_width: 2.0,
                opacity: 1.0,
            },
        }
    }

    fn paused_at(time: f64) -> GateContext {
        GateContext {
            time,
            filtering: true,
            playing: false,
            lock_edit: false,
        }
    }

    #[test]
    fn test_window_visibility() {
        let shape = windowed(2.0, 5.0);
        assert!(is_visible(&shape, 3.0, true));
        assert!(!is_visible(&shape, 6.0, true));
        assert!(!is_visible(&shape, 1.99, true));
    }

    #[test]
    fn test_filtering_disabled_shows_everything() {
        let shape = windowed(2.0, 5.0);
        for t in [-1.0, 0.0, 3.0, 6.0, 1e9] {
            assert!(is_visible(&shape, t, false));
        }
    }

    #[test]
    fn test_visible_shapes_keeps_order() {
        let mut late = windowed(10.0, 12.0);
        late.id = "late".to_string();
        let mut early = windowed(0.0, 1.0);
        early.id = "early".to_string();
        let mut always = windowed(0.0, 20.0);
        always.id = "always".to_string();
        let shapes = vec![late, early, always];

        let ids: Vec<&str> = visible_shapes(&shapes, 11.0, true)
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, vec!["late", "always"]);
    }

    #[test]
    fn test_selection_rules() {
        let shape = windowed(2.0, 5.0);
        assert!(selection_allowed(Some(&shape), &paused_at(3.0)));
        assert!(!selection_allowed(Some(&shape), &paused_at(6.0)));
        assert!(!selection_allowed(None, &paused_at(3.0)));

        let playing = GateContext {
            playing: true,
            ..paused_at(3.0)
        };
        assert!(!selection_allowed(Some(&shape), &playing));

        let locked = GateContext {
            lock_edit: true,
            ..paused_at(3.0)
        };
        assert!(!selection_allowed(Some(&shape), &locked));
    }
}
