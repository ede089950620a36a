// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Snapshot history for undo/redo.
//!
//! Every mutation records the full collection as it was before the change.
//! Undo and redo swap the current collection with the top of the opposite
//! stack.

use super::collection::ShapeCollection;
use std::collections::VecDeque;

/// History system for undo/redo functionality.
#[derive(Debug, Clone, Default)]
pub struct History {
    /// Undo stack (past states)
    undo_stack: VecDeque<ShapeCollection>,
    /// Redo stack (future states after undo)
    redo_stack: Vec<ShapeCollection>,
    /// Optional cap on the undo stack; `None` keeps every state
    max_size: Option<usize>,
}

impl History {
    /// Unbounded history.
    pub fn new() -> Self {
        Self::default()
    }

    /// History that evicts the oldest state once `limit` states are held.
    /// A limit of zero is treated as no limit.
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            max_size: limit.filter(|&n| n > 0),
            ..Self::default()
        }
    }

    /// Save current state before making a change
    pub fn record(&mut self, snapshot: ShapeCollection) {
        self.undo_stack.push_back(snapshot);
        if let Some(max) = self.max_size {
            while self.undo_stack.len() > max {
                self.undo_stack.pop_front();
            }
        }
        // A new action invalidates the redo path
        self.redo_stack.clear();
    }

    /// Undo: restore previous state
    pub fn undo(&mut self, current: ShapeCollection) -> Option<ShapeCollection> {
        let previous = self.undo_stack.pop_back()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Redo: restore next state
    pub fn redo(&mut self, current: ShapeCollection) -> Option<ShapeCollection> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push_back(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Most recently recorded state, if any.
    pub fn last_snapshot(&self) -> Option<&ShapeCollection> {
        self.undo_stack.back()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::shape::{Geometry, Shape, ShapeProperties};
    use std::collections::BTreeMap;

    fn collection_of(ids: &[&str]) -> ShapeCollection {
        let shapes = ids
            .iter()
            .map(|id| Shape {
                id: id.to_string(),
                color: "#FF0000".to_string(),
                label: String::new(),
                data: BTreeMap::new(),
                properties: ShapeProperties {
                    geometry: Geometry::Rectangle {
                        width: 1.0,
                        height: 1.0,
                    },
                    x: 0.0,
                    y: 0.0,
                    start_time: 0.0,
                    end_time: 0.5,
                    scale_x: 1.0,
                    scale_y: 1.0,
                    screen_width: 10.0,
                    screen_height: 10.0,
                    stroke_width: 2.0,
                    opacity: 1.0,
                },
            })
            .collect();
        ShapeCollection::from_shapes(shapes).unwrap()
    }

    #[test]
    fn test_undo_on_empty_is_noop() {
        let mut history = History::new();
        assert!(history.undo(collection_of(&["a"])).is_none());
        assert_eq!(history.redo_len(), 0);
    }

    #[test]
    fn test_undo_then_redo() {
        let mut history = History::new();
        history.record(collection_of(&[]));
        let restored = history.undo(collection_of(&["a"])).unwrap();
        assert!(restored.is_empty());
        assert!(history.can_redo());

        let again = history.redo(restored).unwrap();
        assert_eq!(again, collection_of(&["a"]));
        assert_eq!(history.undo_len(), 1);
        assert_eq!(history.redo_len(), 0);
    }

    #[test]
    fn test_record_clears_redo() {
        let mut history = History::new();
        history.record(collection_of(&[]));
        history.undo(collection_of(&["a"]));
        assert!(history.can_redo());

        history.record(collection_of(&[]));
        assert!(!history.can_redo());
        assert!(history.redo(collection_of(&["b"])).is_none());
    }

    #[test]
    fn test_unbounded_by_default() {
        let mut history = History::new();
        for _ in 0..500 {
            history.record(collection_of(&[]));
        }
        assert_eq!(history.undo_len(), 500);
    }

    #[test]
    fn test_limit_evicts_oldest() {
        let mut history = History::with_limit(Some(2));
        history.record(collection_of(&["a"]));
        history.record(collection_of(&["b"]));
        history.record(collection_of(&["c"]));
        assert_eq!(history.undo_len(), 2);
        let top = history.undo(collection_of(&[])).unwrap();
        assert_eq!(top, collection_of(&["c"]));
        let next = history.undo(top).unwrap();
        assert_eq!(next, collection_of(&["b"]));
        assert!(!history.can_undo());
    }

    #[test]
    fn test_zero_limit_is_unbounded() {
        let mut history = History::with_limit(Some(0));
        for _ in 0..5 {
            history.record(collection_of(&[]));
        }
        assert_eq!(history.undo_len(), 5);
    }
}
