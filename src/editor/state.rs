// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Editor state container.
//!
//! `EditorState` owns the shape store, the undo/redo history and the
//! selection. The canvas, the properties panel and the transport controls
//! all borrow it from the application; nothing else holds shape state.

use super::store::{CollectionChanged, DraftShape, ShapeStore};
use super::time_gate::{self, GateContext};
use super::Tool;
use crate::error::{AnnotationError, Result};
use crate::models::collection::ShapeCollection;
use crate::models::history::History;
use crate::models::shape::{CanvasSize, Point, Shape, ShapeId, ShapeStyle};

/// Commands an embedding application can issue against the editor.
pub trait AnnotationCommands {
    /// Restore the previous collection. Returns false if there was none.
    fn undo(&mut self) -> bool;
    /// Re-apply an undone collection. Returns false if there was none.
    fn redo(&mut self) -> bool;
    /// Delete the selected shape, returning its id.
    fn delete_selected(&mut self) -> Option<ShapeId>;
}

/// Callback fired with the selected shape record whenever it changes.
pub type SelectionListener = Box<dyn FnMut(Option<&Shape>)>;

/// Shapes, history and selection.
pub struct EditorState {
    store: ShapeStore,
    history: History,
    selected: Option<ShapeId>,
    listener: Option<SelectionListener>,
    /// Last record handed to the listener; outer `None` means never notified
    last_notified: Option<Option<Shape>>,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(ShapeCollection::new(), None)
    }
}

impl EditorState {
    pub fn new(shapes: ShapeCollection, history_limit: Option<usize>) -> Self {
        Self {
            store: ShapeStore::new(shapes),
            history: History::with_limit(history_limit),
            selected: None,
            listener: None,
            last_notified: None,
        }
    }

    /// Register the selection callback. It is invoked immediately with the
    /// current selection.
    pub fn on_selection_change(&mut self, listener: SelectionListener) {
        self.listener = Some(listener);
        self.last_notified = None;
        self.notify_selection();
    }

    pub fn shapes(&self) -> &ShapeCollection {
        self.store.shapes()
    }

    pub fn draft(&self) -> Option<&DraftShape> {
        self.store.draft()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_shape(&self) -> Option<&Shape> {
        self.selected.as_deref().and_then(|id| self.shapes().get(id))
    }

    pub fn is_drawing(&self) -> bool {
        self.store.draft().is_some()
    }

    /// Replace all shapes (e.g. after an import). History is discarded.
    pub fn load_shapes(&mut self, shapes: ShapeCollection) -> CollectionChanged {
        self.store.replace(shapes);
        self.store.cancel();
        self.history.clear();
        self.selected = None;
        log::info!("Loaded {} shapes", self.shapes().len());
        self.notify_selection();
        CollectionChanged::Restored
    }

    pub fn select(&mut self, id: &str) -> Result<()> {
        if !self.shapes().contains(id) {
            return Err(AnnotationError::UnknownShape(id.to_string()));
        }
        self.selected = Some(id.to_string());
        self.notify_selection();
        Ok(())
    }

    pub fn deselect(&mut self) {
        self.selected = None;
        self.notify_selection();
    }

    /// Start drawing at `origin`.
    pub fn begin_draft(
        &mut self,
        tool: Tool,
        origin: Point,
        canvas: CanvasSize,
        time: f64,
        style: &ShapeStyle,
    ) -> Result<()> {
        self.store.begin(tool, origin, canvas, time, style)?;
        Ok(())
    }

    /// Feed a pointer position to the draft. Returns whether it changed.
    pub fn update_draft(&mut self, pointer: Point) -> bool {
        self.store.update(pointer)
    }

    pub fn cancel_draft(&mut self) {
        self.store.cancel();
    }

    /// Commit the draft and select it.
    pub fn commit_draft(&mut self) -> Option<Result<CollectionChanged>> {
        self.store.draft()?;
        let snapshot = self.shapes().clone();
        let change = self.store.commit()?;
        if let Ok(CollectionChanged::Added(id)) = &change {
            self.history.record(snapshot);
            self.selected = Some(id.clone());
            log::info!("Added shape {}, total: {}", id, self.shapes().len());
            self.notify_selection();
        }
        Some(change)
    }

    pub fn move_shape(
        &mut self,
        id: &str,
        position: Point,
        canvas: CanvasSize,
    ) -> Result<CollectionChanged> {
        self.mutate(id, |store| store.move_shape(id, position, canvas))
    }

    pub fn resize_shape(
        &mut self,
        id: &str,
        scale_x: f64,
        scale_y: f64,
        canvas: CanvasSize,
    ) -> Result<CollectionChanged> {
        self.mutate(id, |store| store.resize(id, scale_x, scale_y, canvas))
    }

    pub fn remove_shape(&mut self, id: &str) -> Result<CollectionChanged> {
        let change = self.mutate(id, |store| store.remove(id))?;
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        log::info!("Deleted shape {}, total: {}", id, self.shapes().len());
        self.notify_selection();
        Ok(change)
    }

    /// Clear the selection when the gate forbids it.
    pub fn enforce_gate(&mut self, ctx: &GateContext) {
        if self.selected.is_some() && !time_gate::selection_allowed(self.selected_shape(), ctx) {
            self.selected = None;
            self.notify_selection();
        }
    }

    /// Apply a mutation to an existing shape, recording the prior collection
    /// only if the mutation succeeds.
    fn mutate<F>(&mut self, id: &str, apply: F) -> Result<CollectionChanged>
    where
        F: FnOnce(&mut ShapeStore) -> Result<CollectionChanged>,
    {
        if !self.shapes().contains(id) {
            return Err(AnnotationError::UnknownShape(id.to_string()));
        }
        let snapshot = self.shapes().clone();
        let change = apply(&mut self.store)?;
        self.history.record(snapshot);
        self.notify_selection();
        Ok(change)
    }

    /// Fire the listener if the selected record differs from the last one
    /// it saw.
    fn notify_selection(&mut self) {
        let current = self.selected_shape().cloned();
        if self.last_notified.as_ref() == Some(&current) {
            return;
        }
        if let Some(listener) = self.listener.as_mut() {
            listener(current.as_ref());
            self.last_notified = Some(current);
        }
    }

    fn restore(&mut self, shapes: ShapeCollection) {
        self.store.replace(shapes);
        if let Some(id) = self.selected.as_deref() {
            if !self.shapes().contains(id) {
                self.selected = None;
            }
        }
        self.notify_selection();
    }
}

impl AnnotationCommands for EditorState {
    fn undo(&mut self) -> bool {
        let current = self.shapes().clone();
        match self.history.undo(current) {
            Some(previous) => {
                self.restore(previous);
                log::info!("Undo, total: {}", self.shapes().len());
                true
            }
            None => false,
        }
    }

    fn redo(&mut self) -> bool {
        let current = self.shapes().clone();
        match self.history.redo(current) {
            Some(next) => {
                self.restore(next);
                log::info!("Redo, total: {}", self.shapes().len());
                true
            }
            None => false,
        }
    }

    fn delete_selected(&mut self) -> Option<ShapeId> {
        let id = self.selected.clone()?;
        match self.remove_shape(&id) {
            Ok(_) => Some(id),
            Err(e) => {
                log::warn!("Cannot delete selection: {}", e);
                self.deselect();
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    const CANVAS: CanvasSize = CanvasSize {
        width: 500.0,
        height: 300.0,
    };

    fn draw(state: &mut EditorState, tool: Tool, from: (f64, f64), to: (f64, f64)) -> ShapeId {
        state
            .begin_draft(
                tool,
                Point::new(from.0, from.1),
                CANVAS,
                0.0,
                &ShapeStyle::default(),
            )
            .unwrap();
        state.update_draft(Point::new(to.0, to.1));
        match state.commit_draft().unwrap().unwrap() {
            CollectionChanged::Added(id) => id,
            other => panic!("unexpected change {:?}", other),
        }
    }

    #[test]
    fn test_commit_selects_and_records() {
        let mut state = EditorState::default();
        let id = draw(&mut state, Tool::Rectangle, (10.0, 10.0), (50.0, 40.0));
        assert_eq!(state.selected_id(), Some(id.as_str()));
        assert_eq!(state.history().undo_len(), 1);
        assert!(state.history().last_snapshot().unwrap().is_empty());
    }

    #[test]
    fn test_undo_redo_are_inverse_along_path() {
        let mut state = EditorState::default();
        let a = draw(&mut state, Tool::Rectangle, (10.0, 10.0), (50.0, 40.0));
        let b = draw(&mut state, Tool::Circle, (100.0, 100.0), (110.0, 100.0));
        let c = draw(&mut state, Tool::Line, (200.0, 50.0), (250.0, 80.0));
        state.move_shape(&a, Point::new(30.0, 30.0), CANVAS).unwrap();
        state.resize_shape(&b, 1.5, 1.5, CANVAS).unwrap();
        state.remove_shape(&c).unwrap();
        let final_state = state.shapes().clone();
        let n = 6;
        assert_eq!(state.history().undo_len(), n);

        for _ in 0..n {
            assert!(state.undo());
        }
        assert!(state.shapes().is_empty());
        assert!(!state.undo());

        for _ in 0..n {
            assert!(state.redo());
        }
        assert_eq!(state.shapes(), &final_state);
        assert!(!state.redo());
    }

    #[test]
    fn test_mutation_clears_redo() {
        let mut state = EditorState::default();
        let a = draw(&mut state, Tool::Rectangle, (10.0, 10.0), (50.0, 40.0));
        draw(&mut state, Tool::Circle, (100.0, 100.0), (120.0, 100.0));
        assert!(state.undo());
        assert!(state.history().can_redo());

        state.move_shape(&a, Point::new(0.0, 0.0), CANVAS).unwrap();
        let after = state.shapes().clone();
        assert!(!state.redo());
        assert_eq!(state.shapes(), &after);
    }

    #[test]
    fn test_delete_selected_scenario() {
        let mut state = EditorState::default();
        let a = draw(&mut state, Tool::Rectangle, (10.0, 10.0), (50.0, 40.0));
        let b = draw(&mut state, Tool::Circle, (100.0, 100.0), (120.0, 100.0));
        state.select(&a).unwrap();
        let before = state.shapes().clone();
        let undo_before = state.history().undo_len();

        assert_eq!(state.delete_selected(), Some(a.clone()));
        assert!(!state.shapes().contains(&a));
        assert!(state.shapes().contains(&b));
        assert_eq!(state.selected_id(), None);
        assert_eq!(state.history().undo_len(), undo_before + 1);
        assert_eq!(state.history().last_snapshot(), Some(&before));
    }

    #[test]
    fn test_delete_without_selection_is_noop() {
        let mut state = EditorState::default();
        draw(&mut state, Tool::Rectangle, (10.0, 10.0), (50.0, 40.0));
        state.deselect();
        let undo_before = state.history().undo_len();
        assert_eq!(state.delete_selected(), None);
        assert_eq!(state.history().undo_len(), undo_before);
        assert_eq!(state.shapes().len(), 1);
    }

    #[test]
    fn test_failed_mutation_leaves_history_alone() {
        let mut state = EditorState::default();
        let a = draw(&mut state, Tool::Rectangle, (10.0, 10.0), (50.0, 40.0));
        let undo_before = state.history().undo_len();
        assert!(state.resize_shape(&a, -1.0, 1.0, CANVAS).is_err());
        assert!(state.move_shape("ghost", Point::default(), CANVAS).is_err());
        assert_eq!(state.history().undo_len(), undo_before);
    }

    #[test]
    fn test_undo_drops_selection_of_vanished_shape() {
        let mut state = EditorState::default();
        let a = draw(&mut state, Tool::Rectangle, (10.0, 10.0), (50.0, 40.0));
        assert_eq!(state.selected_id(), Some(a.as_str()));
        state.undo();
        assert_eq!(state.selected_id(), None);
    }

    #[test]
    fn test_gate_clears_selection() {
        let mut state = EditorState::default();
        let a = draw(&mut state, Tool::Rectangle, (10.0, 10.0), (50.0, 40.0));
        let ctx = GateContext {
            time: 0.25,
            filtering: true,
            playing: false,
            lock_edit: false,
        };
        state.enforce_gate(&ctx);
        assert_eq!(state.selected_id(), Some(a.as_str()));

        state.enforce_gate(&GateContext { time: 3.0, ..ctx });
        assert_eq!(state.selected_id(), None);

        state.select(&a).unwrap();
        state.enforce_gate(&GateContext { playing: true, ..ctx });
        assert_eq!(state.selected_id(), None);

        state.select(&a).unwrap();
        state.enforce_gate(&GateContext { lock_edit: true, ..ctx });
        assert_eq!(state.selected_id(), None);
    }

    #[test]
    fn test_listener_sees_each_change_once() {
        let seen: Rc<RefCell<Vec<Option<ShapeId>>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut state = EditorState::default();
        state.on_selection_change(Box::new(move |shape: Option<&Shape>| {
            sink.borrow_mut().push(shape.map(|s| s.id.clone()));
        }));

        let a = draw(&mut state, Tool::Rectangle, (10.0, 10.0), (50.0, 40.0));
        state.select(&a).unwrap();
        state.move_shape(&a, Point::new(100.0, 100.0), CANVAS).unwrap();
        state.deselect();

        let seen = seen.borrow();
        assert_eq!(
            *seen,
            vec![None, Some(a.clone()), Some(a.clone()), None],
            "initial, commit, moved record, deselect"
        );
    }
}
