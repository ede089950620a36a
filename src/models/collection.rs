// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Ordered shape collection.
//!
//! Insertion order is rendering order: later shapes draw on top and win hit
//! tests. Identifiers are unique within a collection.

use super::shape::{Shape, ShapeId};
use crate::error::{AnnotationError, Result};
use serde::{Deserialize, Serialize};

/// The committed shapes, in z-order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Shape>", into = "Vec<Shape>")]
pub struct ShapeCollection {
    shapes: Vec<Shape>,
}

impl ShapeCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection, rejecting duplicate identifiers.
    pub fn from_shapes(shapes: Vec<Shape>) -> Result<Self> {
        let mut collection = Self::new();
        for shape in shapes {
            collection.push(shape)?;
        }
        Ok(collection)
    }

    /// Append a shape on top of the others.
    pub fn push(&mut self, shape: Shape) -> Result<()> {
        if self.contains(&shape.id) {
            return Err(AnnotationError::DuplicateId(shape.id));
        }
        self.shapes.push(shape);
        Ok(())
    }

    /// Remove and return the shape with the given id.
    pub fn remove(&mut self, id: &str) -> Result<Shape> {
        let index = self
            .index_of(id)
            .ok_or_else(|| AnnotationError::UnknownShape(id.to_string()))?;
        Ok(self.shapes.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_of(id).is_some()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.shapes.iter().position(|s| s.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Shape> {
        self.shapes.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ShapeId> {
        self.shapes.iter().map(|s| &s.id)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn as_slice(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn into_vec(self) -> Vec<Shape> {
        self.shapes
    }
}

impl TryFrom<Vec<Shape>> for ShapeCollection {
    type Error = AnnotationError;

    fn try_from(shapes: Vec<Shape>) -> Result<Self> {
        Self::from_shapes(shapes)
    }
}

impl From<ShapeCollection> for Vec<Shape> {
    fn from(collection: ShapeCollection) -> Self {
        collection.shapes
    }
}

impl<'a> IntoIterator for &'a ShapeCollection {
    type Item = &'a Shape;
    type IntoIter = std::slice::Iter<'a, Shape>;

    fn into_iter(self) -> Self::IntoIter {
        self.shapes.iter()
    }
}
