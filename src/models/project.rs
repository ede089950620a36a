// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Exported annotation file contents.
//!
//! A project ties a shape collection to the video it annotates and the
//! canvas size it was last edited at.

use super::collection::ShapeCollection;
use super::shape::CanvasSize;
use serde::{Deserialize, Serialize};

/// Complete project data for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectData {
    pub video_url: String,
    pub canvas: CanvasSize,
    #[serde(default)]
    pub shapes: ShapeCollection,
}

impl ProjectData {
    /// Create a project for the given video and canvas.
    pub fn new(video_url: String, canvas: CanvasSize, shapes: ShapeCollection) -> Self {
        Self {
            video_url,
            canvas,
            shapes,
        }
    }
}
