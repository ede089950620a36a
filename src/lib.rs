// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! vidmark - time-windowed video annotation editor
//!
//! Rectangles, circles and lines are drawn over a video surface, each tied
//! to a window on the video timeline, with undo/redo over the whole shape
//! collection.

pub mod app;
pub mod config;
pub mod editor;
pub mod error;
pub mod io;
pub mod models;
pub mod playback;
pub mod ui;
pub mod util;
