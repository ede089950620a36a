// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types for the annotation editor.
//!
//! Editing and playback operations return [`AnnotationError`]; the
//! application shell wraps these in `anyhow` where it meets the filesystem.

use thiserror::Error;

/// Errors produced by shape editing and playback control.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnnotationError {
    /// A draw was attempted without a drawing tool selected.
    #[error("no drawing tool selected (expected rectangle, circle or line)")]
    InvalidTool,

    /// A tool name could not be parsed.
    #[error("unknown tool '{0}' (expected rectangle, circle, line or none)")]
    UnknownTool(String),

    /// The video source is missing or unusable.
    #[error("invalid video source: {reason}")]
    InvalidSource {
        /// Why the source was rejected.
        reason: String,
    },

    /// A shape with this id is already in the collection.
    #[error("shape '{0}' already exists")]
    DuplicateId(String),

    /// No shape with this id exists.
    #[error("shape '{0}' not found")]
    UnknownShape(String),

    /// Resize factors must be finite and positive.
    #[error("invalid scale factors ({scale_x}, {scale_y})")]
    InvalidScale {
        /// Horizontal factor.
        scale_x: f64,
        /// Vertical factor.
        scale_y: f64,
    },

    /// The host refused to change fullscreen state.
    #[error("fullscreen request rejected: {0}")]
    Fullscreen(String),
}

/// Result alias for editor operations.
pub type Result<T> = std::result::Result<T, AnnotationError>;
