// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Editor configuration.
//!
//! Configuration is read from a YAML or JSON file (keys match the options
//! of the embeddable video annotation widget) and then overridden by
//! command-line flags.

use crate::editor::Tool;
use crate::models::shape::{ShapeStyle, DEFAULT_STROKE_WIDTH};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Default annotation colour.
pub const DEFAULT_COLOR: &str = "#FF0000";

/// Attributes applied to the media element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MediaAttributes {
    pub autoplay: bool,
    #[serde(rename = "loop")]
    pub looping: bool,
    pub muted: bool,
    pub playback_rate: f64,
    /// Still frame drawn behind the annotations.
    pub poster: Option<PathBuf>,
    /// Timeline length in seconds for hosts that cannot probe the source.
    pub duration: Option<f64>,
    /// Any other attribute; kept for round trips, otherwise unused.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Default for MediaAttributes {
    fn default() -> Self {
        Self {
            autoplay: true,
            looping: true,
            muted: false,
            playback_rate: 1.0,
            poster: None,
            duration: Some(60.0),
            extra: BTreeMap::new(),
        }
    }
}

/// Everything the editor is configured with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WidgetConfig {
    pub video_url: String,
    pub annotation_color: String,
    pub stroke_width: f64,
    pub opacity: f64,
    #[serde(alias = "selectedShapeTool")]
    pub tool: Tool,
    pub lock_edit: bool,
    /// Show only shapes whose time window covers the playhead.
    #[serde(rename = "videoTimeAnnotation", alias = "timeFiltering")]
    pub time_filtering: bool,
    #[serde(rename = "showVideoDuration", alias = "showDuration")]
    pub show_duration: bool,
    pub hide_annotations: bool,
    /// Cap on undo depth; absent means unbounded. Zero is rejected by
    /// `sanitized` and also means unbounded.
    pub history_limit: Option<usize>,
    #[serde(alias = "videoControls")]
    pub media: MediaAttributes,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            video_url: String::new(),
            annotation_color: DEFAULT_COLOR.to_string(),
            stroke_width: DEFAULT_STROKE_WIDTH,
            opacity: 1.0,
            tool: Tool::Select,
            lock_edit: false,
            time_filtering: false,
            show_duration: false,
            hide_annotations: false,
            history_limit: None,
            media: MediaAttributes::default(),
        }
    }
}

impl WidgetConfig {
    /// Style applied to newly drawn shapes.
    pub fn style(&self) -> ShapeStyle {
        ShapeStyle {
            color: self.annotation_color.clone(),
            stroke_width: self.stroke_width,
            opacity: self.opacity,
        }
    }

    /// Replace out-of-range values with defaults, logging each one.
    pub fn sanitized(mut self) -> Self {
        if !(self.stroke_width.is_finite() && self.stroke_width > 0.0) {
            log::warn!(
                "Invalid stroke width {}, using {}",
                self.stroke_width,
                DEFAULT_STROKE_WIDTH
            );
            self.stroke_width = DEFAULT_STROKE_WIDTH;
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            log::warn!("Opacity {} out of range, clamping", self.opacity);
            self.opacity = if self.opacity.is_nan() {
                1.0
            } else {
                self.opacity.clamp(0.0, 1.0)
            };
        }
        if self.annotation_color.trim().is_empty() {
            self.annotation_color = DEFAULT_COLOR.to_string();
        }
        if !(self.media.playback_rate.is_finite() && self.media.playback_rate > 0.0) {
            log::warn!("Invalid playback rate {}, using 1", self.media.playback_rate);
            self.media.playback_rate = 1.0;
        }
        if self.history_limit == Some(0) {
            log::warn!("History limit 0 ignored, keeping unbounded history");
            self.history_limit = None;
        }
        for key in self.media.extra.keys() {
            log::debug!("Ignoring media attribute '{}'", key);
        }
        self
    }
}
