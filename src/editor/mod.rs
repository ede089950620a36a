// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Shape editing: drafting, mutation, selection and time gating.

pub mod state;
pub mod store;
pub mod time_gate;

use crate::error::AnnotationError;
use crate::models::shape::ShapeType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Current drawing tool selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// No drawing tool: click selects, drag moves.
    #[default]
    #[serde(rename = "none", alias = "select")]
    Select,
    Rectangle,
    Circle,
    Line,
}

impl Tool {
    /// Shape type drawn by this tool, if it draws at all.
    pub fn shape_type(self) -> Option<ShapeType> {
        match self {
            Tool::Select => None,
            Tool::Rectangle => Some(ShapeType::Rectangle),
            Tool::Circle => Some(ShapeType::Circle),
            Tool::Line => Some(ShapeType::Line),
        }
    }

    pub fn is_drawing(self) -> bool {
        self.shape_type().is_some()
    }
}

impl FromStr for Tool {
    type Err = AnnotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "select" | "" => Ok(Tool::Select),
            "rectangle" | "rect" => Ok(Tool::Rectangle),
            "circle" => Ok(Tool::Circle),
            "line" => Ok(Tool::Line),
            other => Err(AnnotationError::UnknownTool(other.to_string())),
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tool::Select => "none",
            Tool::Rectangle => "rectangle",
            Tool::Circle => "circle",
            Tool::Line => "line",
        };
        f.write_str(name)
    }
}
