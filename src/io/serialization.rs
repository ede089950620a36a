// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project and configuration serialization.
//!
//! This module handles exporting and importing shape files and reading
//! configuration, in YAML or JSON chosen by file extension.

use crate::config::WidgetConfig;
use crate::models::collection::ShapeCollection;
use crate::models::project::ProjectData;
use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk format, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Yaml,
    Json,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase());
        match extension.as_deref() {
            Some("yaml") | Some("yml") => Ok(FileFormat::Yaml),
            Some("json") => Ok(FileFormat::Json),
            _ => bail!("Unsupported file extension: {:?}", extension),
        }
    }
}

/// Export data to YAML format.
pub fn export_yaml<T: Serialize>(data: &T, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(data)?;
    std::fs::write(path, yaml).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Export data to JSON format.
pub fn export_json<T: Serialize>(data: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Import data from YAML format.
pub fn import_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let yaml = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let data = serde_yaml::from_str(&yaml)
        .with_context(|| format!("Invalid YAML in {}", path.display()))?;
    Ok(data)
}

/// Import data from JSON format.
pub fn import_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let data = serde_json::from_str(&json)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;
    Ok(data)
}

/// Write `data` in the format implied by `path`.
pub fn save<T: Serialize>(data: &T, path: &Path) -> Result<()> {
    match FileFormat::from_path(path)? {
        FileFormat::Yaml => export_yaml(data, path),
        FileFormat::Json => export_json(data, path),
    }
}

/// Read data in the format implied by `path`.
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    match FileFormat::from_path(path)? {
        FileFormat::Yaml => import_yaml(path),
        FileFormat::Json => import_json(path),
    }
}

/// A shape file is either a full project or a bare list of shapes.
#[derive(Deserialize)]
#[serde(untagged)]
enum ShapeFile {
    Project(ProjectData),
    Shapes(ShapeCollection),
}

/// Load shapes from a project file or a bare shape list.
///
/// Returns the shapes and, for project files, the video they belong to.
pub fn load_shapes(path: &Path) -> Result<(ShapeCollection, Option<String>)> {
    let file: ShapeFile = load(path)?;
    Ok(match file {
        ShapeFile::Project(project) => (project.shapes, Some(project.video_url)),
        ShapeFile::Shapes(shapes) => (shapes, None),
    })
}

/// Read and sanitize a configuration file.
pub fn load_config(path: &Path) -> Result<WidgetConfig> {
    let config: WidgetConfig =
        load(path).with_context(|| format!("Failed to load config {}", path.display()))?;
    Ok(config.sanitized())
}
