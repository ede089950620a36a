// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Poster frame loading.
//!
//! The poster is a still image drawn behind the annotations, converted to
//! RGBA so it can be uploaded as an egui texture.

use anyhow::{Context, Result};
use std::path::Path;

/// A decoded image ready for texture upload.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    /// Unmultiplied RGBA8 pixels, row-major.
    pub pixels: Vec<u8>,
}

/// Decode an image file into RGBA8.
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    let img = image::open(path)
        .with_context(|| format!("Failed to open image {}", path.display()))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(LoadedImage {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}
