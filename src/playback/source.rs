// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Video source classification.

use crate::error::{AnnotationError, Result};
use std::fmt;

/// Where the video comes from and how it must be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    /// A single file or progressive URL played directly.
    Direct(String),
    /// An HLS manifest played through the adaptive streaming session.
    Adaptive(String),
}

impl MediaSource {
    /// Classify a URL. Blank URLs are rejected; `.m3u8` manifests (ignoring
    /// any query string or fragment) are adaptive.
    pub fn parse(url: &str) -> Result<Self> {
        let url = url.trim();
        if url.is_empty() {
            return Err(AnnotationError::InvalidSource {
                reason: "no video url provided".to_string(),
            });
        }
        let path = url.split(['?', '#']).next().unwrap_or(url);
        if path.to_ascii_lowercase().ends_with(".m3u8") {
            Ok(MediaSource::Adaptive(url.to_string()))
        } else {
            Ok(MediaSource::Direct(url.to_string()))
        }
    }

    pub fn url(&self) -> &str {
        match self {
            MediaSource::Direct(url) | MediaSource::Adaptive(url) => url,
        }
    }

    pub fn is_adaptive(&self) -> bool {
        matches!(self, MediaSource::Adaptive(_))
    }
}

impl fmt::Display for MediaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_url_is_invalid() {
        assert!(matches!(
            MediaSource::parse("   "),
            Err(AnnotationError::InvalidSource { .. })
        ));
    }

    #[test]
    fn test_manifest_is_adaptive() {
        let source = MediaSource::parse("https://cdn.example.com/live/index.m3u8?token=abc").unwrap();
        assert!(source.is_adaptive());
        assert_eq!(source.url(), "https://cdn.example.com/live/index.m3u8?token=abc");
    }

    #[test]
    fn test_plain_file_is_direct() {
        let source = MediaSource::parse("clips/intersection.mp4").unwrap();
        assert_eq!(source, MediaSource::Direct("clips/intersection.mp4".to_string()));
    }
}
