// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! vidmark - time-windowed video annotation editor
//!
//! A cross-platform desktop application for drawing rectangles, circles
//! and lines over a video, each shown only during its slice of the
//! timeline.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use vidmark::app::AnnotatorApp;
use vidmark::config::WidgetConfig;
use vidmark::editor::Tool;
use vidmark::io::serialization;
use vidmark::models::collection::ShapeCollection;

#[derive(Parser, Debug)]
#[command(name = "vidmark", version, about = "Annotate video with time-windowed shapes")]
struct Cli {
    /// Video file or stream URL (an .m3u8 playlist is played as a stream)
    video_url: Option<String>,

    /// Configuration file (YAML or JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Shapes to load at startup (YAML or JSON)
    #[arg(long)]
    shapes: Option<PathBuf>,

    /// Initial tool: rectangle, circle, line or none
    #[arg(long)]
    tool: Option<Tool>,

    /// Disable drawing and editing
    #[arg(long)]
    lock_edit: bool,

    /// Only show shapes whose time window covers the playhead
    #[arg(long)]
    time_filtering: bool,

    /// Show the video duration next to the elapsed time
    #[arg(long)]
    show_duration: bool,
}

impl Cli {
    /// Apply command-line overrides on top of the file configuration.
    fn apply(&self, mut config: WidgetConfig) -> WidgetConfig {
        if let Some(url) = &self.video_url {
            config.video_url = url.clone();
        }
        if let Some(tool) = self.tool {
            config.tool = tool;
        }
        config.lock_edit |= self.lock_edit;
        config.time_filtering |= self.time_filtering;
        config.show_duration |= self.show_duration;
        config
    }
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => serialization::load_config(path)?,
        None => WidgetConfig::default(),
    };
    let mut config = cli.apply(config);

    let shapes = match &cli.shapes {
        Some(path) => {
            let (shapes, video_url) = serialization::load_shapes(path)
                .with_context(|| format!("Failed to load shapes from {}", path.display()))?;
            log::info!("Loaded {} shapes from {}", shapes.len(), path.display());
            if config.video_url.is_empty() {
                if let Some(url) = video_url {
                    config.video_url = url;
                }
            }
            shapes
        }
        None => ShapeCollection::new(),
    };

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("vidmark"),
        ..Default::default()
    };

    let app = AnnotatorApp::new(config, shapes);

    // Run the application
    eframe::run_native("vidmark", options, Box::new(|_cc| Ok(Box::new(app))))
        .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from([
            "vidmark",
            "https://example.com/live.m3u8",
            "--tool",
            "circle",
            "--lock-edit",
        ]);
        let config = cli.apply(WidgetConfig {
            show_duration: true,
            ..WidgetConfig::default()
        });
        assert_eq!(config.video_url, "https://example.com/live.m3u8");
        assert_eq!(config.tool, Tool::Circle);
        assert!(config.lock_edit);
        assert!(config.show_duration);
        assert!(!config.time_filtering);
    }

    #[test]
    fn test_cli_rejects_unknown_tool() {
        assert!(Cli::try_parse_from(["vidmark", "--tool", "polygon"]).is_err());
    }
}
