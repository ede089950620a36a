// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the application structure that implements the
//! eframe::App trait. It owns the editor state and the playback adapter and
//! routes the actions reported by the UI components to them.

use crate::config::WidgetConfig;
use crate::editor::state::{AnnotationCommands, EditorState};
use crate::editor::time_gate::{self, GateContext};
use crate::editor::Tool;
use crate::error::{AnnotationError, Result};
use crate::io::media::LoadedImage;
use crate::models::collection::ShapeCollection;
use crate::models::project::ProjectData;
use crate::models::shape::{CanvasSize, Shape};
use crate::playback::adapter::PlaybackAdapter;
use crate::playback::media::{ClockMedia, FullscreenControl};
use crate::playback::source::MediaSource;
use crate::ui::canvas::{self, CanvasAction, CanvasView, Interaction};
use crate::ui::controls::{self, ControlsAction};
use crate::ui::properties::{self, PropertiesAction};
use crate::ui::timeline::{self, TimelineAction};
use crate::ui::toolbar;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::time::{Duration, Instant};

/// Repaint interval while the clock is running.
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Fullscreen control backed by the native window.
struct EguiFullscreen<'a> {
    ctx: &'a egui::Context,
}

impl FullscreenControl for EguiFullscreen<'_> {
    fn set_fullscreen(&mut self, fullscreen: bool) -> Result<()> {
        if self.ctx.input(|i| i.viewport().fullscreen).is_none() {
            return Err(AnnotationError::Fullscreen(
                "window does not report a fullscreen state".to_string(),
            ));
        }
        self.ctx
            .send_viewport_cmd(egui::ViewportCommand::Fullscreen(fullscreen));
        Ok(())
    }
}

/// Main application state.
pub struct AnnotatorApp {
    config: WidgetConfig,

    /// Shapes, history and selection
    editor: EditorState,

    playback: PlaybackAdapter<ClockMedia>,

    /// Currently selected drawing tool
    current_tool: Tool,

    /// Pointer state of the canvas
    interaction: Interaction,

    /// Canvas size from the last frame
    canvas_size: CanvasSize,

    /// Poster frame drawn behind the shapes
    poster_texture: Option<egui::TextureHandle>,

    poster_size: Option<(u32, u32)>,

    /// Receiver for background poster loading
    poster_loader: Option<Receiver<anyhow::Result<LoadedImage>>>,
}

impl AnnotatorApp {
    /// Create the application from a sanitized configuration and the
    /// initial shapes.
    pub fn new(config: WidgetConfig, shapes: ShapeCollection) -> Self {
        let mut editor = EditorState::new(shapes, config.history_limit);
        editor.on_selection_change(Box::new(|shape: Option<&Shape>| match shape {
            Some(shape) => log::info!("Selected shape {} ({:?})", shape.id, shape.shape_type()),
            None => log::debug!("Selection cleared"),
        }));

        let playback = PlaybackAdapter::new(ClockMedia::new(config.media.duration), &config.media);

        let mut app = Self {
            current_tool: config.tool,
            config,
            editor,
            playback,
            interaction: Interaction::default(),
            canvas_size: CanvasSize::new(0.0, 0.0),
            poster_texture: None,
            poster_size: None,
            poster_loader: None,
        };

        let url = app.config.video_url.clone();
        app.open_video(&url);
        if let Some(poster) = app.config.media.poster.clone() {
            app.load_poster(poster);
        }
        app
    }

    /// Attach a new video source. An invalid source leaves the canvas
    /// without a video and drawing disabled.
    fn open_video(&mut self, url: &str) {
        self.playback.detach();
        match MediaSource::parse(url) {
            Ok(source) => {
                self.config.video_url = url.to_string();
                self.playback.attach(source);
                // The clock transport is ready as soon as it is loaded.
                self.playback.mark_ready();
            }
            Err(e) => log::error!("{}", e),
        }
    }

    /// Decode the poster image on a background thread.
    fn load_poster(&mut self, path: PathBuf) {
        let (sender, receiver) = channel();
        self.poster_loader = Some(receiver);

        std::thread::spawn(move || {
            let result = crate::io::media::load_image(&path);
            if let Ok(image) = &result {
                log::info!("Loaded poster: {} ({}x{})", path.display(), image.width, image.height);
            }
            let _ = sender.send(result);
        });
    }

    fn has_source(&self) -> bool {
        self.playback.source().is_some()
    }

    /// Drawing and editing are possible: a source is attached, editing is
    /// not locked and the window is not fullscreen.
    fn editable(&self) -> bool {
        self.has_source() && !self.config.lock_edit && !self.playback.is_fullscreen()
    }

    fn gate_context(&self) -> GateContext {
        GateContext {
            time: self.playback.current_time(),
            filtering: self.config.time_filtering,
            playing: self.playback.is_playing(),
            lock_edit: self.config.lock_edit,
        }
    }

    /// Export shapes to a file.
    fn export_shapes(&self, path: PathBuf) {
        let project = ProjectData::new(
            self.config.video_url.clone(),
            self.canvas_size,
            self.editor.shapes().clone(),
        );
        match crate::io::serialization::save(&project, &path) {
            Ok(()) => log::info!(
                "Exported {} shapes to {}",
                project.shapes.len(),
                path.display()
            ),
            Err(e) => log::error!("Failed to export shapes: {:#}", e),
        }
    }

    /// Import shapes from a file, replacing the current collection. A
    /// project file also switches to the video it references.
    fn import_shapes(&mut self, path: PathBuf) {
        match crate::io::serialization::load_shapes(&path) {
            Ok((shapes, video_url)) => {
                log::info!("Imported {} shapes from {}", shapes.len(), path.display());
                self.cancel_interaction();
                self.editor.load_shapes(shapes);
                if let Some(url) = video_url.filter(|u| !u.is_empty() && *u != self.config.video_url) {
                    self.open_video(&url);
                }
            }
            Err(e) => log::error!("Failed to import shapes: {:#}", e),
        }
    }

    /// Drop any pointer drag along with the draft it was building.
    fn cancel_interaction(&mut self) {
        self.interaction.cancel();
        self.editor.cancel_draft();
    }

    /// Discard a draft the canvas is no longer drawing, e.g. after the
    /// shapes were hidden or editing was turned off mid-drag.
    fn sync_draft(&mut self, editable: bool) {
        if self.editor.is_drawing() && !(editable && self.interaction.is_drawing()) {
            log::debug!("Dropping orphaned draft");
            self.editor.cancel_draft();
        }
    }

    fn undo(&mut self) {
        self.cancel_interaction();
        if !self.editor.undo() {
            log::debug!("Nothing to undo");
        }
    }

    fn redo(&mut self) {
        self.cancel_interaction();
        if !self.editor.redo() {
            log::debug!("Nothing to redo");
        }
    }

    fn delete_selected(&mut self) {
        self.cancel_interaction();
        self.editor.delete_selected();
    }

    fn handle_canvas_action(&mut self, action: CanvasAction, size: CanvasSize) {
        match action {
            CanvasAction::BeginDraft(origin) => {
                let time = self.playback.current_time();
                let style = self.config.style();
                if let Err(e) = self
                    .editor
                    .begin_draft(self.current_tool, origin, size, time, &style)
                {
                    log::warn!("{}", e);
                }
            }
            CanvasAction::UpdateDraft(pointer) => {
                self.editor.update_draft(pointer);
            }
            CanvasAction::CommitDraft(pointer) => {
                self.editor.update_draft(pointer);
                if let Some(Err(e)) = self.editor.commit_draft() {
                    log::error!("Failed to add shape: {}", e);
                }
            }
            CanvasAction::Select(id) => {
                if let Err(e) = self.editor.select(&id) {
                    log::warn!("{}", e);
                }
            }
            CanvasAction::Deselect => self.editor.deselect(),
            CanvasAction::Move { id, position } => {
                match self.editor.move_shape(&id, position, size) {
                    Ok(_) => log::info!("Moved shape {}", id),
                    Err(e) => log::warn!("{}", e),
                }
            }
            CanvasAction::Resize {
                id,
                scale_x,
                scale_y,
            } => match self.editor.resize_shape(&id, scale_x, scale_y, size) {
                Ok(_) => log::info!("Resized shape {} by ({:.2}, {:.2})", id, scale_x, scale_y),
                Err(e) => log::warn!("{}", e),
            },
            CanvasAction::None => {}
        }
    }

    fn handle_controls_action(&mut self, action: ControlsAction, ctx: &egui::Context) {
        match action {
            ControlsAction::PlayPause => {
                self.cancel_interaction();
                self.playback.play_pause();
            }
            ControlsAction::SeekFraction(fraction) => self.playback.seek_fraction(fraction),
            ControlsAction::SetRate(rate) => self.playback.set_rate(rate),
            ControlsAction::ToggleMute => self.playback.toggle_mute(),
            ControlsAction::ToggleFullscreen => {
                self.playback
                    .toggle_fullscreen(&mut EguiFullscreen { ctx });
            }
            ControlsAction::None => {}
        }
    }

    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.cancel_interaction();
            self.editor.deselect();
        }

        // Only process if no text field is focused
        if ctx.wants_keyboard_input() {
            return;
        }

        if ctx.input(|i| i.key_pressed(egui::Key::Delete)) {
            self.delete_selected();
        }
        if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::Z)) {
            self.undo();
        }
        if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::Y)) {
            self.redo();
        }
    }

    fn menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Video...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Video", &["mp4", "webm", "mov", "mkv", "m3u8"])
                            .pick_file()
                        {
                            self.open_video(&path.to_string_lossy());
                        }
                        ui.close_menu();
                    }
                    if ui.button("Open Poster Image...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Images", &["jpg", "jpeg", "png", "bmp", "tiff", "tif"])
                            .pick_file()
                        {
                            self.load_poster(path);
                        }
                        ui.close_menu();
                    }
                    if ui.button("Import Shapes...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Shapes", &["yaml", "yml", "json"])
                            .pick_file()
                        {
                            self.import_shapes(path);
                        }
                        ui.close_menu();
                    }
                    ui.separator();
                    ui.menu_button("Export Shapes", |ui| {
                        if ui.button("Export as YAML...").clicked() {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter("YAML", &["yaml", "yml"])
                                .set_file_name("shapes.yaml")
                                .save_file()
                            {
                                self.export_shapes(path);
                            }
                            ui.close_menu();
                        }
                        if ui.button("Export as JSON...").clicked() {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter("JSON", &["json"])
                                .set_file_name("shapes.json")
                                .save_file()
                            {
                                self.export_shapes(path);
                            }
                            ui.close_menu();
                        }
                    });
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Edit", |ui| {
                    let can_undo = self.editor.history().can_undo();
                    if ui
                        .add_enabled(can_undo, egui::Button::new("Undo (Ctrl+Z)"))
                        .clicked()
                    {
                        self.undo();
                        ui.close_menu();
                    }

                    let can_redo = self.editor.history().can_redo();
                    if ui
                        .add_enabled(can_redo, egui::Button::new("Redo (Ctrl+Y)"))
                        .clicked()
                    {
                        self.redo();
                        ui.close_menu();
                    }

                    ui.separator();

                    let has_selection = self.editor.selected_id().is_some();
                    if ui
                        .add_enabled(has_selection, egui::Button::new("Delete Selected"))
                        .clicked()
                    {
                        self.delete_selected();
                        ui.close_menu();
                    }
                });

                ui.menu_button("View", |ui| {
                    ui.checkbox(&mut self.config.time_filtering, "Filter shapes by time");
                    ui.checkbox(&mut self.config.hide_annotations, "Hide shapes");
                    ui.checkbox(&mut self.config.show_duration, "Show duration");
                    ui.checkbox(&mut self.config.lock_edit, "Lock editing");
                });
            });
        });
    }
}

impl eframe::App for AnnotatorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for a completed poster load
        if let Some(ref receiver) = self.poster_loader {
            if let Ok(result) = receiver.try_recv() {
                self.poster_loader = None;
                match result {
                    Ok(image) => {
                        let size = [image.width as usize, image.height as usize];
                        let color_image =
                            egui::ColorImage::from_rgba_unmultiplied(size, &image.pixels);
                        self.poster_texture = Some(ctx.load_texture(
                            "poster",
                            color_image,
                            egui::TextureOptions::LINEAR,
                        ));
                        self.poster_size = Some((image.width, image.height));
                    }
                    Err(e) => log::error!("Failed to load poster: {:#}", e),
                }
            }
        }

        let now = Instant::now();
        self.playback.media_mut().tick(now);
        self.playback.poll(now);
        if let Some(fullscreen) = ctx.input(|i| i.viewport().fullscreen) {
            self.playback.sync_fullscreen(fullscreen);
        }

        self.handle_keyboard(ctx);
        self.menu_bar(ctx);

        let editable = self.editable();

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            toolbar::show(ui, &mut self.current_tool, editable);
        });

        let gate = self.gate_context();
        let can_select = editable && !gate.playing;

        let properties_action = egui::SidePanel::right("properties")
            .default_width(260.0)
            .show(ctx, |ui| properties::show(ui, &self.editor, can_select))
            .inner;

        match properties_action {
            PropertiesAction::SelectShape(id) => {
                let shape = self.editor.shapes().get(&id);
                if time_gate::selection_allowed(shape, &gate) {
                    if let Err(e) = self.editor.select(&id) {
                        log::warn!("{}", e);
                    }
                } else {
                    log::warn!("Shape {} is not selectable at {:.2}s", id, gate.time);
                }
            }
            PropertiesAction::DeleteShape(id) => {
                self.cancel_interaction();
                if let Err(e) = self.editor.remove_shape(&id) {
                    log::warn!("{}", e);
                }
            }
            PropertiesAction::None => {}
        }

        let (controls_action, timeline_action) = egui::TopBottomPanel::bottom("transport")
            .show(ctx, |ui| {
                let progress = self.playback.progress();
                let timeline_action = timeline::show(
                    ui,
                    &self.editor,
                    self.playback.current_time(),
                    progress.duration,
                );
                let controls_action =
                    controls::show(ui, &self.playback, self.config.show_duration);
                (controls_action, timeline_action)
            })
            .inner;

        self.handle_controls_action(controls_action, ctx);
        if let TimelineAction::Seek(time) = timeline_action {
            self.playback.seek_to(time);
        }

        let gate = self.gate_context();
        let has_source = self.has_source();
        let canvas_response = egui::CentralPanel::default()
            .show(ctx, |ui| {
                let view = CanvasView {
                    editor: &self.editor,
                    tool: self.current_tool,
                    time: gate.time,
                    filtering: gate.filtering,
                    playing: gate.playing,
                    editable,
                    hide_annotations: self.config.hide_annotations,
                    has_source,
                    poster: self.poster_texture.as_ref(),
                    poster_size: self.poster_size,
                };
                canvas::show(ui, &view, &mut self.interaction)
            })
            .inner;

        self.canvas_size = canvas_response.size;
        self.handle_canvas_action(canvas_response.action, canvas_response.size);

        self.sync_draft(editable);
        self.editor.enforce_gate(&self.gate_context());

        if self.playback.is_playing() || self.poster_loader.is_some() {
            ctx.request_repaint_after(FRAME_INTERVAL);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::shape::{Geometry, Point};

    const CANVAS: CanvasSize = CanvasSize {
        width: 500.0,
        height: 300.0,
    };

    fn app_with_tool(tool: Tool) -> AnnotatorApp {
        let config = WidgetConfig {
            video_url: "clip.mp4".to_string(),
            tool,
            ..WidgetConfig::default()
        };
        AnnotatorApp::new(config, ShapeCollection::new())
    }

    fn draw_rectangle(app: &mut AnnotatorApp) -> String {
        app.handle_canvas_action(CanvasAction::BeginDraft(Point::new(10.0, 10.0)), CANVAS);
        app.handle_canvas_action(CanvasAction::CommitDraft(Point::new(60.0, 40.0)), CANVAS);
        app.editor.selected_id().unwrap().to_string()
    }

    #[test]
    fn test_commit_applies_final_pointer() {
        let mut app = app_with_tool(Tool::Rectangle);
        let id = draw_rectangle(&mut app);

        assert!(app.editor.draft().is_none());
        assert_eq!(app.editor.shapes().len(), 1);
        assert_eq!(app.editor.history().undo_len(), 1);
        let shape = app.editor.shapes().get(&id).unwrap();
        assert_eq!(
            shape.properties.geometry,
            Geometry::Rectangle {
                width: 50.0,
                height: 30.0
            }
        );
    }

    #[test]
    fn test_begin_with_select_tool_changes_nothing() {
        let mut app = app_with_tool(Tool::Select);
        app.handle_canvas_action(CanvasAction::BeginDraft(Point::new(10.0, 10.0)), CANVAS);
        app.handle_canvas_action(CanvasAction::CommitDraft(Point::new(60.0, 40.0)), CANVAS);

        assert!(app.editor.draft().is_none());
        assert!(app.editor.shapes().is_empty());
        assert!(!app.editor.history().can_undo());
        assert!(app.editor.selected_id().is_none());
    }

    #[test]
    fn test_move_and_resize_record_one_entry_each() {
        let mut app = app_with_tool(Tool::Rectangle);
        let id = draw_rectangle(&mut app);

        app.handle_canvas_action(
            CanvasAction::Move {
                id: id.clone(),
                position: Point::new(100.0, 80.0),
            },
            CANVAS,
        );
        assert_eq!(app.editor.history().undo_len(), 2);
        let shape = app.editor.shapes().get(&id).unwrap();
        assert_eq!(shape.properties.position(), Point::new(100.0, 80.0));

        app.handle_canvas_action(
            CanvasAction::Resize {
                id: id.clone(),
                scale_x: 2.0,
                scale_y: 2.0,
            },
            CANVAS,
        );
        assert_eq!(app.editor.history().undo_len(), 3);

        app.undo();
        app.undo();
        let shape = app.editor.shapes().get(&id).unwrap();
        assert_eq!(shape.properties.position(), Point::new(10.0, 10.0));
    }

    #[test]
    fn test_undo_redo_delete_drop_the_draft() {
        let mut app = app_with_tool(Tool::Rectangle);

        app.handle_canvas_action(CanvasAction::BeginDraft(Point::new(10.0, 10.0)), CANVAS);
        app.handle_canvas_action(CanvasAction::UpdateDraft(Point::new(50.0, 40.0)), CANVAS);
        app.undo();
        assert!(app.editor.draft().is_none());
        assert!(app.editor.shapes().is_empty());

        app.handle_canvas_action(CanvasAction::BeginDraft(Point::new(10.0, 10.0)), CANVAS);
        app.redo();
        assert!(app.editor.draft().is_none());

        app.handle_canvas_action(CanvasAction::BeginDraft(Point::new(10.0, 10.0)), CANVAS);
        app.delete_selected();
        assert!(app.editor.draft().is_none());
        assert!(app.editor.shapes().is_empty());
    }

    #[test]
    fn test_draft_without_canvas_drag_is_dropped() {
        let mut app = app_with_tool(Tool::Circle);
        app.handle_canvas_action(CanvasAction::BeginDraft(Point::new(10.0, 10.0)), CANVAS);
        app.handle_canvas_action(CanvasAction::UpdateDraft(Point::new(30.0, 10.0)), CANVAS);
        assert!(app.editor.is_drawing());

        // The canvas reports no draw drag, as after the shapes are hidden.
        app.sync_draft(true);
        assert!(app.editor.draft().is_none());
        assert!(app.editor.shapes().is_empty());
    }

    #[test]
    fn test_import_project_replaces_shapes_and_video() {
        let mut source = app_with_tool(Tool::Rectangle);
        draw_rectangle(&mut source);
        draw_rectangle(&mut source);
        let project = ProjectData::new(
            "other.m3u8".to_string(),
            CANVAS,
            source.editor.shapes().clone(),
        );
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.yaml");
        crate::io::serialization::save(&project, &path).unwrap();

        let mut app = app_with_tool(Tool::Rectangle);
        draw_rectangle(&mut app);
        app.handle_canvas_action(CanvasAction::BeginDraft(Point::new(10.0, 10.0)), CANVAS);
        app.import_shapes(path);

        assert_eq!(app.editor.shapes().len(), 2);
        assert!(app.editor.draft().is_none());
        assert!(!app.editor.history().can_undo());
        assert_eq!(app.config.video_url, "other.m3u8");
        assert!(app.has_source());
    }

    #[test]
    fn test_failed_import_keeps_shapes() {
        let mut app = app_with_tool(Tool::Rectangle);
        draw_rectangle(&mut app);
        let dir = tempfile::tempdir().unwrap();
        app.import_shapes(dir.path().join("missing.yaml"));

        assert_eq!(app.editor.shapes().len(), 1);
        assert_eq!(app.config.video_url, "clip.mp4");
    }
}
