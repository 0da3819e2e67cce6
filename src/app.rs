// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the main application structure that implements
//! the egui::App trait. It owns the crop session and coordinates the
//! background work (probing a video, running the encoder) with the UI.

use crate::config::AppConfig;
use crate::error::{CropError, CropResult};
use crate::interaction::pointer::PointerEvent;
use crate::io::encoder::{CropEncoder, EncodedVideo, FfmpegEncoder};
use crate::io::media::{self, LoadedFrame};
use crate::io::serialization;
use crate::session::CropSession;
use crate::ui::{canvas, properties, toolbar};
use crate::util::geometry::{ContainerFrame, NativeResolution};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;

/// Result of background video loading.
struct LoadedSource {
    path: PathBuf,
    native: NativeResolution,
    frame: Option<LoadedFrame>,
}

/// Take the encoder's answer if it is ready. A worker that went away
/// without sending one counts as a failed export.
fn poll_export(receiver: &Receiver<CropResult<EncodedVideo>>) -> Option<CropResult<EncodedVideo>> {
    match receiver.try_recv() {
        Ok(result) => Some(result),
        Err(TryRecvError::Empty) => None,
        Err(TryRecvError::Disconnected) => Some(Err(CropError::ExportFailed(
            "encoder stopped without a result".to_string(),
        ))),
    }
}

/// Main application state.
pub struct VidcropApp {
    config: AppConfig,

    /// Source, selection, gesture and lifecycle state
    session: CropSession,

    /// Service that performs the actual crop
    encoder: Arc<dyn CropEncoder>,

    /// First frame of the loaded video
    preview_texture: Option<egui::TextureHandle>,

    /// Receiver for background video loading
    source_loader: Option<Receiver<Result<LoadedSource, String>>>,

    /// Receiver for the in-flight export
    export_result: Option<Receiver<CropResult<EncodedVideo>>>,

    /// Loading state message
    loading_message: Option<String>,

    /// Status line shown in the toolbar
    status: String,

    /// Container size measured by the canvas on the last frame
    container: Option<ContainerFrame>,
}

impl VidcropApp {
    /// Create a new VIDCROP application instance.
    pub fn new(config: AppConfig) -> Self {
        let encoder: Arc<dyn CropEncoder> = Arc::new(FfmpegEncoder::new(&config.encoder));
        Self {
            session: CropSession::new(config.selection.clone()),
            config,
            encoder,
            preview_texture: None,
            source_loader: None,
            export_result: None,
            loading_message: None,
            status: "Open a video to begin.".to_string(),
            container: None,
        }
    }

    /// Probe a video file and grab its first frame (asynchronously).
    fn load_video_file(&mut self, path: PathBuf) {
        let (sender, receiver) = channel();
        self.source_loader = Some(receiver);
        self.loading_message = Some("Loading video...".to_string());

        let ffprobe = self.config.encoder.ffprobe_path.clone();
        let ffmpeg = self.config.encoder.ffmpeg_path.clone();

        // Spawn background thread for loading
        std::thread::spawn(move || {
            let result = (|| -> Result<LoadedSource, String> {
                let native = media::probe_resolution(&ffprobe, &path)
                    .map_err(|e| format!("Failed to read video metadata: {:#}", e))?;

                let frame = match media::extract_preview_frame(&ffmpeg, &path) {
                    Ok(frame) => Some(frame),
                    Err(e) => {
                        log::warn!("No preview frame for {}: {:#}", path.display(), e);
                        None
                    }
                };

                Ok(LoadedSource { path, native, frame })
            })();

            let _ = sender.send(result);
        });
    }

    /// Hand the current selection to the encoder on a background thread.
    fn start_export(&mut self) {
        let Some(container) = self.container else {
            self.status = CropError::NotReady.to_string();
            return;
        };

        let request = match self.session.begin_export(container) {
            Ok(request) => request,
            Err(e) => {
                self.status = e.to_string();
                return;
            }
        };

        let (sender, receiver) = channel();
        self.export_result = Some(receiver);
        self.status = "Processing...".to_string();

        let encoder = Arc::clone(&self.encoder);
        std::thread::spawn(move || {
            let _ = sender.send(encoder.encode(&request));
        });
    }

    /// Offer to save the encoded video under its suggested name.
    fn save_output(&mut self, video: EncodedVideo) {
        let file_name = if video.file_name.is_empty() {
            self.config.encoder.fallback_file_name.clone()
        } else {
            video.file_name
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("Video", &["mp4"])
            .set_file_name(&file_name)
            .save_file()
        else {
            log::warn!("Save dialog dismissed, discarding {}", file_name);
            self.status = "Crop complete, output discarded. Start over to crop again.".to_string();
            return;
        };

        match std::fs::write(&path, &video.bytes) {
            Ok(()) => {
                log::info!("Saved cropped video to {}", path.display());
                self.status = format!("Crop complete! Saved to {}.", path.display());
            }
            Err(e) => {
                log::error!("Failed to write {}: {}", path.display(), e);
                self.status = format!("Crop complete, but saving failed: {}", e);
            }
        }
    }

    /// Save the current crop settings to a file.
    fn export_settings(&mut self, path: PathBuf) {
        let Some(container) = self.container else {
            return;
        };
        let job = match self.session.crop_job(container) {
            Ok(job) => job,
            Err(e) => {
                self.status = e.to_string();
                return;
            }
        };

        match serialization::export_job(&job, &path) {
            Ok(()) => log::info!("Exported crop settings to {}", path.display()),
            Err(e) => {
                log::error!("Failed to export crop settings: {}", e);
                self.status = format!("Failed to save settings: {}", e);
            }
        }
    }

    /// Load crop settings from a file and apply them to the current video.
    fn import_settings(&mut self, path: PathBuf) {
        let job = match serialization::import_job(&path) {
            Ok(job) => job,
            Err(e) => {
                log::error!("Failed to import crop settings: {}", e);
                self.status = format!("Failed to load settings: {}", e);
                return;
            }
        };

        if !self.session.matches_source(&job) {
            log::warn!(
                "Settings were saved for a {}x{} video",
                job.native_width,
                job.native_height
            );
        }

        match self.session.apply_region(job.selection) {
            Ok(()) => {
                log::info!("Applied crop settings from {}", path.display());
                self.status = "Crop settings applied.".to_string();
            }
            Err(e) => self.status = e.to_string(),
        }
    }

    /// Start over, as a page reload would.
    fn start_over(&mut self) {
        self.session.reset();
        self.preview_texture = None;
        self.status = "Open a video to begin.".to_string();
    }

    fn poll_background(&mut self, ctx: &egui::Context) {
        // Check for completed video loading
        if let Some(ref receiver) = self.source_loader {
            if let Ok(result) = receiver.try_recv() {
                self.source_loader = None;
                self.loading_message = None;

                match result {
                    Ok(loaded) => {
                        match self.session.load_source(loaded.path, loaded.native) {
                            Ok(()) => {
                                self.preview_texture = loaded.frame.map(|frame| {
                                    let size = [frame.width as usize, frame.height as usize];
                                    let color_image =
                                        egui::ColorImage::from_rgba_unmultiplied(size, &frame.pixels);
                                    ctx.load_texture("preview_frame", color_image, egui::TextureOptions::LINEAR)
                                });
                                self.status = "Video loaded. Drag the box to crop.".to_string();
                            }
                            Err(e) => self.status = e.to_string(),
                        }
                    }
                    Err(e) => {
                        log::error!("{}", e);
                        self.status = e;
                    }
                }
            }
        }

        if let Some(ref receiver) = self.export_result {
            if let Some(result) = poll_export(receiver) {
                self.export_result = None;
                match self.session.complete_export(result) {
                    Ok(video) => self.save_output(video),
                    Err(e) if e.is_retryable() => {
                        self.status = format!("Processing failed: {}. You can try again.", e)
                    }
                    Err(e) => self.status = format!("Processing failed: {}", e),
                }
            }
        }

        // Request repaint while waiting (to update spinner)
        if self.loading_message.is_some() || self.export_result.is_some() {
            ctx.request_repaint();
        }
    }
}

impl eframe::App for VidcropApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_background(ctx);

        let busy = self.loading_message.is_some() || self.session.is_export_in_flight();

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.add_enabled(!busy, egui::Button::new("Open Video...")).clicked() {
                        // Open native file picker
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Videos", &["mp4", "mov", "mkv", "webm", "avi", "m4v"])
                            .pick_file()
                        {
                            self.load_video_file(path);
                        }
                        ui.close_menu();
                    }
                    if ui.button("Load Crop Settings...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Crop settings", &["yaml", "yml", "json"])
                            .pick_file()
                        {
                            self.import_settings(path);
                        }
                        ui.close_menu();
                    }
                    ui.menu_button("Save Crop Settings", |ui| {
                        if ui.button("Save as YAML...").clicked() {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter("YAML", &["yaml", "yml"])
                                .set_file_name("crop.yaml")
                                .save_file()
                            {
                                self.export_settings(path);
                            }
                            ui.close_menu();
                        }
                        if ui.button("Save as JSON...").clicked() {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter("JSON", &["json"])
                                .set_file_name("crop.json")
                                .save_file()
                            {
                                self.export_settings(path);
                            }
                            ui.close_menu();
                        }
                    });
                    ui.separator();
                    if ui.add_enabled(!busy, egui::Button::new("Start Over")).clicked() {
                        self.start_over();
                        ui.close_menu();
                    }
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        // Toolbar
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| toolbar::show(ui, &self.session, &self.status))
            .inner;

        match toolbar_action {
            toolbar::ToolbarAction::OpenVideo => {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Videos", &["mp4", "mov", "mkv", "webm", "avi", "m4v"])
                    .pick_file()
                {
                    self.load_video_file(path);
                }
            }
            toolbar::ToolbarAction::Export => self.start_export(),
            toolbar::ToolbarAction::StartOver => self.start_over(),
            toolbar::ToolbarAction::None => {}
        }

        // Properties panel (right side)
        egui::SidePanel::right("properties")
            .default_width(220.0)
            .show(ctx, |ui| properties::show(ui, &self.session, self.container));

        // Escape aborts the active gesture
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            if let Some(container) = self.container {
                let _ = self.session.handle_pointer(PointerEvent::Cancel, container);
            }
        }

        // Main canvas (center)
        let handle_size = self.config.selection.handle_size_px as f32;
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(ref message) = self.loading_message {
                // Show loading overlay
                ui.centered_and_justified(|ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(20.0);
                        ui.spinner();
                        ui.add_space(10.0);
                        ui.label(
                            egui::RichText::new(message)
                                .size(16.0)
                                .color(egui::Color32::from_gray(200)),
                        );
                    });
                });
            } else {
                let response = canvas::show(ui, &mut self.session, &self.preview_texture, handle_size);
                self.container = Some(response.container);
                if let Some(notice) = response.notice {
                    self.status = notice;
                }
            }
        });
    }
}
