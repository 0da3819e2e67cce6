// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! A single crop session.
//!
//! Owns the loaded source, the selection, the gesture state and the session
//! gate. All mutation happens synchronously on the UI thread; the only
//! asynchronous step is the encoder call, bracketed by
//! [`CropSession::begin_export`] and [`CropSession::complete_export`].

use crate::config::SelectionConfig;
use crate::error::{CropError, CropResult};
use crate::interaction::controller::InteractionController;
use crate::interaction::pointer::{self, PointerEvent, PointerTarget};
use crate::io::encoder::{CropEncoder, CropRequest, EncodedVideo};
use crate::models::gate::{SessionGate, SessionState};
use crate::models::project::CropJob;
use crate::models::selection::SelectionRegion;
use crate::util::crop::{compute_crop_rect, CropRect};
use crate::util::geometry::{
    compute_display_rect, BoxGeometry, ContainerFrame, DisplayRect, NativeResolution, Point,
};
use std::path::PathBuf;

/// A video selected for cropping.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoSource {
    pub path: PathBuf,
    pub native: NativeResolution,
}

pub struct CropSession {
    config: SelectionConfig,
    gate: SessionGate,
    source: Option<VideoSource>,
    selection: SelectionRegion,
    controller: InteractionController,
    export_in_flight: bool,
}

impl CropSession {
    pub fn new(config: SelectionConfig) -> Self {
        Self {
            controller: InteractionController::new(config.min_edge_px),
            selection: config.default_region,
            config,
            gate: SessionGate::new(),
            source: None,
            export_in_flight: false,
        }
    }

    pub fn state(&self) -> SessionState {
        self.gate.state()
    }

    pub fn source(&self) -> Option<&VideoSource> {
        self.source.as_ref()
    }

    pub fn selection(&self) -> SelectionRegion {
        self.selection
    }

    pub fn is_export_in_flight(&self) -> bool {
        self.export_in_flight
    }

    pub fn is_gesture_active(&self) -> bool {
        self.controller.is_active()
    }

    /// Whether the export trigger should be enabled.
    pub fn can_export(&self) -> bool {
        self.gate.allows_export() && !self.export_in_flight && self.source.is_some()
    }

    /// Source metadata is known: seed the default region and allow editing.
    pub fn load_source(&mut self, path: PathBuf, native: NativeResolution) -> CropResult<()> {
        if !native.is_known() {
            return Err(CropError::NotReady);
        }
        if !self.gate.source_ready() {
            log::warn!("Refusing to load {} into a locked session", path.display());
            return Err(CropError::Locked);
        }

        let region = self.config.default_region;
        self.selection
            .reset(region.left, region.top, region.width, region.height);
        self.controller.reset();
        log::info!(
            "Loaded {} ({}x{})",
            path.display(),
            native.width,
            native.height
        );
        self.source = Some(VideoSource { path, native });
        Ok(())
    }

    /// Letterboxed display area; zero-size until a source is loaded.
    pub fn display_rect(&self, container: ContainerFrame) -> DisplayRect {
        match &self.source {
            Some(source) => compute_display_rect(container, source.native),
            None => DisplayRect::default(),
        }
    }

    /// The selection in container pixels, or `None` when nothing should be drawn.
    pub fn selection_box(&self, container: ContainerFrame) -> Option<BoxGeometry> {
        if self.source.is_none() || self.display_rect(container).is_degenerate() {
            return None;
        }
        Some(self.selection.to_absolute(container))
    }

    /// Resolve what a pointer-down at `at` would grab.
    pub fn hit_test(&self, container: ContainerFrame, at: Point) -> Option<PointerTarget> {
        let selection = self.selection_box(container)?;
        pointer::hit_test(&selection, at, self.config.handle_size_px)
    }

    /// Feed one pointer event through the interaction state machine.
    pub fn handle_pointer(&mut self, event: PointerEvent, container: ContainerFrame) -> CropResult<bool> {
        if matches!(event, PointerEvent::Down { .. }) && self.source.is_none() {
            return Err(CropError::NotReady);
        }
        self.controller
            .handle_event(event, &self.gate, &mut self.selection, container)
    }

    /// The crop rectangle the current selection maps to.
    pub fn crop_rect(&self, container: ContainerFrame) -> CropResult<CropRect> {
        let source = self.source.as_ref().ok_or(CropError::NotReady)?;
        compute_crop_rect(
            self.display_rect(container),
            source.native,
            self.selection.to_absolute(container),
        )
    }

    /// Validate and prepare an export. Marks the export as in flight.
    pub fn begin_export(&mut self, container: ContainerFrame) -> CropResult<CropRequest> {
        match self.gate.state() {
            SessionState::Locked => {
                log::warn!("Export rejected, session is locked");
                return Err(CropError::Locked);
            }
            SessionState::AwaitingSource => {
                log::warn!("Export rejected, no video loaded");
                return Err(CropError::NotReady);
            }
            SessionState::Editable => {}
        }
        if self.export_in_flight {
            log::warn!("Export rejected, one is already running");
            return Err(CropError::ExportInFlight);
        }

        let crop = self.crop_rect(container)?;
        let source = self.source.as_ref().ok_or(CropError::NotReady)?;
        self.export_in_flight = true;
        log::info!(
            "Exporting {} with crop {}x{}+{}+{}",
            source.path.display(),
            crop.width,
            crop.height,
            crop.x,
            crop.y
        );
        Ok(CropRequest {
            source: source.path.clone(),
            crop,
        })
    }

    /// Record the encoder's answer. Success locks the session; failure
    /// leaves it editable so the user can retry.
    pub fn complete_export(&mut self, result: CropResult<EncodedVideo>) -> CropResult<EncodedVideo> {
        self.export_in_flight = false;
        match result {
            Ok(video) => {
                self.controller.reset();
                self.gate.export_succeeded();
                log::info!("Export finished ({} bytes), session locked", video.bytes.len());
                Ok(video)
            }
            Err(e) => {
                log::error!("Export failed: {}", e);
                Err(e)
            }
        }
    }

    /// Run a whole export synchronously against `encoder`.
    pub fn export(
        &mut self,
        container: ContainerFrame,
        encoder: &dyn CropEncoder,
    ) -> CropResult<EncodedVideo> {
        let request = self.begin_export(container)?;
        let result = encoder.encode(&request);
        self.complete_export(result)
    }

    /// Snapshot the current settings for saving.
    pub fn crop_job(&self, container: ContainerFrame) -> CropResult<CropJob> {
        let source = self.source.as_ref().ok_or(CropError::NotReady)?;
        let crop = self.crop_rect(container)?;
        Ok(CropJob::new(
            source.path.to_string_lossy().to_string(),
            source.native,
            self.selection,
            crop,
        ))
    }

    /// Apply a saved selection to the loaded video.
    pub fn apply_region(&mut self, region: SelectionRegion) -> CropResult<()> {
        match self.gate.state() {
            SessionState::Editable => {}
            SessionState::AwaitingSource => return Err(CropError::NotReady),
            SessionState::Locked => return Err(CropError::Locked),
        }
        if self.controller.is_active() {
            return Err(CropError::InvalidSettings(
                "cannot replace the selection during a drag".to_string(),
            ));
        }
        if !region.is_valid() {
            return Err(CropError::InvalidSettings(format!(
                "region {:?} does not fit in the frame",
                region
            )));
        }
        self.selection = region;
        Ok(())
    }

    /// Whether `job` was saved for a video of the loaded size.
    pub fn matches_source(&self, job: &CropJob) -> bool {
        self.source
            .as_ref()
            .is_some_and(|s| s.native == job.native())
    }

    /// Start over, as if the app had been relaunched.
    pub fn reset(&mut self) {
        self.gate.reset();
        self.controller.reset();
        self.source = None;
        self.export_in_flight = false;
        self.selection = self.config.default_region;
        log::info!("Session reset");
    }
}
