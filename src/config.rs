// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application configuration.
//!
//! Read from the YAML file named by `VIDCROP_CONFIG`, else `vidcrop.yaml` in
//! the working directory. Missing fields fall back to their defaults.

use crate::interaction::controller::DEFAULT_MIN_EDGE;
use crate::models::selection::SelectionRegion;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "VIDCROP_CONFIG";
pub const CONFIG_FILE: &str = "vidcrop.yaml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub selection: SelectionConfig,
    pub encoder: EncoderConfig,
    pub window: WindowConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Smallest edge of the crop box in container pixels
    pub min_edge_px: f64,
    /// Region seeded when a video loads
    pub default_region: SelectionRegion,
    /// Side of the square corner handles
    pub handle_size_px: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            min_edge_px: DEFAULT_MIN_EDGE,
            default_region: SelectionRegion::default(),
            handle_size_px: 12.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub video_codec: String,
    pub audio_codec: String,
    /// Save-dialog name used when the encoder suggests none
    pub fallback_file_name: String,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
            video_codec: "libx264".to_string(),
            audio_codec: "copy".to_string(),
            fallback_file_name: "cropped_video.mp4".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl AppConfig {
    /// Parse a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: AppConfig = serde_yaml::from_str(&yaml)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load the configuration, falling back to defaults when no file exists
    /// or the file is unusable.
    pub fn load() -> Self {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));

        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::from_file(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::error!("{:#}, using defaults", e);
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<()> {
        let min_edge = self.selection.min_edge_px;
        if min_edge.is_nan() || min_edge < 1.0 {
            anyhow::bail!("selection.min_edge_px must be at least 1");
        }
        if !self.selection.default_region.is_valid() {
            anyhow::bail!("selection.default_region is outside the container");
        }
        Ok(())
    }
}
