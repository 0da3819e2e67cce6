// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Hand-off of the crop rectangle to an external encoder.

use crate::config::EncoderConfig;
use crate::error::{CropError, CropResult};
use crate::util::crop::CropRect;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

/// What the encoder is asked to do: crop `source` to `crop`.
#[derive(Debug, Clone, PartialEq)]
pub struct CropRequest {
    pub source: PathBuf,
    pub crop: CropRect,
}

/// The encoded result and the name it should be saved under.
#[derive(Debug, Clone)]
pub struct EncodedVideo {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// An encoding service that accepts a crop request.
pub trait CropEncoder: Send + Sync {
    fn encode(&self, request: &CropRequest) -> CropResult<EncodedVideo>;
}

/// Build the ffmpeg crop filter, `crop=w:h:x:y`.
pub fn crop_filter(crop: &CropRect) -> String {
    format!("crop={}:{}:{}:{}", crop.width, crop.height, crop.x, crop.y)
}

/// Encoder backed by the ffmpeg command-line tool.
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    ffmpeg_path: String,
    video_codec: String,
    audio_codec: String,
    work_dir: PathBuf,
}

impl FfmpegEncoder {
    pub fn new(config: &EncoderConfig) -> Self {
        Self {
            ffmpeg_path: config.ffmpeg_path.clone(),
            video_codec: config.video_codec.clone(),
            audio_codec: config.audio_codec.clone(),
            work_dir: std::env::temp_dir(),
        }
    }

    /// Write intermediate output somewhere other than the system temp dir.
    pub fn with_work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = work_dir.into();
        self
    }

    fn output_name() -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        format!("cropped-{}.mp4", millis)
    }

    fn args(&self, source: &Path, crop: &CropRect, output: &Path) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-i".to_string(),
            source.to_string_lossy().to_string(),
            "-vf".to_string(),
            crop_filter(crop),
            "-c:v".to_string(),
            self.video_codec.clone(),
            "-c:a".to_string(),
            self.audio_codec.clone(),
            output.to_string_lossy().to_string(),
        ]
    }
}

impl CropEncoder for FfmpegEncoder {
    fn encode(&self, request: &CropRequest) -> CropResult<EncodedVideo> {
        let file_name = Self::output_name();
        let output_path = self.work_dir.join(&file_name);

        log::info!(
            "Running {} with {} -> {}",
            self.ffmpeg_path,
            crop_filter(&request.crop),
            output_path.display()
        );

        let output = Command::new(&self.ffmpeg_path)
            .args(self.args(&request.source, &request.crop, &output_path))
            .output()
            .map_err(|e| CropError::ExportFailed(format!("failed to run {}: {}", self.ffmpeg_path, e)))?;

        if !output.status.success() {
            let _ = std::fs::remove_file(&output_path);
            let stderr = String::from_utf8_lossy(&output.stderr);
            let tail: Vec<&str> = stderr.lines().rev().take(5).collect();
            let message = tail.into_iter().rev().collect::<Vec<_>>().join("\n");
            return Err(CropError::ExportFailed(if message.is_empty() {
                format!("ffmpeg exited with {}", output.status)
            } else {
                message
            }));
        }

        let bytes = std::fs::read(&output_path)?;
        if let Err(e) = std::fs::remove_file(&output_path) {
            log::warn!("Failed to remove {}: {}", output_path.display(), e);
        }

        Ok(EncodedVideo { file_name, bytes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CropRequest {
        CropRequest {
            source: PathBuf::from("/videos/input.mp4"),
            crop: CropRect { x: 192, y: 108, width: 1536, height: 864 },
        }
    }

    #[test]
    fn test_crop_filter_order_is_width_height_x_y() {
        assert_eq!(crop_filter(&request().crop), "crop=1536:864:192:108");
    }

    #[test]
    fn test_ffmpeg_arguments() {
        let encoder = FfmpegEncoder::new(&EncoderConfig::default());
        let args = encoder.args(
            &request().source,
            &request().crop,
            Path::new("/tmp/cropped-1.mp4"),
        );
        assert_eq!(
            args,
            vec![
                "-y",
                "-i",
                "/videos/input.mp4",
                "-vf",
                "crop=1536:864:192:108",
                "-c:v",
                "libx264",
                "-c:a",
                "copy",
                "/tmp/cropped-1.mp4",
            ]
        );
    }

    #[test]
    fn test_missing_binary_is_export_failure() {
        let config = EncoderConfig {
            ffmpeg_path: "/nonexistent/ffmpeg-binary".to_string(),
            ..EncoderConfig::default()
        };
        let dir = tempfile::tempdir().unwrap();
        let encoder = FfmpegEncoder::new(&config).with_work_dir(dir.path());

        let err = encoder.encode(&request()).unwrap_err();
        assert!(matches!(err, CropError::ExportFailed(_)));
        assert!(err.is_retryable());
    }
}
