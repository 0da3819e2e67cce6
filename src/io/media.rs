// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Video source loading.
//!
//! Native resolution comes from ffprobe; the preview shown under the crop
//! box is the first frame, extracted by ffmpeg as PNG and decoded for egui.

use crate::util::geometry::NativeResolution;
use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

/// A decoded RGBA preview frame.
pub struct LoadedFrame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Read the native resolution of the first video stream.
pub fn probe_resolution(ffprobe_path: &str, video_path: &Path) -> Result<NativeResolution> {
    let output = Command::new(ffprobe_path)
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_streams",
            "-select_streams",
            "v:0",
        ])
        .arg(video_path)
        .output()
        .with_context(|| format!("Failed to run {}", ffprobe_path))?;

    if !output.status.success() {
        anyhow::bail!("ffprobe failed: {}", String::from_utf8_lossy(&output.stderr));
    }

    parse_probe_output(&String::from_utf8_lossy(&output.stdout))
}

/// Extract width and height from ffprobe's JSON stream listing.
pub fn parse_probe_output(json: &str) -> Result<NativeResolution> {
    let json: serde_json::Value =
        serde_json::from_str(json).context("Failed to parse ffprobe output")?;

    let stream = json["streams"]
        .as_array()
        .and_then(|s| s.first())
        .context("No video stream found")?;

    let width = stream["width"].as_u64().context("Missing width")?;
    let height = stream["height"].as_u64().context("Missing height")?;

    let native = NativeResolution::new(
        u32::try_from(width).context("Width out of range")?,
        u32::try_from(height).context("Height out of range")?,
    );
    if !native.is_known() {
        anyhow::bail!("Video reports a zero dimension ({}x{})", width, height);
    }
    Ok(native)
}

/// Grab the first frame of a video as RGBA.
pub fn extract_preview_frame(ffmpeg_path: &str, video_path: &Path) -> Result<LoadedFrame> {
    let output = Command::new(ffmpeg_path)
        .arg("-i")
        .arg(video_path)
        .args(["-frames:v", "1", "-f", "image2pipe", "-vcodec", "png", "-"])
        .output()
        .with_context(|| format!("Failed to run {}", ffmpeg_path))?;

    if !output.status.success() {
        anyhow::bail!("ffmpeg failed: {}", String::from_utf8_lossy(&output.stderr));
    }

    let img = image::load_from_memory(&output.stdout).context("Failed to decode preview frame")?;
    let rgba = img.to_rgba8();

    Ok(LoadedFrame {
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_probe_output() {
        let json = r#"{"streams": [{"index": 0, "codec_type": "video", "width": 1920, "height": 1080}]}"#;
        assert_eq!(parse_probe_output(json).unwrap(), NativeResolution::new(1920, 1080));
    }

    #[test]
    fn test_parse_probe_output_rejects_missing_stream() {
        assert!(parse_probe_output(r#"{"streams": []}"#).is_err());
        assert!(parse_probe_output(r#"{"streams": [{"width": 0, "height": 720}]}"#).is_err());
        assert!(parse_probe_output("not json").is_err());
    }
}
