// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Crop settings serialization and deserialization.
//!
//! This module handles exporting and importing crop jobs in YAML and JSON
//! formats, picked by file extension.

use crate::error::{CropError, CropResult};
use crate::models::project::CropJob;
use std::path::Path;

enum Format {
    Yaml,
    Json,
}

fn format_of(path: &Path) -> CropResult<Format> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => Ok(Format::Yaml),
        Some("json") => Ok(Format::Json),
        other => Err(CropError::InvalidSettings(format!(
            "unsupported file extension: {:?}",
            other
        ))),
    }
}

/// Write a crop job as YAML (`.yaml`/`.yml`) or pretty JSON (`.json`).
pub fn export_job(job: &CropJob, path: &Path) -> CropResult<()> {
    let text = match format_of(path)? {
        Format::Yaml => serde_yaml::to_string(job)?,
        Format::Json => serde_json::to_string_pretty(job)?,
    };
    std::fs::write(path, text)?;
    log::debug!("Wrote crop job for {} to {}", job.source_file, path.display());
    Ok(())
}

/// Read a crop job back. The stored region must satisfy the fraction
/// invariants before it is handed to a session.
pub fn import_job(path: &Path) -> CropResult<CropJob> {
    let format = format_of(path)?;
    let text = std::fs::read_to_string(path)?;
    let job: CropJob = match format {
        Format::Yaml => serde_yaml::from_str(&text)?,
        Format::Json => serde_json::from_str(&text)?,
    };
    if !job.selection.is_valid() {
        return Err(CropError::InvalidSettings(format!(
            "stored region {:?} is outside the frame",
            job.selection
        )));
    }
    Ok(job)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::selection::SelectionRegion;
    use crate::util::crop::CropRect;
    use crate::util::geometry::NativeResolution;

    fn job() -> CropJob {
        CropJob::new(
            "/videos/input.mp4".to_string(),
            NativeResolution::new(1920, 1080),
            SelectionRegion::new(0.25, 0.125, 0.5, 0.5),
            CropRect { x: 480, y: 135, width: 960, height: 540 },
        )
    }

    #[test]
    fn test_yaml_and_json_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["job.yaml", "job.json"] {
            let path = dir.path().join(name);
            export_job(&job(), &path).unwrap();
            assert_eq!(import_job(&path).unwrap(), job());
        }
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(job()).unwrap();
        assert_eq!(json["crop"]["width"], 960);
        assert_eq!(json["selection"]["left"], 0.25);
        assert_eq!(json["native_height"], 1080);
    }

    #[test]
    fn test_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let err = export_job(&job(), &dir.path().join("job.txt")).unwrap_err();
        assert!(matches!(err, CropError::InvalidSettings(_)));
        let err = import_job(&dir.path().join("job")).unwrap_err();
        assert!(matches!(err, CropError::InvalidSettings(_)));
    }

    #[test]
    fn test_parse_errors_keep_their_format() {
        let dir = tempfile::tempdir().unwrap();

        let json = dir.path().join("broken.json");
        std::fs::write(&json, "{ not json").unwrap();
        assert!(matches!(import_job(&json).unwrap_err(), CropError::Json(_)));

        let yaml = dir.path().join("broken.yaml");
        std::fs::write(&yaml, "selection: [unclosed").unwrap();
        assert!(matches!(import_job(&yaml).unwrap_err(), CropError::Yaml(_)));

        let missing = dir.path().join("missing.yaml");
        assert!(matches!(import_job(&missing).unwrap_err(), CropError::Io(_)));
    }

    #[test]
    fn test_out_of_frame_region_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.json");
        let mut bad = job();
        bad.selection = SelectionRegion::new(0.6, 0.0, 0.6, 0.5);
        std::fs::write(&path, serde_json::to_string(&bad).unwrap()).unwrap();
        assert!(matches!(import_job(&path).unwrap_err(), CropError::InvalidSettings(_)));
    }
}
