// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types for crop sessions.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CropError {
    #[error("no video loaded, open a video first")]
    NotReady,

    #[error("session is locked after a successful export, start over to crop again")]
    Locked,

    #[error("an export is already in progress")]
    ExportInFlight,

    #[error("export failed: {0}")]
    ExportFailed(String),

    #[error("invalid crop settings: {0}")]
    InvalidSettings(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CropError {
    /// Operational failures the user can retry from, as opposed to
    /// requests that were refused by the session state.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ExportFailed(_) | Self::Io(_))
    }
}

pub type CropResult<T> = Result<T, CropError>;
