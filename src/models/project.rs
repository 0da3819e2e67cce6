// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Saved crop settings.
//!
//! A crop job records which source was cropped, its native size, the
//! resolution-independent selection and the pixel rectangle derived from it.

use super::selection::SelectionRegion;
use crate::util::crop::CropRect;
use crate::util::geometry::NativeResolution;
use serde::{Deserialize, Serialize};

/// Complete crop settings for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropJob {
    pub source_file: String,
    pub native_width: u32,
    pub native_height: u32,
    pub selection: SelectionRegion,
    pub crop: CropRect,
}

impl CropJob {
    /// Create a crop job for the given source.
    pub fn new(
        source_file: String,
        native: NativeResolution,
        selection: SelectionRegion,
        crop: CropRect,
    ) -> Self {
        Self {
            source_file,
            native_width: native.width,
            native_height: native.height,
            selection,
            crop,
        }
    }

    pub fn native(&self) -> NativeResolution {
        NativeResolution::new(self.native_width, self.native_height)
    }
}
