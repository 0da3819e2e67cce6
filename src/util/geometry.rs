// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric types and the letterbox transform.
//!
//! Three coordinate spaces are in play: the container viewport hosting the
//! video, the letterboxed display area inside it that actually shows video
//! content, and the video's native pixel grid.

use serde::{Deserialize, Serialize};

/// A 2D point in container pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector from `origin` to `self`.
    pub fn delta_from(&self, origin: Point) -> (f64, f64) {
        (self.x - origin.x, self.y - origin.y)
    }
}

/// Size of the viewport hosting the video, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContainerFrame {
    pub width: f64,
    pub height: f64,
}

impl ContainerFrame {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A container with no area cannot host a selection.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Native resolution of the loaded video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeResolution {
    pub width: u32,
    pub height: u32,
}

impl NativeResolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Metadata is only usable once both dimensions are known.
    pub fn is_known(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

/// The letterboxed sub-rectangle of the container that shows video content.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DisplayRect {
    pub width: f64,
    pub height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl DisplayRect {
    /// Zero-size rects mean "not ready": nothing should be rendered or exported.
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Axis-aligned box in container pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoxGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoxGeometry {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Inclusive hit test.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }
}

/// Compute where the video actually lands inside its container.
///
/// The video is fitted to the container while preserving its aspect ratio
/// and centered on the axis it does not fill. Unknown metadata or an empty
/// container yields a zero rect at the origin.
pub fn compute_display_rect(container: ContainerFrame, native: NativeResolution) -> DisplayRect {
    if !native.is_known() || container.is_empty() {
        return DisplayRect::default();
    }

    let native_ratio = native.aspect_ratio();
    let container_ratio = container.width / container.height;

    if native_ratio > container_ratio {
        // Video is wider - fit to width
        let height = container.width / native_ratio;
        DisplayRect {
            width: container.width,
            height,
            offset_x: 0.0,
            offset_y: (container.height - height) / 2.0,
        }
    } else {
        // Video is taller - fit to height
        let width = container.height * native_ratio;
        DisplayRect {
            width,
            height: container.height,
            offset_x: (container.width - width) / 2.0,
            offset_y: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_same_ratio_fills_container() {
        let rect = compute_display_rect(
            ContainerFrame::new(800.0, 450.0),
            NativeResolution::new(1920, 1080),
        );
        assert_eq!(rect.width, 800.0);
        assert!((rect.height - 450.0).abs() < 1e-9);
        assert_eq!(rect.offset_x, 0.0);
        assert!(rect.offset_y.abs() < 1e-9);
    }

    #[test]
    fn test_wide_video_in_square_container() {
        let rect = compute_display_rect(
            ContainerFrame::new(800.0, 800.0),
            NativeResolution::new(1920, 1080),
        );
        assert_eq!(rect.width, 800.0);
        assert!((rect.height - 450.0).abs() < 1e-9);
        assert_eq!(rect.offset_x, 0.0);
        assert!((rect.offset_y - 175.0).abs() < 1e-9);
    }

    #[test]
    fn test_tall_video_is_pillarboxed() {
        let rect = compute_display_rect(
            ContainerFrame::new(800.0, 450.0),
            NativeResolution::new(1080, 1920),
        );
        assert_eq!(rect.height, 450.0);
        assert!((rect.width - 253.125).abs() < 1e-9);
        assert!((rect.offset_x - 273.4375).abs() < 1e-9);
        assert_eq!(rect.offset_y, 0.0);
    }

    #[test]
    fn test_unknown_metadata_is_degenerate() {
        let rect = compute_display_rect(
            ContainerFrame::new(800.0, 450.0),
            NativeResolution::new(0, 0),
        );
        assert!(rect.is_degenerate());
        assert_eq!(rect, DisplayRect::default());

        let rect = compute_display_rect(
            ContainerFrame::new(0.0, 450.0),
            NativeResolution::new(1920, 1080),
        );
        assert!(rect.is_degenerate());
    }

    proptest! {
        #[test]
        fn display_rect_is_contained_and_keeps_ratio(
            cw in 1.0f64..4000.0,
            ch in 1.0f64..4000.0,
            nw in 1u32..8000,
            nh in 1u32..8000,
        ) {
            let container = ContainerFrame::new(cw, ch);
            let native = NativeResolution::new(nw, nh);
            let rect = compute_display_rect(container, native);
            let eps = 1e-6 * cw.max(ch);

            prop_assert!(rect.offset_x >= -eps && rect.offset_y >= -eps);
            prop_assert!(rect.offset_x + rect.width <= cw + eps);
            prop_assert!(rect.offset_y + rect.height <= ch + eps);

            let ratio = rect.width / rect.height;
            prop_assert!((ratio - native.aspect_ratio()).abs() <= 1e-6 * native.aspect_ratio());

            // Centered on the axis that is not filled
            prop_assert!((rect.offset_x * 2.0 + rect.width - cw).abs() <= eps);
            prop_assert!((rect.offset_y * 2.0 + rect.height - ch).abs() <= eps);
        }
    }
}
