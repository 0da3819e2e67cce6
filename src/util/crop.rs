// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Mapping of the on-screen selection into native video pixels.
//!
//! The rectangle produced here is handed to the encoder as-is, so it must
//! always lie fully inside the frame and have positive area.

use super::geometry::{BoxGeometry, DisplayRect, NativeResolution};
use crate::error::{CropError, CropResult};
use serde::{Deserialize, Serialize};

/// Integer crop rectangle in native video pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Clip one axis of a rounded rectangle to `[0, extent)`.
fn clip_axis(origin: i64, length: i64, extent: i64) -> (i64, i64) {
    let (mut origin, mut length) = (origin, length);
    if origin < 0 {
        length += origin;
        origin = 0;
    }
    origin = origin.min(extent - 1);
    if origin + length > extent {
        length = extent - origin;
    }
    (origin, length.max(1))
}

/// Convert a container-relative selection into a crop rectangle.
///
/// Fails with [`CropError::NotReady`] when the display rect is degenerate or
/// the native resolution is unknown.
pub fn compute_crop_rect(
    display: DisplayRect,
    native: NativeResolution,
    selection: BoxGeometry,
) -> CropResult<CropRect> {
    if display.is_degenerate() || !native.is_known() {
        return Err(CropError::NotReady);
    }

    let rel_x = selection.x - display.offset_x;
    let rel_y = selection.y - display.offset_y;

    let scale_x = native.width as f64 / display.width;
    let scale_y = native.height as f64 / display.height;

    let (x, width) = clip_axis(
        (rel_x * scale_x).round() as i64,
        (selection.width * scale_x).round() as i64,
        native.width as i64,
    );
    let (y, height) = clip_axis(
        (rel_y * scale_y).round() as i64,
        (selection.height * scale_y).round() as i64,
        native.height as i64,
    );

    debug_assert!(x + width <= native.width as i64 && y + height <= native.height as i64);

    Ok(CropRect {
        x: x as u32,
        y: y as u32,
        width: width as u32,
        height: height as u32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::geometry::{compute_display_rect, ContainerFrame};
    use proptest::prelude::*;

    fn full_hd() -> NativeResolution {
        NativeResolution::new(1920, 1080)
    }

    #[test]
    fn test_default_selection_maps_to_native() {
        let display = compute_display_rect(ContainerFrame::new(800.0, 450.0), full_hd());
        let crop = compute_crop_rect(display, full_hd(), BoxGeometry::new(80.0, 45.0, 640.0, 360.0))
            .unwrap();
        assert_eq!(crop, CropRect { x: 192, y: 108, width: 1536, height: 864 });
    }

    #[test]
    fn test_selection_over_letterbox_bar_is_clipped() {
        // 175px bars above and below the video
        let display = compute_display_rect(ContainerFrame::new(800.0, 800.0), full_hd());
        let crop = compute_crop_rect(display, full_hd(), BoxGeometry::new(0.0, 100.0, 400.0, 200.0))
            .unwrap();
        assert_eq!(crop.x, 0);
        assert_eq!(crop.y, 0);
        assert_eq!(crop.width, 960);
        // 200px tall box starting 75px above the video: 125px of it is visible
        assert_eq!(crop.height, 300);
    }

    #[test]
    fn test_selection_fully_in_bar_keeps_one_pixel() {
        let display = compute_display_rect(ContainerFrame::new(800.0, 800.0), full_hd());
        let crop = compute_crop_rect(display, full_hd(), BoxGeometry::new(100.0, 700.0, 100.0, 60.0))
            .unwrap();
        assert_eq!(crop.y, 1079);
        assert_eq!(crop.height, 1);
        assert!(crop.x + crop.width <= 1920);
    }

    #[test]
    fn test_not_ready_when_degenerate() {
        let err = compute_crop_rect(
            DisplayRect::default(),
            full_hd(),
            BoxGeometry::new(0.0, 0.0, 10.0, 10.0),
        )
        .unwrap_err();
        assert!(matches!(err, CropError::NotReady));

        let display = compute_display_rect(ContainerFrame::new(800.0, 450.0), full_hd());
        let err = compute_crop_rect(
            display,
            NativeResolution::new(0, 1080),
            BoxGeometry::new(0.0, 0.0, 10.0, 10.0),
        )
        .unwrap_err();
        assert!(matches!(err, CropError::NotReady));
    }

    proptest! {
        #[test]
        fn crop_rect_is_always_inside_frame(
            cw in 50.0f64..3000.0,
            ch in 50.0f64..3000.0,
            nw in 1u32..5000,
            nh in 1u32..5000,
            fx in 0.0f64..1.0,
            fy in 0.0f64..1.0,
            fw in 0.0f64..1.0,
            fh in 0.0f64..1.0,
        ) {
            let container = ContainerFrame::new(cw, ch);
            let native = NativeResolution::new(nw, nh);
            let display = compute_display_rect(container, native);
            let selection = BoxGeometry::new(
                fx * cw,
                fy * ch,
                fw * (1.0 - fx) * cw,
                fh * (1.0 - fy) * ch,
            );

            let crop = compute_crop_rect(display, native, selection).unwrap();
            prop_assert!(crop.width >= 1 && crop.height >= 1);
            prop_assert!(crop.x + crop.width <= nw);
            prop_assert!(crop.y + crop.height <= nh);
        }
    }
}
