// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Crop selection stored as fractions of the container.
//!
//! Fractional storage survives container resizing without re-deriving the
//! box from pixel history. No clamping happens here; callers pass geometry
//! that is already valid.

use crate::util::geometry::{BoxGeometry, ContainerFrame};
use serde::{Deserialize, Serialize};

/// The crop box as fractions of the container, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionRegion {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for SelectionRegion {
    /// 10% inset from each edge, spanning 80% of both axes.
    fn default() -> Self {
        Self {
            left: 0.1,
            top: 0.1,
            width: 0.8,
            height: 0.8,
        }
    }
}

impl SelectionRegion {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// Reseed the region, used once per source load.
    pub fn reset(&mut self, left: f64, top: f64, width: f64, height: f64) {
        *self = Self::new(left, top, width, height);
    }

    /// Denormalize against the current container size.
    pub fn to_absolute(&self, container: ContainerFrame) -> BoxGeometry {
        BoxGeometry {
            x: self.left * container.width,
            y: self.top * container.height,
            width: self.width * container.width,
            height: self.height * container.height,
        }
    }

    /// Normalize pixel geometry back into fractional form.
    ///
    /// Empty containers carry no information, so the region is left as-is.
    pub fn from_absolute(&mut self, container: ContainerFrame, geometry: BoxGeometry) {
        if container.is_empty() {
            log::warn!("Ignoring selection update against an empty container");
            return;
        }
        self.left = geometry.x / container.width;
        self.top = geometry.y / container.height;
        self.width = geometry.width / container.width;
        self.height = geometry.height / container.height;
    }

    /// Check the fractional invariants, e.g. for regions read from disk.
    pub fn is_valid(&self) -> bool {
        const EPS: f64 = 1e-9;
        let fields = [self.left, self.top, self.width, self.height];
        fields.iter().all(|v| v.is_finite() && (0.0..=1.0).contains(v))
            && self.width > 0.0
            && self.height > 0.0
            && self.left + self.width <= 1.0 + EPS
            && self.top + self.height <= 1.0 + EPS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_region_in_16_9_container() {
        let abs = SelectionRegion::default().to_absolute(ContainerFrame::new(800.0, 450.0));
        assert!((abs.x - 80.0).abs() < 1e-9);
        assert!((abs.y - 45.0).abs() < 1e-9);
        assert!((abs.width - 640.0).abs() < 1e-9);
        assert!((abs.height - 360.0).abs() < 1e-9);
    }

    #[test]
    fn test_region_follows_container_resize() {
        let mut region = SelectionRegion::default();
        region.from_absolute(
            ContainerFrame::new(400.0, 400.0),
            BoxGeometry::new(100.0, 200.0, 100.0, 50.0),
        );

        let abs = region.to_absolute(ContainerFrame::new(800.0, 600.0));
        assert_eq!(abs, BoxGeometry::new(200.0, 300.0, 200.0, 75.0));
    }

    #[test]
    fn test_empty_container_is_ignored() {
        let mut region = SelectionRegion::default();
        region.from_absolute(ContainerFrame::new(0.0, 0.0), BoxGeometry::new(1.0, 1.0, 1.0, 1.0));
        assert_eq!(region, SelectionRegion::default());
    }

    #[test]
    fn test_reset_and_validity() {
        let mut region = SelectionRegion::new(0.5, 0.5, 0.6, 0.2);
        assert!(!region.is_valid());

        region.reset(0.25, 0.25, 0.5, 0.5);
        assert!(region.is_valid());
        assert!(!SelectionRegion::new(0.0, 0.0, 0.0, 0.5).is_valid());
        assert!(!SelectionRegion::new(f64::NAN, 0.0, 0.5, 0.5).is_valid());
    }

    proptest! {
        #[test]
        fn absolute_round_trip_is_stable(
            left in 0.0f64..1.0,
            top in 0.0f64..1.0,
            w in 0.01f64..1.0,
            h in 0.01f64..1.0,
            cw in 100.0f64..4000.0,
            ch in 100.0f64..4000.0,
        ) {
            let region = SelectionRegion::new(left * (1.0 - w), top * (1.0 - h), w, h);
            let container = ContainerFrame::new(cw, ch);

            let mut round_tripped = region;
            round_tripped.from_absolute(container, region.to_absolute(container));
            prop_assert!((round_tripped.left - region.left).abs() < 1e-12);
            prop_assert!((round_tripped.top - region.top).abs() < 1e-12);
            prop_assert!((round_tripped.width - region.width).abs() < 1e-12);
            prop_assert!((round_tripped.height - region.height).abs() < 1e-12);

            // A second pass changes nothing further
            let mut again = round_tripped;
            again.from_absolute(container, round_tripped.to_absolute(container));
            prop_assert!((again.left - round_tripped.left).abs() < 1e-12);
            prop_assert!((again.width - round_tripped.width).abs() < 1e-12);
        }
    }
}
