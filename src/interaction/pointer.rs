// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Pointer input, independent of whether it comes from a mouse or a touch.

use crate::util::geometry::{BoxGeometry, Point};

/// One of the four corner handles of the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Handle {
    pub const ALL: [Handle; 4] = [
        Handle::TopLeft,
        Handle::TopRight,
        Handle::BottomLeft,
        Handle::BottomRight,
    ];

    /// Whether dragging this handle moves the left edge (otherwise the right).
    pub fn moves_left_edge(self) -> bool {
        matches!(self, Handle::TopLeft | Handle::BottomLeft)
    }

    /// Whether dragging this handle moves the top edge (otherwise the bottom).
    pub fn moves_top_edge(self) -> bool {
        matches!(self, Handle::TopLeft | Handle::TopRight)
    }

    /// The corner that stays pinned while this handle is dragged.
    pub fn opposite(self) -> Handle {
        match self {
            Handle::TopLeft => Handle::BottomRight,
            Handle::TopRight => Handle::BottomLeft,
            Handle::BottomLeft => Handle::TopRight,
            Handle::BottomRight => Handle::TopLeft,
        }
    }

    /// Position of this corner on a box.
    pub fn corner_of(self, geometry: &BoxGeometry) -> Point {
        let x = if self.moves_left_edge() { geometry.x } else { geometry.right() };
        let y = if self.moves_top_edge() { geometry.y } else { geometry.bottom() };
        Point::new(x, y)
    }
}

/// What a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Body,
    Handle(Handle),
}

/// Pointer events in container-relative coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { target: PointerTarget, at: Point },
    Move { at: Point },
    Up,
    Cancel,
}

/// Coordinate extraction shared by every input source.
pub trait PointerInput {
    /// Screen position of the primary contact, if one is active.
    fn primary_position(&self) -> Option<Point>;

    /// Position relative to a container whose top-left is at `origin`.
    fn container_position(&self, origin: Point) -> Option<Point> {
        self.primary_position()
            .map(|p| Point::new(p.x - origin.x, p.y - origin.y))
    }
}

/// Mouse or pen input: a single cursor.
#[derive(Debug, Clone, Copy)]
pub struct MouseInput {
    pub position: Point,
}

impl PointerInput for MouseInput {
    fn primary_position(&self) -> Option<Point> {
        Some(self.position)
    }
}

/// Touch input: the first active contact drives the gesture.
#[derive(Debug, Clone, Default)]
pub struct TouchInput {
    pub contacts: Vec<Point>,
}

impl PointerInput for TouchInput {
    fn primary_position(&self) -> Option<Point> {
        self.contacts.first().copied()
    }
}

/// Decide whether `at` grabs a handle, the body, or nothing.
///
/// Handles are squares of `handle_size` centered on each corner and take
/// precedence over the body.
pub fn hit_test(selection: &BoxGeometry, at: Point, handle_size: f64) -> Option<PointerTarget> {
    let half = handle_size / 2.0;
    for handle in Handle::ALL {
        let corner = handle.corner_of(selection);
        if (at.x - corner.x).abs() <= half && (at.y - corner.y).abs() <= half {
            return Some(PointerTarget::Handle(handle));
        }
    }

    if selection.contains(at) {
        Some(PointerTarget::Body)
    } else {
        None
    }
}
