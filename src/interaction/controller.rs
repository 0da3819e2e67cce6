// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Pointer-driven state machine that moves and resizes the selection.
//!
//! Transition table:
//!
//! | state                | event              | next                 |
//! |----------------------|--------------------|----------------------|
//! | Idle                 | Down on body       | Translating          |
//! | Idle                 | Down on handle `h` | Resizing(`h`)        |
//! | Translating/Resizing | Down               | unchanged (ignored)  |
//! | Translating/Resizing | Move               | unchanged, box moves |
//! | Translating/Resizing | Up                 | Idle, geometry kept  |
//! | Translating/Resizing | Cancel             | Idle, geometry reverted |
//!
//! Every Down is refused while the session gate is not editable.

use super::pointer::{Handle, PointerEvent, PointerTarget};
use crate::error::{CropError, CropResult};
use crate::models::gate::{SessionGate, SessionState};
use crate::models::selection::SelectionRegion;
use crate::util::geometry::{BoxGeometry, ContainerFrame, Point};

/// Smallest edge length of the selection, in container pixels.
pub const DEFAULT_MIN_EDGE: f64 = 50.0;

/// Reference frame captured when a gesture starts.
///
/// The starting box is kept as fractions so that a container resize in the
/// middle of a gesture re-projects it instead of distorting it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gesture {
    /// Pointer position at gesture start
    pub anchor: Point,
    /// Selection at gesture start, also restored on cancel
    pub snapshot: SelectionRegion,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Translating(Gesture),
    Resizing(Handle, Gesture),
}

impl InteractionState {
    fn gesture(&self) -> Option<&Gesture> {
        match self {
            InteractionState::Idle => None,
            InteractionState::Translating(g) | InteractionState::Resizing(_, g) => Some(g),
        }
    }
}

/// Move the reference box by `delta`, keeping it inside the container.
pub fn translate(reference: BoxGeometry, delta: (f64, f64), container: ContainerFrame) -> BoxGeometry {
    let max_x = (container.width - reference.width).max(0.0);
    let max_y = (container.height - reference.height).max(0.0);
    BoxGeometry {
        x: (reference.x + delta.0).min(max_x).max(0.0),
        y: (reference.y + delta.1).min(max_y).max(0.0),
        ..reference
    }
}

/// Resize one axis. The edge opposite the moving one stays pinned.
///
/// The floor is capped by the room between the pinned edge and the
/// container boundary, so containment wins over the minimum edge length.
fn resize_axis(
    start: f64,
    length: f64,
    delta: f64,
    moves_low_edge: bool,
    extent: f64,
    min_edge: f64,
) -> (f64, f64) {
    if moves_low_edge {
        let pinned = start + length;
        let floor = min_edge.min(pinned.max(0.0));
        let mut length = (length - delta).max(floor);
        let mut origin = pinned - length;
        if origin < 0.0 {
            length += origin;
            origin = 0.0;
        }
        (origin, length)
    } else {
        let floor = min_edge.min((extent - start).max(0.0));
        let mut length = (length + delta).max(floor);
        if start + length > extent {
            length = extent - start;
        }
        (start, length)
    }
}

/// Resize the reference box by dragging `handle` by `delta`.
pub fn resize(
    handle: Handle,
    reference: BoxGeometry,
    delta: (f64, f64),
    container: ContainerFrame,
    min_edge: f64,
) -> BoxGeometry {
    let (x, width) = resize_axis(
        reference.x,
        reference.width,
        delta.0,
        handle.moves_left_edge(),
        container.width,
        min_edge,
    );
    let (y, height) = resize_axis(
        reference.y,
        reference.height,
        delta.1,
        handle.moves_top_edge(),
        container.height,
        min_edge,
    );
    BoxGeometry { x, y, width, height }
}

/// Owns the gesture state for a single selection.
#[derive(Debug)]
pub struct InteractionController {
    state: InteractionState,
    min_edge: f64,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_EDGE)
    }
}

impl InteractionController {
    pub fn new(min_edge: f64) -> Self {
        Self {
            state: InteractionState::Idle,
            min_edge,
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != InteractionState::Idle
    }

    /// Drive the state machine with one pointer event.
    ///
    /// Returns whether the event changed the state or the selection.
    pub fn handle_event(
        &mut self,
        event: PointerEvent,
        gate: &SessionGate,
        selection: &mut SelectionRegion,
        container: ContainerFrame,
    ) -> CropResult<bool> {
        match event {
            PointerEvent::Down { target, at } => {
                if !gate.allows_interaction() {
                    return Err(match gate.state() {
                        SessionState::Locked => CropError::Locked,
                        _ => CropError::NotReady,
                    });
                }
                if container.is_empty() {
                    return Err(CropError::NotReady);
                }
                Ok(self.pointer_down(target, at, selection, container))
            }
            PointerEvent::Move { at } => Ok(self.pointer_move(at, selection, container).is_some()),
            PointerEvent::Up => Ok(self.pointer_up()),
            PointerEvent::Cancel => Ok(self.pointer_cancel(selection)),
        }
    }

    /// Start a gesture. A down while a gesture is active is ignored.
    pub fn pointer_down(
        &mut self,
        target: PointerTarget,
        at: Point,
        selection: &SelectionRegion,
        container: ContainerFrame,
    ) -> bool {
        if self.is_active() {
            log::debug!("Ignoring pointer down during an active gesture");
            return false;
        }

        let gesture = Gesture {
            anchor: at,
            snapshot: *selection,
        };
        self.state = match target {
            PointerTarget::Body => {
                log::info!("Started moving at ({:.1}, {:.1})", at.x, at.y);
                InteractionState::Translating(gesture)
            }
            PointerTarget::Handle(handle) => {
                log::info!("Started resizing from {:?}, {:?} pinned", handle, handle.opposite());
                InteractionState::Resizing(handle, gesture)
            }
        };
        true
    }

    /// Apply pointer motion to the selection. Returns the new box when a
    /// gesture is active.
    pub fn pointer_move(
        &mut self,
        at: Point,
        selection: &mut SelectionRegion,
        container: ContainerFrame,
    ) -> Option<BoxGeometry> {
        let geometry = match self.state {
            InteractionState::Idle => return None,
            InteractionState::Translating(g) => {
                translate(g.snapshot.to_absolute(container), at.delta_from(g.anchor), container)
            }
            InteractionState::Resizing(handle, g) => resize(
                handle,
                g.snapshot.to_absolute(container),
                at.delta_from(g.anchor),
                container,
                self.min_edge,
            ),
        };

        debug_assert!(geometry.width >= 0.0 && geometry.height >= 0.0);
        selection.from_absolute(container, geometry);
        log::trace!(
            "Selection now ({:.1}, {:.1}) {:.1}x{:.1}",
            geometry.x,
            geometry.y,
            geometry.width,
            geometry.height
        );
        Some(geometry)
    }

    /// Finish the gesture, keeping the current geometry.
    pub fn pointer_up(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.state = InteractionState::Idle;
        log::info!("Gesture finished");
        true
    }

    /// Abort the gesture and restore the selection it started from.
    pub fn pointer_cancel(&mut self, selection: &mut SelectionRegion) -> bool {
        let Some(gesture) = self.state.gesture().copied() else {
            return false;
        };
        *selection = gesture.snapshot;
        self.state = InteractionState::Idle;
        log::info!("Gesture cancelled, selection restored");
        true
    }

    /// Drop any gesture without touching the selection.
    pub fn reset(&mut self) {
        self.state = InteractionState::Idle;
    }
}
