// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Video canvas with the crop overlay.
//!
//! The canvas is the container viewport. It letterboxes the preview frame,
//! turns raw mouse/touch input into pointer events for the session, and
//! draws the selection with its four corner handles.

use crate::error::CropError;
use crate::interaction::pointer::{Handle, MouseInput, PointerEvent, PointerInput, TouchInput};
use crate::session::CropSession;
use crate::util::geometry::{BoxGeometry, ContainerFrame, DisplayRect, Point};

/// What the canvas measured and anything the user should be told.
pub struct CanvasResponse {
    pub container: ContainerFrame,
    pub notice: Option<String>,
}

fn to_point(pos: egui::Pos2) -> Point {
    Point::new(pos.x as f64, pos.y as f64)
}

fn to_screen(rect: &egui::Rect, geometry: &BoxGeometry) -> egui::Rect {
    egui::Rect::from_min_size(
        rect.min + egui::vec2(geometry.x as f32, geometry.y as f32),
        egui::vec2(geometry.width as f32, geometry.height as f32),
    )
}

fn display_to_screen(rect: &egui::Rect, display: &DisplayRect) -> egui::Rect {
    to_screen(
        rect,
        &BoxGeometry::new(display.offset_x, display.offset_y, display.width, display.height),
    )
}

/// Translate raw egui input into container-relative pointer events.
///
/// Down events are only produced when the canvas owns the pointer
/// (`accepts_press`, false while a popup covers it) and the press lands on
/// the selection. Focus loss cancels the active gesture.
fn collect_events(
    raw: &[egui::Event],
    container_rect: egui::Rect,
    container: ContainerFrame,
    session: &CropSession,
    accepts_press: bool,
) -> Vec<PointerEvent> {
    let origin = to_point(container_rect.min);
    let mut events = Vec::new();

    let push_down = |input: &dyn PointerInput, events: &mut Vec<PointerEvent>| {
        if !accepts_press {
            return;
        }
        let Some(at) = input.container_position(origin) else {
            return;
        };
        let inside = at.x >= 0.0 && at.y >= 0.0 && at.x <= container.width && at.y <= container.height;
        if !inside {
            return;
        }
        if let Some(target) = session.hit_test(container, at) {
            events.push(PointerEvent::Down { target, at });
        }
    };

    for event in raw {
        match event {
            egui::Event::PointerButton {
                pos,
                button: egui::PointerButton::Primary,
                pressed,
                ..
            } => {
                if *pressed {
                    push_down(&MouseInput { position: to_point(*pos) }, &mut events);
                } else {
                    events.push(PointerEvent::Up);
                }
            }
            egui::Event::PointerMoved(pos) => {
                let input = MouseInput { position: to_point(*pos) };
                if let Some(at) = input.container_position(origin) {
                    events.push(PointerEvent::Move { at });
                }
            }
            egui::Event::Touch { phase, pos, .. } => {
                let input = TouchInput { contacts: vec![to_point(*pos)] };
                match phase {
                    egui::TouchPhase::Start => push_down(&input, &mut events),
                    egui::TouchPhase::Move => {
                        if let Some(at) = input.container_position(origin) {
                            events.push(PointerEvent::Move { at });
                        }
                    }
                    egui::TouchPhase::End => events.push(PointerEvent::Up),
                    egui::TouchPhase::Cancel => events.push(PointerEvent::Cancel),
                }
            }
            egui::Event::WindowFocused(false) => events.push(PointerEvent::Cancel),
            _ => {}
        }
    }

    events
}

/// Display the canvas, apply this frame's pointer input, and draw the overlay.
pub fn show(
    ui: &mut egui::Ui,
    session: &mut CropSession,
    texture: &Option<egui::TextureHandle>,
    handle_size: f32,
) -> CanvasResponse {
    // Set background color
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let available_size = ui.available_size();
    let (rect, response) = ui.allocate_exact_size(available_size, egui::Sense::drag());
    let container = ContainerFrame::new(rect.width() as f64, rect.height() as f64);

    let mut notice = None;
    let raw = ui.input(|i| i.events.clone());
    for event in collect_events(&raw, rect, container, session, response.hovered()) {
        match session.handle_pointer(event, container) {
            Ok(true) => ui.ctx().request_repaint(),
            Ok(false) => {}
            Err(CropError::NotReady) => notice = Some("Load a video first.".to_string()),
            Err(e) => log::warn!("Pointer input rejected: {}", e),
        }
    }

    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, egui::Color32::from_gray(40));

    let display = session.display_rect(container);
    if display.is_degenerate() {
        // Show welcome message when no video is loaded
        painter.text(
            rect.center() - egui::vec2(0.0, 20.0),
            egui::Align2::CENTER_CENTER,
            "VIDCROP",
            egui::FontId::proportional(32.0),
            egui::Color32::from_gray(200),
        );
        painter.text(
            rect.center() + egui::vec2(0.0, 20.0),
            egui::Align2::CENTER_CENTER,
            "Open a video to select the region to crop",
            egui::FontId::proportional(14.0),
            egui::Color32::from_gray(150),
        );
        return CanvasResponse { container, notice };
    }

    let video_rect = display_to_screen(&rect, &display);
    match texture {
        Some(texture) => {
            painter.image(
                texture.id(),
                video_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }
        None => {
            painter.rect_filled(video_rect, 0.0, egui::Color32::from_gray(70));
        }
    }

    if let Some(selection) = session.selection_box(container) {
        draw_selection(&painter, &rect, &selection, handle_size);
    }

    CanvasResponse { container, notice }
}

/// Shade everything outside the selection, then draw its outline and handles.
fn draw_selection(
    painter: &egui::Painter,
    container_rect: &egui::Rect,
    selection: &BoxGeometry,
    handle_size: f32,
) {
    let box_rect = to_screen(container_rect, selection);
    let shade = egui::Color32::from_black_alpha(140);

    let bands = [
        egui::Rect::from_min_max(container_rect.min, egui::pos2(container_rect.max.x, box_rect.min.y)),
        egui::Rect::from_min_max(egui::pos2(container_rect.min.x, box_rect.max.y), container_rect.max),
        egui::Rect::from_min_max(
            egui::pos2(container_rect.min.x, box_rect.min.y),
            egui::pos2(box_rect.min.x, box_rect.max.y),
        ),
        egui::Rect::from_min_max(
            egui::pos2(box_rect.max.x, box_rect.min.y),
            egui::pos2(container_rect.max.x, box_rect.max.y),
        ),
    ];
    for band in bands {
        if band.is_positive() {
            painter.rect_filled(band, 0.0, shade);
        }
    }

    painter.rect_stroke(box_rect, 0.0, egui::Stroke::new(2.0, egui::Color32::YELLOW));

    for handle in Handle::ALL {
        let corner = handle.corner_of(selection);
        let center = container_rect.min + egui::vec2(corner.x as f32, corner.y as f32);
        let handle_rect = egui::Rect::from_center_size(center, egui::vec2(handle_size, handle_size));
        painter.rect_filled(handle_rect, 2.0, egui::Color32::WHITE);
        painter.rect_stroke(handle_rect, 2.0, egui::Stroke::new(1.0, egui::Color32::BLACK));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SelectionConfig;
    use crate::interaction::pointer::PointerTarget;
    use crate::util::geometry::NativeResolution;
    use std::path::PathBuf;

    fn session() -> CropSession {
        let mut session = CropSession::new(SelectionConfig::default());
        session
            .load_source(PathBuf::from("a.mp4"), NativeResolution::new(1920, 1080))
            .unwrap();
        session
    }

    fn container_rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::pos2(10.0, 30.0), egui::vec2(800.0, 450.0))
    }

    #[test]
    fn test_mouse_press_on_handle_becomes_resize() {
        let raw = vec![egui::Event::PointerButton {
            pos: egui::pos2(90.0, 75.0),
            button: egui::PointerButton::Primary,
            pressed: true,
            modifiers: egui::Modifiers::NONE,
        }];
        let events = collect_events(&raw, container_rect(), ContainerFrame::new(800.0, 450.0), &session(), true);
        assert_eq!(
            events,
            vec![PointerEvent::Down {
                target: PointerTarget::Handle(Handle::TopLeft),
                at: Point::new(80.0, 45.0),
            }]
        );
    }

    #[test]
    fn test_press_outside_selection_is_dropped() {
        let raw = vec![
            egui::Event::PointerButton {
                pos: egui::pos2(15.0, 35.0),
                button: egui::PointerButton::Primary,
                pressed: true,
                modifiers: egui::Modifiers::NONE,
            },
            egui::Event::PointerMoved(egui::pos2(20.0, 40.0)),
            egui::Event::WindowFocused(false),
        ];
        let events = collect_events(&raw, container_rect(), ContainerFrame::new(800.0, 450.0), &session(), true);
        assert_eq!(
            events,
            vec![
                PointerEvent::Move { at: Point::new(10.0, 10.0) },
                PointerEvent::Cancel,
            ]
        );
    }

    #[test]
    fn test_press_under_popup_is_dropped() {
        let raw = vec![
            egui::Event::PointerButton {
                pos: egui::pos2(90.0, 75.0),
                button: egui::PointerButton::Primary,
                pressed: true,
                modifiers: egui::Modifiers::NONE,
            },
            egui::Event::PointerButton {
                pos: egui::pos2(90.0, 75.0),
                button: egui::PointerButton::Primary,
                pressed: false,
                modifiers: egui::Modifiers::NONE,
            },
        ];
        let events = collect_events(&raw, container_rect(), ContainerFrame::new(800.0, 450.0), &session(), false);
        assert_eq!(events, vec![PointerEvent::Up]);
    }

    #[test]
    fn test_touch_phases_map_to_pointer_events() {
        let touch = |phase, pos| egui::Event::Touch {
            device_id: egui::TouchDeviceId(0),
            id: egui::TouchId(1),
            phase,
            pos,
            force: None,
        };
        let raw = vec![
            touch(egui::TouchPhase::Start, egui::pos2(410.0, 255.0)),
            touch(egui::TouchPhase::Move, egui::pos2(420.0, 255.0)),
            touch(egui::TouchPhase::End, egui::pos2(420.0, 255.0)),
        ];
        let events = collect_events(&raw, container_rect(), ContainerFrame::new(800.0, 450.0), &session(), true);
        assert_eq!(
            events,
            vec![
                PointerEvent::Down {
                    target: PointerTarget::Body,
                    at: Point::new(400.0, 225.0),
                },
                PointerEvent::Move { at: Point::new(410.0, 225.0) },
                PointerEvent::Up,
            ]
        );
    }
}
