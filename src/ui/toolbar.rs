// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar with the crop controls and status line.

use crate::models::gate::SessionState;
use crate::session::CropSession;

/// Button the user pressed this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    None,
    OpenVideo,
    Export,
    StartOver,
}

/// Display the toolbar.
pub fn show(ui: &mut egui::Ui, session: &CropSession, status: &str) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        let can_open = session.state() != SessionState::Locked && !session.is_export_in_flight();
        if ui.add_enabled(can_open, egui::Button::new("📂 Open Video")).clicked() {
            action = ToolbarAction::OpenVideo;
        }

        if ui.add_enabled(session.can_export(), egui::Button::new("✂ Crop Video")).clicked() {
            action = ToolbarAction::Export;
        }

        if session.state() == SessionState::Locked && ui.button("⟲ Start Over").clicked() {
            action = ToolbarAction::StartOver;
        }

        ui.separator();

        if session.is_export_in_flight() {
            ui.spinner();
        }

        ui.label(egui::RichText::new(status).italics().weak());
    });

    action
}
