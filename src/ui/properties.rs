// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Crop properties panel.
//!
//! Read-only view of the source, the letterbox geometry, the selection and
//! the pixel rectangle that will be sent to the encoder.

use crate::session::CropSession;
use crate::util::geometry::ContainerFrame;

/// Display the properties panel.
pub fn show(ui: &mut egui::Ui, session: &CropSession, container: Option<ContainerFrame>) {
    ui.heading("Crop");
    ui.separator();

    egui::Grid::new("session_props").num_columns(2).show(ui, |ui| {
        ui.label("State");
        ui.label(format!("{:?}", session.state()));
        ui.end_row();

        ui.label("Gesture");
        ui.label(if session.is_gesture_active() { "active" } else { "idle" });
        ui.end_row();
    });

    let Some(source) = session.source() else {
        ui.add_space(10.0);
        ui.label(egui::RichText::new("No video loaded").weak());
        return;
    };

    ui.add_space(10.0);
    ui.label(egui::RichText::new("Source").strong());
    let name = source
        .path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    ui.label(name);
    ui.label(format!("{} × {} px", source.native.width, source.native.height));

    let selection = session.selection();
    ui.add_space(10.0);
    ui.label(egui::RichText::new("Selection").strong());
    egui::Grid::new("selection_props").num_columns(2).show(ui, |ui| {
        for (label, value) in [
            ("Left", selection.left),
            ("Top", selection.top),
            ("Width", selection.width),
            ("Height", selection.height),
        ] {
            ui.label(label);
            ui.label(format!("{:.1}%", value * 100.0));
            ui.end_row();
        }
    });

    let Some(container) = container else {
        return;
    };

    ui.add_space(10.0);
    ui.label(egui::RichText::new("Output").strong());
    match session.crop_rect(container) {
        Ok(crop) => {
            egui::Grid::new("crop_props").num_columns(2).show(ui, |ui| {
                for (label, value) in [
                    ("X", crop.x),
                    ("Y", crop.y),
                    ("Width", crop.width),
                    ("Height", crop.height),
                ] {
                    ui.label(label);
                    ui.label(value.to_string());
                    ui.end_row();
                }
            });
        }
        Err(e) => {
            ui.label(egui::RichText::new(e.to_string()).weak());
        }
    }
}
