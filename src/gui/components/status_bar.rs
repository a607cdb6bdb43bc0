// src/gui/components/status_bar.rs
use eframe::egui::{self, Color32, RichText};

use crate::{controller::NoticeKind, gui::app::App};

fn tint(kind: NoticeKind, ui: &egui::Ui) -> Color32 {
    match kind {
        NoticeKind::Info => ui.visuals().text_color(),
        NoticeKind::Success => Color32::from_rgb(0x22, 0xc5, 0x5e),
        NoticeKind::Error => ui.visuals().error_fg_color,
    }
}

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    ui.horizontal(|ui| {
        if app.controller.loading() {
            ui.spinner();
        }

        match app.controller.last_notice() {
            Some(n) => { ui.label(RichText::new(&n.text).color(tint(n.kind, ui))); }
            None => { ui.label("Idle"); }
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(format!("{} student(s)", app.controller.records().len()));
            if app.controller.reconcile_pending() {
                ui.separator();
                ui.label("Syncing…");
            }
        });
    });
}
