// src/gui/components/tabs.rs
//
// Renders the top tabs and performs the tab switch itself. The controller owns
// the active view; pages get an `on_enter` call when they become current.

use eframe::egui;
use crate::gui::{app::App, router};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;
        ui.strong("EduCollect");
        ui.separator();

        let cur = app.controller.active_view();

        for page in router::all_pages() {
            let selected = page.view() == cur;

            if ui.selectable_label(selected, page.label()).clicked() && !selected {
                tracing::info!("UI: Tab switch {:?} → {:?}", cur, page.view());
                app.controller.set_active_view(page.view());
                page.on_enter(app);
            }
        }
    });
}
