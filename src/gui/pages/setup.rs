// src/gui/pages/setup.rs
//
// Connection settings: the web-app URL editor, plus the steps and script a
// user needs to publish their own sheet bridge.

use eframe::egui::{self, Button, RichText, TextEdit};

use crate::{config::state::View, gui::app::App};
use super::Page;

/// Apps Script source for the sheet bridge.
pub const WEBAPP_SCRIPT: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/webapp.gs"));

const STEPS: [&str; 3] = [
    "Create a new Google Sheet.",
    "Open Extensions > Apps Script.",
    "Paste the code below and Deploy it as a Web App (set \"Who has access\" to \"Anyone\").",
];

pub struct SetupPage;
pub static PAGE: SetupPage = SetupPage;

impl Page for SetupPage {
    fn view(&self) -> View { View::Setup }

    fn on_enter(&self, app: &mut App) {
        // Re-seed the editor from the saved value.
        app.gui.url_draft = None;
    }

    fn draw(&self, ui: &mut egui::Ui, app: &mut App) {
        ui.heading("Google Sheets connection");
        ui.label("The app talks to your sheet through a small Apps Script web app.");
        ui.add_space(8.0);

        let current = app.controller.endpoint().to_string();
        let draft = app.gui.url_draft.get_or_insert_with(|| current.clone());

        let mut save = false;
        ui.label(RichText::new("Web App URL").strong());
        ui.horizontal(|ui| {
            let resp = ui.add(
                TextEdit::singleline(draft)
                    .hint_text("https://script.google.com/macros/s/.../exec")
                    .desired_width(ui.available_width() - 90.0),
            );
            if resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                save = true;
            }
            let dirty = draft.trim() != current;
            if ui.add_enabled(dirty, Button::new("Save URL")).clicked() {
                save = true;
            }
        });

        if save {
            let url = draft.trim().to_string();
            tracing::info!("UI: Endpoint saved ({} chars)", url.len());
            app.controller.set_endpoint(&url);
            app.gui.url_draft = Some(url);
        }

        if current.is_empty() {
            ui.label(RichText::new("No URL configured: records cannot be loaded or saved.").color(ui.visuals().warn_fg_color));
        }

        ui.add_space(12.0);
        egui::Frame::group(ui.style()).inner_margin(12.0).show(ui, |ui| {
            ui.label(RichText::new("Setup in 3 steps").strong());
            for (i, step) in STEPS.iter().enumerate() {
                ui.label(format!("{}. {step}", i + 1));
            }

            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.label(RichText::new("Apps Script").small());
                if ui.small_button("Copy script").clicked() {
                    ui.ctx().copy_text(WEBAPP_SCRIPT.to_string());
                    app.status("Script copied to clipboard");
                }
            });

            egui::ScrollArea::vertical().max_height(240.0).show(ui, |ui| {
                let mut code = WEBAPP_SCRIPT;
                ui.add(
                    TextEdit::multiline(&mut code)
                        .code_editor()
                        .desired_width(f32::INFINITY),
                );
            });
        });
    }
}
