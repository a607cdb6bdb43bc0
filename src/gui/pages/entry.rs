// src/gui/pages/entry.rs
//
// New-student form. The name can be tidied by the insight service (button, or
// when the field loses focus). Class is upper-cased as typed.

use eframe::egui::{self, Button, TextEdit};

use crate::{config::{consts::MIN_NAME_LEN, state::View}, gui::app::App};
use super::Page;

pub struct EntryPage;
pub static PAGE: EntryPage = EntryPage;

impl Page for EntryPage {
    fn view(&self) -> View { View::Entry }

    fn draw(&self, ui: &mut egui::Ui, app: &mut App) {
        let formatting = app.gui.formatting;
        let loading = app.controller.loading();
        let mut want_format = false;

        ui.heading("New student");
        ui.add_space(6.0);

        egui::Grid::new("entry_form")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.label("Full name");
                ui.horizontal(|ui| {
                    let resp = ui.add_enabled(
                        !formatting,
                        TextEdit::singleline(&mut app.gui.form.full_name)
                            .hint_text("e.g. nguyễn văn minh")
                            .desired_width(260.0),
                    );
                    if resp.lost_focus() {
                        want_format = true;
                    }

                    let long_enough = app.gui.form.full_name.trim().chars().count() >= MIN_NAME_LEN;
                    let btn = ui.add_enabled(!formatting && long_enough, Button::new("Format name"));
                    if btn.clicked() {
                        want_format = true;
                    }
                    if formatting {
                        ui.spinner();
                    }
                });
                ui.end_row();

                ui.label("Class");
                let resp = ui.add(
                    TextEdit::singleline(&mut app.gui.form.class_name)
                        .hint_text("e.g. 12A1")
                        .desired_width(120.0),
                );
                if resp.changed() {
                    app.gui.form.class_name = app.gui.form.class_name.to_uppercase();
                }
                ui.end_row();

                ui.label("Date of birth");
                ui.add(
                    TextEdit::singleline(&mut app.gui.form.dob)
                        .hint_text("YYYY-MM-DD")
                        .desired_width(120.0),
                );
                ui.end_row();
            });

        if want_format {
            app.start_format(ui.ctx());
        }

        ui.add_space(10.0);

        let can_submit = !loading && !app.gui.formatting;
        if ui.add_enabled(can_submit, Button::new("Save student")).clicked() {
            let fields = app.gui.form.clone();
            if app.controller.submit(fields).is_ok() {
                app.gui.form.clear();
            }
        }
    }
}
