// src/gui/pages/list.rs
//
// Student list: search box, toolbar (reload, copy, export) and the table.
// Rows come straight from the controller, newest first, filtered live.

use eframe::egui::{self, Button, RichText, TextEdit};
use egui_extras::{Column, TableBuilder};

use crate::{
    config::state::View,
    gui::{actions, app::App},
    model::{self, Record},
};
use super::Page;

pub struct ListPage;
pub static PAGE: ListPage = ListPage;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Action { Reload, Copy, Export }

impl Page for ListPage {
    fn view(&self) -> View { View::List }

    fn draw(&self, ui: &mut egui::Ui, app: &mut App) {
        let loading = app.controller.loading();
        let mut action = None;

        ui.horizontal(|ui| {
            ui.label("Search:");
            ui.add(
                TextEdit::singleline(&mut app.gui.search)
                    .hint_text("Name or class")
                    .desired_width(220.0),
            );
            if !app.gui.search.is_empty() && ui.small_button("✕").clicked() {
                app.gui.search.clear();
            }

            ui.separator();
            if ui.add_enabled(!loading, Button::new("Reload")).clicked() {
                action = Some(Action::Reload);
            }
            if ui.button("Copy").clicked() {
                action = Some(Action::Copy);
            }
        });

        ui.horizontal(|ui| {
            ui.label("Output:");
            ui.add(TextEdit::singleline(&mut app.export_path).desired_width(260.0));
            if ui.button("Export CSV").clicked() {
                action = Some(Action::Export);
            }
        });

        match action {
            Some(Action::Reload) => {
                if !app.controller.reload() {
                    app.status("No spreadsheet web-app URL configured");
                }
            }
            Some(Action::Copy) => actions::copy(app, ui.ctx()),
            Some(Action::Export) => actions::export(app),
            None => {}
        }

        ui.separator();

        let records = app.controller.records();
        if records.is_empty() {
            ui.add_space(24.0);
            ui.vertical_centered(|ui| {
                if loading {
                    ui.spinner();
                    ui.label("Loading student records…");
                } else {
                    ui.label(RichText::new("No student records yet.").italics());
                }
            });
            return;
        }

        let rows = model::filter(records, &app.gui.search);
        if rows.is_empty() {
            ui.label(format!("No students match \"{}\".", app.gui.search.trim()));
            return;
        }

        ui.label(format!("{} of {} shown", rows.len(), records.len()));
        table(ui, &rows);
    }
}

fn table(ui: &mut egui::Ui, rows: &[&Record]) {
    let row_h = ui.text_style_height(&egui::TextStyle::Body) + 6.0;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .min_scrolled_height(0.0)
        .column(Column::exact(36.0))
        .column(Column::initial(220.0).at_least(120.0).clip(true))
        .column(Column::initial(80.0).at_least(50.0))
        .column(Column::initial(110.0).at_least(90.0))
        .column(Column::remainder().at_least(120.0))
        .header(row_h, |mut header| {
            for title in ["#", "Full name", "Class", "Date of birth", "Created"] {
                header.col(|ui| { ui.strong(title); });
            }
        })
        .body(|body| {
            body.rows(row_h, rows.len(), |mut row| {
                let i = row.index();
                let r = rows[i];
                row.col(|ui| { ui.label((i + 1).to_string()); });
                row.col(|ui| { ui.label(&r.full_name); });
                row.col(|ui| { ui.label(&r.class_name); });
                row.col(|ui| { ui.label(r.dob_display()); });
                row.col(|ui| { ui.label(r.created_display()); });
            });
        });
}
