// src/gui/actions/copy.rs
use eframe::egui;
use crate::{csv::{self, Delim}, gui::app::App};

pub fn copy(app: &mut App, ui_ctx: &egui::Context) {
    let (count, txt) = {
        let rows = super::visible_rows(app);
        (rows.len(), csv::to_export_string(&rows, false, Delim::Tsv))
    };

    if count == 0 {
        tracing::debug!("Copy: Clicked, but there's nothing to copy");
        app.status("Nothing to copy");
        return;
    }

    tracing::info!("Copy: rows={count}");
    ui_ctx.copy_text(txt);
    app.status(format!("Copied {count} row(s) to clipboard"));
}
