// src/gui/actions/mod.rs
//
// Folder module facade: re-export public entrypoints.
// Submodules stay private; consumers only see actions::{copy, export}.

mod copy;    // src/gui/actions/copy.rs
mod export;  // src/gui/actions/export.rs

pub use copy::copy;
pub use export::export;

use crate::{gui::app::App, model::{self, Record}};

/// Rows the list view currently shows.
#[inline]
pub(super) fn visible_rows(app: &App) -> Vec<&Record> {
    model::filter(app.controller.records(), &app.gui.search)
}
