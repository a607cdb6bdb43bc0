// src/gui/pages/mod.rs
use eframe::egui;

use crate::{config::state::View, gui::app::App};

pub mod dashboard;
pub mod entry;
pub mod list;
pub mod setup;

pub trait Page: Send + Sync + 'static {
    fn view(&self) -> View;

    fn label(&self) -> &'static str {
        self.view().title()
    }

    /// Draw the page into the central panel. Runs every frame; must not block.
    fn draw(&self, ui: &mut egui::Ui, app: &mut App);

    /// Called when the tab becomes active.
    fn on_enter(&self, _app: &mut App) {}
}
