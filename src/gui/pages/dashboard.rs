// src/gui/pages/dashboard.rs
use eframe::egui::{self, Align2, Color32, CornerRadius, FontId, RichText, Sense, Stroke, Vec2};

use crate::{config::state::View, gui::app::App, stats::ClassStats};
use super::Page;

pub const PALETTE: [Color32; 6] = [
    Color32::from_rgb(0x63, 0x66, 0xf1),
    Color32::from_rgb(0xa8, 0x55, 0xf7),
    Color32::from_rgb(0xec, 0x48, 0x99),
    Color32::from_rgb(0xf9, 0x73, 0x16),
    Color32::from_rgb(0x22, 0xc5, 0x5e),
    Color32::from_rgb(0x06, 0xb6, 0xd4),
];

const CHART_H: f32 = 220.0;
const LABEL_H: f32 = 18.0;

pub struct DashboardPage;
pub static PAGE: DashboardPage = DashboardPage;

impl Page for DashboardPage {
    fn view(&self) -> View { View::Dashboard }

    fn draw(&self, ui: &mut egui::Ui, app: &mut App) {
        let stats = ClassStats::from_records(app.controller.records());
        app.refresh_insight(ui.ctx(), stats.total, stats.class_count());

        ui.horizontal(|ui| {
            counter(ui, "Students", stats.total);
            counter(ui, "Classes", stats.class_count());

            egui::Frame::group(ui.style()).inner_margin(12.0).show(ui, |ui| {
                ui.set_min_width(260.0);
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Insight").small().strong());
                    if app.insight_pending() {
                        ui.spinner();
                    }
                });
                ui.label(&app.insight_text);
            });
        });

        ui.add_space(12.0);
        ui.heading("Students per class");

        if stats.per_class.is_empty() {
            ui.label(RichText::new("Nothing to chart yet.").italics());
            return;
        }
        bar_chart(ui, &stats);
    }
}

fn counter(ui: &mut egui::Ui, title: &str, value: usize) {
    egui::Frame::group(ui.style()).inner_margin(12.0).show(ui, |ui| {
        ui.set_min_width(110.0);
        ui.vertical(|ui| {
            ui.label(RichText::new(title).small());
            ui.label(RichText::new(value.to_string()).size(28.0).strong());
        });
    });
}

fn bar_chart(ui: &mut egui::Ui, stats: &ClassStats) {
    let width = ui.available_width().max(120.0);
    let (resp, painter) = ui.allocate_painter(Vec2::new(width, CHART_H), Sense::hover());
    let rect = resp.rect;

    let text_color = ui.visuals().text_color();
    let max = stats.max_count().max(1) as f32;
    let n = stats.per_class.len() as f32;
    let slot = rect.width() / n;
    let bar_w = (slot * 0.6).min(48.0);
    let top_pad = LABEL_H;
    let plot_h = rect.height() - LABEL_H - top_pad;
    let baseline = rect.bottom() - LABEL_H;

    painter.line_segment(
        [egui::pos2(rect.left(), baseline), egui::pos2(rect.right(), baseline)],
        Stroke::new(1.0, ui.visuals().weak_text_color()),
    );

    for (i, (class, count)) in stats.per_class.iter().enumerate() {
        let cx = rect.left() + slot * (i as f32 + 0.5);
        let h = plot_h * (*count as f32 / max);
        let bar = egui::Rect::from_min_max(
            egui::pos2(cx - bar_w / 2.0, baseline - h),
            egui::pos2(cx + bar_w / 2.0, baseline),
        );
        painter.rect_filled(bar, CornerRadius::same(3), PALETTE[i % PALETTE.len()]);

        painter.text(
            egui::pos2(cx, bar.top() - 2.0),
            Align2::CENTER_BOTTOM,
            count.to_string(),
            FontId::proportional(12.0),
            text_color,
        );
        painter.text(
            egui::pos2(cx, baseline + 3.0),
            Align2::CENTER_TOP,
            class,
            FontId::proportional(12.0),
            text_color,
        );
    }

    resp.on_hover_text(format!("{} student(s) in {} class(es)", stats.total, stats.class_count()));
}
