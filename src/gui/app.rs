// src/gui/app.rs
use std::sync::Arc;

use eframe::egui;

use crate::{
    config::{
        consts::{INSIGHT_NO_DATA, INSIGHT_PENDING, MIN_NAME_LEN},
        settings::Settings,
        state::GuiState,
        store::{ConfigStore, FileBackend},
    },
    controller::{Controller, NoticeKind},
    file,
    insight::{self, InsightService},
    remote::{RemoteStore, SheetClient},
};

use super::{
    components::{status_bar, tabs},
    router,
    task::Task,
};

pub fn run(options: eframe::NativeOptions, settings: Settings) -> Result<(), eframe::Error> {
    eframe::run_native(
        "EduCollect",
        options,
        Box::new(move |cc| Ok(Box::new(App::new(cc, &settings)))),
    )
}

pub struct App {
    // records, endpoint, active view (UI thread only)
    pub controller: Controller,
    pub gui: GuiState,

    pub insight: Arc<dyn InsightService>,
    pub insight_text: String,
    insight_key: Option<(usize, usize)>,
    insight_task: Option<Task<String>>,

    format_task: Option<Task<String>>,

    // list view export target
    pub export_path: String,
}

impl App {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: &Settings) -> Self {
        let store: Arc<dyn RemoteStore> = Arc::new(SheetClient::new(settings.write_mode));
        let config = ConfigStore::new(FileBackend::new(settings.settings_path()));

        let ctx = cc.egui_ctx.clone();
        let mut controller = Controller::new(store, config)
            .with_waker(Arc::new(move || ctx.request_repaint()))
            .with_reconcile_delay(settings.reconcile_delay);
        controller.start();

        tracing::info!(
            "Init: write_mode={:?}, reconcile={}ms",
            settings.write_mode,
            settings.reconcile_delay.as_millis()
        );

        Self {
            controller,
            gui: GuiState::default(),
            insight: insight::from_settings(settings),
            insight_text: INSIGHT_NO_DATA.to_string(),
            insight_key: None,
            insight_task: None,
            format_task: None,
            export_path: file::default_export_path().to_string_lossy().into_owned(),
        }
    }

    /* ---------- tiny helpers ---------- */

    #[inline]
    pub fn status<T: Into<String>>(&mut self, msg: T) {
        self.controller.notify(NoticeKind::Info, msg);
    }

    #[inline]
    pub fn insight_pending(&self) -> bool { self.insight_task.is_some() }

    /// Ask the insight service to tidy the typed name. No-op while a request
    /// is already out or the name is too short.
    pub fn start_format(&mut self, ctx: &egui::Context) {
        let raw = self.gui.form.full_name.clone();
        if self.gui.formatting || raw.trim().chars().count() < MIN_NAME_LEN {
            return;
        }

        tracing::debug!("Format: Begin");
        self.gui.formatting = true;
        let service = Arc::clone(&self.insight);
        self.format_task = Some(Task::spawn(ctx, move || service.normalize_name(&raw)));
    }

    /// Start a new dashboard sentence when the (records, classes) pair moved.
    /// A request still out for an older pair is abandoned.
    pub fn refresh_insight(&mut self, ctx: &egui::Context, record_count: usize, class_count: usize) {
        let key = (record_count, class_count);
        if self.insight_key == Some(key) {
            return;
        }
        self.insight_key = Some(key);

        if record_count == 0 {
            self.insight_task = None;
            self.insight_text = INSIGHT_NO_DATA.to_string();
            return;
        }

        tracing::debug!("Insight: Refresh for {record_count} students, {class_count} classes");
        self.insight_text = INSIGHT_PENDING.to_string();
        let service = Arc::clone(&self.insight);
        self.insight_task = Some(Task::spawn(ctx, move || {
            insight::dashboard_insight(service.as_ref(), record_count, class_count)
        }));
    }

    fn poll_tasks(&mut self) {
        if let Some(done) = self.format_task.as_ref().and_then(|t| t.poll()) {
            self.format_task = None;
            self.gui.formatting = false;
            match done {
                Ok(name) => self.gui.form.full_name = name,
                Err(()) => tracing::error!("Format: Worker vanished"),
            }
        }

        if let Some(done) = self.insight_task.as_ref().and_then(|t| t.poll()) {
            self.insight_task = None;
            match done {
                Ok(text) => self.insight_text = text,
                Err(()) => tracing::error!("Insight: Worker vanished"),
            }
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.controller.poll();
        self.poll_tasks();

        egui::TopBottomPanel::top("nav").show(ctx, |ui| {
            tabs::draw(ui, self);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            status_bar::draw(ui, self);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let page = router::page_for(self.controller.active_view());
            page.draw(ui, self);
        });

        if let Some(wait) = self.controller.next_wakeup() {
            ctx.request_repaint_after(wait);
        }
    }
}
