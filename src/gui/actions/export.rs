// src/gui/actions/export.rs
use std::path::PathBuf;

use crate::{controller::NoticeKind, file, gui::app::App};

pub fn export(app: &mut App) {
    let target = match app.export_path.trim() {
        "" => file::default_export_path(),
        p => PathBuf::from(p),
    };

    let result = {
        let rows = super::visible_rows(app);
        if rows.is_empty() {
            None
        } else {
            tracing::info!("Export: Begin rows={}", rows.len());
            Some(file::write_export(&target, &rows).map(|p| (p, rows.len())))
        }
    };

    match result {
        None => {
            tracing::debug!("Export: Clicked, but there's nothing to export");
            app.status("Nothing to export");
        }
        Some(Ok((path, n))) => {
            app.controller.notify(NoticeKind::Success, format!("Exported {n} row(s) to {}", path.display()));
        }
        Some(Err(e)) => {
            tracing::error!("Export: Error: {e}");
            app.controller.notify(NoticeKind::Error, format!("Export error: {e}"));
        }
    }
}
