// src/bin/gui.rs
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]
use color_eyre::eyre::{WrapErr, eyre};
use eframe::egui::{IconData, ViewportBuilder};
use educollect::{config::settings::Settings, gui, log};

fn app_icon() -> color_eyre::Result<IconData> {
    let rgba = image::load_from_memory(include_bytes!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/assets/educollect.png"
    )))
    .wrap_err("decoding app icon")?
    .to_rgba8();
    let (w, h) = rgba.dimensions();
    Ok(IconData { rgba: rgba.into_raw(), width: w, height: h })
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    // Logging first, so settings warnings reach the log. It is optional; the
    // app runs without it.
    let store_dir = Settings::store_dir_from_env();
    let _log_guard = match log::init(&store_dir) {
        Ok(g) => Some(g),
        Err(e) => {
            eprintln!("log: cannot open {}: {e}", store_dir.display());
            None
        }
    };

    let settings = Settings::from_env();
    tracing::info!("Start: store_dir={}", settings.store_dir.display());

    let mut viewport = ViewportBuilder::default()
        .with_title("EduCollect")
        .with_inner_size([960.0, 640.0]);
    match app_icon() {
        Ok(icon) => viewport = viewport.with_icon(icon),
        Err(e) => tracing::warn!("Start: No icon: {e:#}"),
    }

    let options = eframe::NativeOptions { viewport, ..Default::default() };

    gui::run(options, settings).map_err(|e| eyre!("GUI failed: {e}"))
}
