// src/log.rs
//
// File logging under the store directory. `RUST_LOG` overrides the default
// filter. Keep the returned guard alive; dropping it flushes and stops the
// writer thread.

use std::{fs, io, path::Path};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::consts::LOG_FILE;

const DEFAULT_FILTER: &str = "info";

pub fn init(store_dir: &Path) -> io::Result<WorkerGuard> {
    fs::create_dir_all(store_dir)?;

    let appender = tracing_appender::rolling::never(store_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false).with_target(false));

    // A second init (tests, embedding) keeps the first subscriber.
    if registry.try_init().is_err() {
        eprintln!("log: subscriber already set, keeping it");
    }
    Ok(guard)
}
