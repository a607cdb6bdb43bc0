// src/file.rs

use std::{
    fs,
    io,
    path::{Path, PathBuf},
};

use crate::{
    config::consts::{DEFAULT_EXPORT_FILE, DEFAULT_OUT_DIR},
    csv::{Delim, to_export_string},
    model::Record,
};

/// Where the list view exports to unless told otherwise.
pub fn default_export_path() -> PathBuf {
    Path::new(DEFAULT_OUT_DIR).join(DEFAULT_EXPORT_FILE)
}

/// Write `records` to `path` as CSV with a header line. Parent directories are
/// created as needed; an existing file is replaced. Returns the path written.
pub fn write_export(path: &Path, records: &[&Record]) -> io::Result<PathBuf> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }

    let delim = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => Delim::Tsv,
        _ => Delim::Csv,
    };
    let contents = to_export_string(records, true, delim);

    fs::write(path, contents)?;
    tracing::info!("Export: rows={} → {}", records.len(), path.display());
    Ok(path.to_path_buf())
}

pub fn ensure_directory(dir: &Path) -> io::Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("Path exists but is not a directory: {}", dir.display()),
        ));
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}
