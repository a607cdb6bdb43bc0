// src/config/settings.rs
//
// Process-level settings, read once at start-up from the environment.
// Everything has a built-in default so a bare launch just works.

use std::{path::PathBuf, time::Duration};

use super::consts::*;
use crate::remote::WriteMode;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub store_dir: PathBuf,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub write_mode: WriteMode,
    pub reconcile_delay: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from(STORE_DIR),
            gemini_api_key: None,
            gemini_model: GEMINI_MODEL.to_string(),
            gemini_base_url: GEMINI_BASE_URL.to_string(),
            write_mode: WriteMode::Opaque,
            reconcile_delay: Duration::from_millis(RECONCILE_DELAY_MS),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Just the store directory. Resolved on its own so logging can start
    /// before the rest of the settings are parsed.
    pub fn store_dir_from_env() -> PathBuf {
        Self::store_dir_from_lookup(|k| std::env::var(k).ok())
    }

    pub fn store_dir_from_lookup(get: impl Fn(&str) -> Option<String>) -> PathBuf {
        get("EDUCOLLECT_STORE_DIR")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(STORE_DIR))
    }

    /// Same as `from_env`, with the variable source injected.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let var = |k: &str| get(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut s = Self { store_dir: Self::store_dir_from_lookup(&get), ..Self::default() };

        s.gemini_api_key = var("GEMINI_API_KEY").or_else(|| var("API_KEY"));
        if let Some(model) = var("EDUCOLLECT_GEMINI_MODEL") {
            s.gemini_model = model;
        }
        if let Some(mode) = var("EDUCOLLECT_WRITE_MODE") {
            match mode.parse() {
                Ok(m) => s.write_mode = m,
                Err(_) => tracing::warn!("Settings: Unknown write mode {mode:?}, keeping {:?}", s.write_mode),
            }
        }
        if let Some(ms) = var("EDUCOLLECT_RECONCILE_MS") {
            match ms.parse::<u64>() {
                Ok(ms) => s.reconcile_delay = Duration::from_millis(ms),
                Err(_) => tracing::warn!("Settings: Bad reconcile delay {ms:?}, keeping default"),
            }
        }
        s
    }

    pub fn settings_path(&self) -> PathBuf {
        self.store_dir.join(SETTINGS_FILE)
    }

    pub fn log_path(&self) -> PathBuf {
        self.store_dir.join(LOG_FILE)
    }
}
