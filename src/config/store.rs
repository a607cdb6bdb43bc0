// src/config/store.rs
//
// Persisted configuration: a flat string map behind a small get/set trait.
// The app keeps exactly one value in it (the bridge URL), but the backend
// neither knows nor cares.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use super::consts::{DEFAULT_WEBAPP_URL, ENDPOINT_KEY};
use crate::error::ConfigError;

pub trait ConfigBackend: Send {
    fn get(&self, key: &str) -> Result<Option<String>, ConfigError>;
    fn set(&self, key: &str, value: &str) -> Result<(), ConfigError>;
}

/* ---------------- File backend (TOML) ---------------- */

/// `key = "value"` lines in one TOML file. Re-read on every access.
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path { &self.path }

    fn load(&self) -> Result<BTreeMap<String, String>, ConfigError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let text = fs::read_to_string(&self.path)?;
        if text.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(toml::from_str(&text)?)
    }

    fn save(&self, map: &BTreeMap<String, String>) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = toml::to_string(map)?;

        // Write beside the target, then swap in.
        let tmp = self.path.with_extension("toml.tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl ConfigBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, ConfigError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut map = self.load()?;
        map.insert(key.to_string(), value.to_string());
        self.save(&map)
    }
}

/* ---------------- Memory backend ---------------- */

/// Shared in-memory map. Clones see the same values, so a clone handed to a
/// second `ConfigStore` behaves like the same settings after a restart.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    map: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryBackend {
    pub fn new() -> Self { Self::default() }

    pub fn with(key: &str, value: &str) -> Self {
        let b = Self::new();
        b.lock().insert(key.to_string(), value.to_string());
        b
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        // A poisoned map still holds valid strings.
        self.map.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ConfigBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, ConfigError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/* ---------------- Endpoint store ---------------- */

pub struct ConfigStore {
    backend: Box<dyn ConfigBackend>,
    default_endpoint: String,
}

impl ConfigStore {
    pub fn new(backend: impl ConfigBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            default_endpoint: DEFAULT_WEBAPP_URL.to_string(),
        }
    }

    pub fn with_default(mut self, url: impl Into<String>) -> Self {
        self.default_endpoint = url.into();
        self
    }

    pub fn default_endpoint(&self) -> &str { &self.default_endpoint }

    /// Stored URL, or the default. A missing value is replaced by the default
    /// on disk right away so later reads agree.
    pub fn load_endpoint(&self) -> String {
        match self.backend.get(ENDPOINT_KEY) {
            Ok(Some(url)) => {
                tracing::debug!("Config: Endpoint loaded");
                url
            }
            Ok(None) => {
                tracing::info!("Config: No endpoint stored, applying default");
                if let Err(e) = self.backend.set(ENDPOINT_KEY, &self.default_endpoint) {
                    tracing::error!("Config: Could not store default endpoint: {e}");
                }
                self.default_endpoint.clone()
            }
            Err(e) => {
                tracing::error!("Config: Read failed ({e}), using default endpoint");
                self.default_endpoint.clone()
            }
        }
    }

    pub fn save_endpoint(&self, url: &str) -> Result<(), ConfigError> {
        self.backend.set(ENDPOINT_KEY, url)?;
        tracing::info!("Config: Endpoint saved");
        Ok(())
    }
}
