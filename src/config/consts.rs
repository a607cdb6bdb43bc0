// src/config/consts.rs

// Remote store
pub const DEFAULT_WEBAPP_URL: &str =
    "https://script.google.com/macros/s/AKfycbzQo-8YVA9T8z7MRp-zt7pnAlCgn2kEh3bVL53tAYmJ_uT4DvqyDQguCnUboRG6cxHhIg/exec";
pub const READ_ACTION: &str = "read";
pub const CREATE_ACTION: &str = "create";

// Local persistence
pub const STORE_DIR: &str = ".store";
pub const SETTINGS_FILE: &str = "settings.toml";
pub const LOG_FILE: &str = "debug.log";
pub const ENDPOINT_KEY: &str = "sheet_webapp_url";

// Export
pub const DEFAULT_OUT_DIR: &str = "out";
pub const DEFAULT_EXPORT_FILE: &str = "students.csv";

// Reconciliation after an unconfirmed write
pub const RECONCILE_DELAY_MS: u64 = 1_000;

// Insight service
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const MIN_NAME_LEN: usize = 2;

// Fixed texts
pub const INSIGHT_NO_DATA: &str = "No data to analyze yet.";
pub const INSIGHT_EMPTY: &str = "Data is ready!";
pub const INSIGHT_FALLBACK: &str = "The system is running smoothly.";
pub const INSIGHT_PENDING: &str = "Analyzing data…";
