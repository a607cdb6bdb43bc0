// src/error.rs
use thiserror::Error;

/// Anything that kept a request to the spreadsheet bridge from completing.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no web-app URL configured")]
    NoEndpoint,

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("bridge answered HTTP {0}")]
    Status(u16),

    #[error("unreadable rows: {0}")]
    Decode(#[from] serde_json::Error),

    /// Confirmed writes only: the bridge replied but did not report success.
    #[error("write not confirmed: {0}")]
    Rejected(String),
}

/// Input the controller refuses before any request is made.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("no web-app URL configured")]
    NoEndpoint,

    #[error("missing {0}")]
    MissingField(&'static str),

    #[error("date of birth must be YYYY-MM-DD, got {0:?}")]
    InvalidDate(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("settings I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings parse: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("settings write: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Generative API failures. Never leaves `insight`: callers get fallback text.
#[derive(Debug, Error)]
pub(crate) enum InsightError {
    #[error("no API key configured")]
    NoKey,

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed answer: {0}")]
    Malformed(String),
}
