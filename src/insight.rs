// src/insight.rs
//
// Side-channel text helpers backed by a generative-language API: tidy up a
// typed name, or write one short sentence about the data volume.
//
// Best effort only. Every failure ends in deterministic fallback text and a
// warn line in the log; nothing here returns an error to the caller.

use std::sync::Arc;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    config::{consts::*, settings::Settings},
    error::InsightError,
};

pub trait InsightService: Send + Sync {
    /// Capitalized, single-spaced, diacritics kept. Input returned unchanged
    /// on any failure, and for inputs shorter than two characters.
    fn normalize_name(&self, raw: &str) -> String;

    /// One short sentence about `record_count` students in `class_count` classes.
    fn summarize(&self, record_count: usize, class_count: usize) -> String;
}

/// What the dashboard shows. With no records there is nothing to describe,
/// and the service is not asked.
pub fn dashboard_insight(service: &dyn InsightService, record_count: usize, class_count: usize) -> String {
    if record_count == 0 {
        return INSIGHT_NO_DATA.to_string();
    }
    service.summarize(record_count, class_count)
}

/// Service from settings: Gemini when a key is configured, offline otherwise.
pub fn from_settings(settings: &Settings) -> Arc<dyn InsightService> {
    match &settings.gemini_api_key {
        Some(key) => Arc::new(
            GeminiInsight::new(key.clone())
                .with_model(settings.gemini_model.clone())
                .with_base_url(settings.gemini_base_url.clone()),
        ),
        None => {
            tracing::info!("Insight: No API key, running offline");
            Arc::new(OfflineInsight)
        }
    }
}

/* ---------------- Offline ---------------- */

/// No generative service configured: every call takes the fallback path.
#[derive(Clone, Copy, Debug, Default)]
pub struct OfflineInsight;

impl InsightService for OfflineInsight {
    fn normalize_name(&self, raw: &str) -> String {
        raw.to_string()
    }

    fn summarize(&self, _record_count: usize, _class_count: usize) -> String {
        INSIGHT_FALLBACK.to_string()
    }
}

/* ---------------- Gemini ---------------- */

pub struct GeminiInsight {
    http: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiInsight {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_key: api_key.into(),
            model: GEMINI_MODEL.to_string(),
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point at another host (a proxy, or a local responder in tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn generate(&self, prompt: String, config: Option<serde_json::Value>) -> Result<String, InsightError> {
        if self.api_key.trim().is_empty() {
            return Err(InsightError::NoKey);
        }

        let url = format!("{}/{}:generateContent", self.base_url, self.model);
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: config,
        };

        let resp = self
            .http
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(InsightError::Status { status: status.as_u16(), body });
        }

        let text = resp.text()?;
        let parsed: GenerateResponse =
            serde_json::from_str(&text).map_err(|e| InsightError::Malformed(e.to_string()))?;
        Ok(extract_text(parsed))
    }

    fn try_normalize(&self, raw: &str) -> Result<Option<String>, InsightError> {
        let prompt = format!(
            "Task: normalize a person's name.\n\
             Input: \"{raw}\"\n\
             Rules:\n\
             1. Capitalize the first letter of every word.\n\
             2. Remove extra whitespace at the start, at the end and between words.\n\
             3. Keep every diacritic exactly as written.\n\
             Answer as JSON."
        );
        let text = self.generate(prompt, Some(name_schema()))?;
        parse_formatted_name(&text)
    }
}

impl InsightService for GeminiInsight {
    fn normalize_name(&self, raw: &str) -> String {
        if raw.chars().count() < MIN_NAME_LEN {
            return raw.to_string();
        }
        match self.try_normalize(raw) {
            Ok(Some(name)) => name,
            Ok(None) => {
                tracing::warn!("Insight: Name answer had no formattedName");
                raw.to_string()
            }
            Err(e) => {
                tracing::warn!("Insight: Name formatting failed: {e}");
                raw.to_string()
            }
        }
    }

    fn summarize(&self, record_count: usize, class_count: usize) -> String {
        let prompt = format!(
            "You are an assistant to a school administrator. Write one short, positive \
             remark (under 20 words) about the collected data: {record_count} students \
             in {class_count} classes."
        );
        match self.generate(prompt, None) {
            Ok(text) if text.trim().is_empty() => INSIGHT_EMPTY.to_string(),
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                tracing::warn!("Insight: Summary failed: {e}");
                INSIGHT_FALLBACK.to_string()
            }
        }
    }
}

fn name_schema() -> serde_json::Value {
    json!({
        "responseMimeType": "application/json",
        "responseSchema": {
            "type": "OBJECT",
            "properties": { "formattedName": { "type": "STRING" } },
            "required": ["formattedName"]
        }
    })
}

/// `{"formattedName": "..."}` → the name, if present and non-blank.
fn parse_formatted_name(text: &str) -> Result<Option<String>, InsightError> {
    let v: FormattedName =
        serde_json::from_str(text.trim()).map_err(|e| InsightError::Malformed(e.to_string()))?;
    Ok(v.formatted_name.filter(|s| !s.trim().is_empty()))
}

/* ---------------- Wire shapes ---------------- */

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<serde_json::Value>,
}

#[derive(Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FormattedName {
    formatted_name: Option<String>,
}

/// Text parts of the first candidate, joined. Empty if there are none.
fn extract_text(resp: GenerateResponse) -> String {
    resp.candidates
        .and_then(|c| c.into_iter().next())
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect::<String>())
        .unwrap_or_default()
}
