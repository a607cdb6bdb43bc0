// tests/insight_http.rs
mod common;

use std::time::Duration;

use educollect::{
    config::consts::{INSIGHT_EMPTY, INSIGHT_FALLBACK, INSIGHT_NO_DATA},
    insight::{GeminiInsight, InsightService, dashboard_insight},
};

use common::serve_once;

const WAIT: Duration = Duration::from_secs(5);

fn answer(text: &str) -> String {
    serde_json::json!({
        "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
    })
    .to_string()
}

fn gemini(base: &str) -> GeminiInsight {
    GeminiInsight::new("test-key").with_model("test-model").with_base_url(base)
}

#[test]
fn name_comes_back_formatted() {
    let body = answer(r#"{"formattedName": "Nguyễn Văn Minh"}"#);
    let (base, rx) = serve_once(200, "application/json", &body);

    let out = gemini(&base).normalize_name("  nguyễn   văn   minh ");
    assert_eq!(out, "Nguyễn Văn Minh");

    let req = rx.recv_timeout(WAIT).unwrap();
    assert!(req.request_line().starts_with("POST /test-model:generateContent?key=test-key "));
    let sent: serde_json::Value = serde_json::from_str(&req.body).unwrap();
    assert_eq!(sent["contents"][0]["role"], "user");
    assert!(sent["contents"][0]["parts"][0]["text"].as_str().unwrap().contains("nguyễn   văn   minh"));
    assert_eq!(sent["generationConfig"]["responseMimeType"], "application/json");
}

#[test]
fn failed_name_request_returns_the_input() {
    let (base, _rx) = serve_once(500, "application/json", r#"{"error":"quota"}"#);
    assert_eq!(gemini(&base).normalize_name("le thi c"), "le thi c");

    let (base, _rx) = serve_once(200, "application/json", &answer("Le Thi C"));
    assert_eq!(gemini(&base).normalize_name("le thi c"), "le thi c");
}

#[test]
fn summary_text_is_trimmed() {
    let (base, rx) = serve_once(200, "application/json", &answer("  Great progress: 12 students across 3 classes!\n"));
    assert_eq!(gemini(&base).summarize(12, 3), "Great progress: 12 students across 3 classes!");

    let req = rx.recv_timeout(WAIT).unwrap();
    let sent: serde_json::Value = serde_json::from_str(&req.body).unwrap();
    let prompt = sent["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("12 students") && prompt.contains("3 classes"));
    assert!(sent.get("generationConfig").is_none());
}

#[test]
fn summary_fallbacks() {
    let (base, _rx) = serve_once(200, "application/json", r#"{"candidates": []}"#);
    assert_eq!(gemini(&base).summarize(4, 2), INSIGHT_EMPTY);

    let (base, _rx) = serve_once(429, "application/json", "{}");
    assert_eq!(gemini(&base).summarize(4, 2), INSIGHT_FALLBACK);

    // No records: the service is never asked.
    assert_eq!(dashboard_insight(&gemini("http://127.0.0.1:9"), 0, 0), INSIGHT_NO_DATA);
}
