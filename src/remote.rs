// src/remote.rs
//
// Client for the spreadsheet web-app bridge: one flat table, one "read all"
// action, one "append a row" action.
//
// The bridge never confirms a write in a way the browser build of this app
// could read, so by default a write counts as done once the request went out.
// The controller makes up for it with a delayed re-read. `WriteMode::Confirmed`
// reads the reply instead, for bridges that answer properly.

use std::{fmt, str::FromStr};

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::{
    config::consts::{CREATE_ACTION, READ_ACTION},
    error::StoreError,
    model::{Record, StudentFields},
};

pub trait RemoteStore: Send + Sync {
    /// All rows. Blank endpoint: empty list, nothing sent.
    fn fetch_records(&self, endpoint: &str) -> Result<Vec<Record>, StoreError>;

    /// Append one row. The client stamps a fresh id and creation time; the
    /// acknowledgment carries the record exactly as sent.
    fn create_record(&self, endpoint: &str, fields: &StudentFields) -> Result<CreateAck, StoreError>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Success as soon as the request was sent.
    #[default]
    Opaque,
    /// Success only on a 2xx reply with `{"status":"success"}`.
    Confirmed,
}

impl FromStr for WriteMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "opaque" => Ok(WriteMode::Opaque),
            "confirmed" => Ok(WriteMode::Confirmed),
            other => Err(format!("unknown write mode: {other}")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CreateAck {
    /// Sent, persistence unknown. Needs a reconciliation read.
    Dispatched(Record),
    /// The bridge reported the row as stored.
    Confirmed(Record),
}

impl CreateAck {
    pub fn record(&self) -> &Record {
        match self {
            CreateAck::Dispatched(r) | CreateAck::Confirmed(r) => r,
        }
    }

    pub fn into_record(self) -> Record {
        match self {
            CreateAck::Dispatched(r) | CreateAck::Confirmed(r) => r,
        }
    }

    pub fn needs_reconcile(&self) -> bool {
        matches!(self, CreateAck::Dispatched(_))
    }
}

/* ---------------- Wire shapes ---------------- */

#[derive(Serialize)]
struct CreateRequest<'a> {
    action: &'static str,
    data: &'a Record,
}

#[derive(Deserialize)]
struct CreateReply {
    #[serde(default)]
    status: String,
}

/// Body of a create call, as JSON text.
pub fn create_body(record: &Record) -> Result<String, serde_json::Error> {
    serde_json::to_string(&CreateRequest { action: CREATE_ACTION, data: record })
}

/// Decode a read reply.
pub fn parse_rows(body: &str) -> Result<Vec<Record>, StoreError> {
    Ok(serde_json::from_str(body)?)
}

/* ---------------- HTTP client ---------------- */

pub struct SheetClient {
    http: Client,
    mode: WriteMode,
}

impl Default for SheetClient {
    fn default() -> Self { Self::new(WriteMode::default()) }
}

impl fmt::Debug for SheetClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetClient").field("mode", &self.mode).finish()
    }
}

impl SheetClient {
    pub fn new(mode: WriteMode) -> Self {
        Self { http: Client::new(), mode }
    }

    pub fn mode(&self) -> WriteMode { self.mode }
}

impl RemoteStore for SheetClient {
    fn fetch_records(&self, endpoint: &str) -> Result<Vec<Record>, StoreError> {
        let endpoint = endpoint.trim();
        if endpoint.is_empty() {
            return Ok(Vec::new());
        }

        let resp = self
            .http
            .get(endpoint)
            .query(&[("action", READ_ACTION)])
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!("Remote: Read answered {status}");
            return Err(StoreError::Status(status.as_u16()));
        }

        let body = resp.text()?;
        let rows = parse_rows(&body)?;
        tracing::debug!("Remote: Read rows={}", rows.len());
        Ok(rows)
    }

    fn create_record(&self, endpoint: &str, fields: &StudentFields) -> Result<CreateAck, StoreError> {
        let endpoint = endpoint.trim();
        if endpoint.is_empty() {
            return Err(StoreError::NoEndpoint);
        }

        let record = Record::from_fields(fields);
        let body = create_body(&record)?;

        let resp = self
            .http
            .post(endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()?;

        match self.mode {
            WriteMode::Opaque => {
                // The reply is not ours to read; only log what came back.
                tracing::debug!("Remote: Create dispatched id={} status={}", record.id, resp.status());
                Ok(CreateAck::Dispatched(record))
            }
            WriteMode::Confirmed => {
                let status = resp.status();
                if !status.is_success() {
                    return Err(StoreError::Status(status.as_u16()));
                }
                let text = resp.text()?;
                let reply: CreateReply = serde_json::from_str(&text)
                    .map_err(|_| StoreError::Rejected(text.chars().take(120).collect()))?;
                if reply.status.eq_ignore_ascii_case("success") {
                    tracing::debug!("Remote: Create confirmed id={}", record.id);
                    Ok(CreateAck::Confirmed(record))
                } else {
                    Err(StoreError::Rejected(reply.status))
                }
            }
        }
    }
}
