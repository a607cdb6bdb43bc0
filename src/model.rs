// src/model.rs
//
// Student records as the spreadsheet bridge stores them, plus the entry-form
// fields that produce them.
//
// The bridge is a passive row store: rows come back keyed by the sheet's
// header line, and a sheet is free to retype cells (an id written as text can
// come back as a number, an empty cell as null). Reading is therefore lenient:
// every field is taken as text, whatever JSON scalar it arrived as.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ValidationError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub full_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub class_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub dob: String,
    /// Absent for rows written before the column existed.
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<String>,
}

impl Record {
    /// Build a fresh record from entry fields: new unique id, stamped now.
    pub fn from_fields(fields: &StudentFields) -> Self {
        Self::from_fields_at(fields, Utc::now())
    }

    pub fn from_fields_at(fields: &StudentFields, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            full_name: fields.full_name.clone(),
            class_name: fields.class_name.clone(),
            dob: fields.dob.clone(),
            created_at: Some(now.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)),
        }
    }

    /// Parsed creation time. `None` when absent or not RFC 3339.
    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.created_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Case-insensitive match on name or class. Empty term matches everything.
    pub fn matches(&self, term: &str) -> bool {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.full_name.to_lowercase().contains(&needle)
            || self.class_name.to_lowercase().contains(&needle)
    }

    pub fn dob_display(&self) -> String {
        display_date(&self.dob).unwrap_or_else(|| self.dob.clone())
    }

    pub fn created_display(&self) -> String {
        match (&self.created_at, self.created()) {
            (_, Some(dt)) => dt.format("%d/%m/%Y").to_string(),
            (Some(raw), None) => display_date(raw).unwrap_or_else(|| raw.clone()),
            (None, None) => "N/A".to_string(),
        }
    }
}

/// Stable, newest first. Records without a usable timestamp go last.
pub fn sort_newest_first(records: &mut [Record]) {
    // Option orders None below Some, so reversing puts untimed rows at the end.
    records.sort_by(|a, b| b.created().cmp(&a.created()));
}

pub fn filter<'a>(records: &'a [Record], term: &str) -> Vec<&'a Record> {
    records.iter().filter(|r| r.matches(term)).collect()
}

/// "2010-05-04" or "2010-05-04T17:00:00.000Z" → "04/05/2010".
fn display_date(raw: &str) -> Option<String> {
    let s = raw.trim();
    let head = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(head, "%Y-%m-%d")
        .ok()
        .map(|d| d.format("%d/%m/%Y").to_string())
}

/* ---------------- Entry fields ---------------- */

/// What the entry form submits. Id and timestamp are added by the store client.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StudentFields {
    pub full_name: String,
    /// Upper-cased by the form as the user types.
    pub class_name: String,
    /// `YYYY-MM-DD`
    pub dob: String,
}

impl StudentFields {
    pub fn new(full_name: impl Into<String>, class_name: impl Into<String>, dob: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            class_name: class_name.into(),
            dob: dob.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.full_name.trim().is_empty() {
            return Err(ValidationError::MissingField("full name"));
        }
        if self.class_name.trim().is_empty() {
            return Err(ValidationError::MissingField("class"));
        }
        if self.dob.trim().is_empty() {
            return Err(ValidationError::MissingField("date of birth"));
        }
        if NaiveDate::parse_from_str(self.dob.trim(), "%Y-%m-%d").is_err() {
            return Err(ValidationError::InvalidDate(self.dob.clone()));
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/* ---------------- Lenient cell decoding ---------------- */

fn cell_text(v: Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(cell_text(Value::deserialize(d)?).unwrap_or_default())
}

fn lenient_opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(cell_text(Value::deserialize(d)?).filter(|s| !s.trim().is_empty()))
}
