//! Cause records and the ingestion boundary that produces them.
//!
//! The backend and older frontend builds disagree on field names (`name` vs
//! `title`, `target_amount` vs `targetAmount`, ...) and on encodings (decimals
//! arrive as strings, ids as numbers). [`RawCause::normalize`] resolves every
//! alias exactly once so the filter and sort engines only ever see the
//! canonical [`Cause`] shape.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Unix timestamp of 2099-12-31T00:00:00Z, used for causes without a deadline.
const FAR_FUTURE_SECS: i64 = 4_102_358_400;

const TITLE_KEYS: &[&str] = &["name", "title"];
const DESCRIPTION_KEYS: &[&str] = &["description"];
const ORGANIZER_KEYS: &[&str] = &["organizer_name", "organizerName", "creator_name"];
const TARGET_KEYS: &[&str] = &["target_amount", "targetAmount"];
const CURRENT_KEYS: &[&str] = &[
    "current_amount",
    "raisedAmount",
    "currentAmount",
    "current_amount_raised",
];
const PROGRESS_KEYS: &[&str] = &["progress_percentage", "progressPercentage"];
const DEADLINE_KEYS: &[&str] = &["deadline", "end_date", "endDate"];
const CREATED_KEYS: &[&str] = &["created_at", "createdAt"];

/// The far-future instant that stands in for a missing deadline.
#[must_use]
pub fn far_future() -> DateTime<Utc> {
    DateTime::from_timestamp(FAR_FUTURE_SECS, 0).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Lower-case a label and collapse whitespace runs into hyphens.
///
/// `"Poverty Relief"` becomes `"poverty-relief"`, matching the values the
/// category and location pickers emit.
#[must_use]
pub fn slug(label: &str) -> String {
    label
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Parse an RFC 3339 timestamp, a naive `YYYY-MM-DDTHH:MM:SS`, or a bare
/// `YYYY-MM-DD` (taken as midnight UTC).
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// A fundraising campaign in canonical form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Cause {
    pub id: String,
    pub title: String,
    pub description: String,
    pub organizer_name: String,
    pub target_amount: Option<f64>,
    pub current_amount: Option<f64>,
    /// Backend-computed progress; when absent it is derived from the amounts.
    pub progress_percentage: Option<f64>,
    pub category: String,
    pub location: String,
    /// Lifecycle label such as `draft`, `live`, or `closed`.
    pub status: String,
    pub urgency: String,
    pub deadline: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Cause {
    /// Target amount, with a missing value read as zero.
    #[must_use]
    pub fn target_or_zero(&self) -> f64 {
        self.target_amount.unwrap_or(0.0)
    }

    /// Deadline, with a missing value read as the far-future sentinel.
    #[must_use]
    pub fn deadline_or_sentinel(&self) -> DateTime<Utc> {
        self.deadline.unwrap_or_else(far_future)
    }

    /// Creation time, with a missing value read as the Unix epoch.
    #[must_use]
    pub fn created_or_epoch(&self) -> DateTime<Utc> {
        self.created_at.unwrap_or_default()
    }

    /// Funding progress in percent, always within `[0, 100]`.
    ///
    /// Uses `progress_percentage` when the backend supplied it; otherwise
    /// `current / target * 100` where a missing or zero target counts as 1.
    #[must_use]
    pub fn progress(&self) -> f64 {
        let raw = self.progress_percentage.unwrap_or_else(|| {
            let current = self.current_amount.unwrap_or(0.0);
            let target = match self.target_amount {
                Some(target) if target != 0.0 => target,
                _ => 1.0,
            };
            current / target * 100.0
        });
        if raw.is_nan() { 0.0 } else { raw.clamp(0.0, 100.0) }
    }

    /// Normalized category used for picker comparisons.
    #[must_use]
    pub fn category_slug(&self) -> String {
        slug(&self.category)
    }

    /// Normalized location used for picker comparisons.
    #[must_use]
    pub fn location_slug(&self) -> String {
        slug(&self.location)
    }
}

/// A cause object exactly as received, before alias resolution.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawCause {
    fields: Map<String, Value>,
}

impl RawCause {
    /// Wrap a JSON value; returns `None` for anything that is not an object.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    /// First alias holding something other than `null` or an empty string.
    fn first(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter()
            .filter_map(|key| self.fields.get(*key))
            .find(|value| match value {
                Value::Null => false,
                Value::String(s) => !s.trim().is_empty(),
                _ => true,
            })
    }

    fn text(&self, keys: &[&str]) -> String {
        match self.first(keys) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }

    fn amount(&self, keys: &[&str]) -> Option<f64> {
        let amount = match self.first(keys)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        amount.filter(|value| value.is_finite())
    }

    fn timestamp(&self, keys: &[&str]) -> Option<DateTime<Utc>> {
        match self.first(keys)? {
            Value::String(s) => parse_timestamp(s),
            Value::Number(n) => n.as_i64().and_then(|ms| DateTime::from_timestamp_millis(ms)),
            _ => None,
        }
    }

    /// Resolve every legacy alias into the canonical record.
    #[must_use]
    pub fn normalize(&self) -> Cause {
        Cause {
            id: self.text(&["id"]),
            title: self.text(TITLE_KEYS),
            description: self.text(DESCRIPTION_KEYS),
            organizer_name: self.text(ORGANIZER_KEYS),
            target_amount: self.amount(TARGET_KEYS),
            current_amount: self.amount(CURRENT_KEYS),
            progress_percentage: self.amount(PROGRESS_KEYS),
            category: self.text(&["category"]),
            location: self.text(&["location"]),
            status: self.text(&["status"]),
            urgency: self.text(&["urgency"]),
            deadline: self.timestamp(DEADLINE_KEYS),
            created_at: self.timestamp(CREATED_KEYS),
        }
    }
}

/// Normalize a batch of causes from a JSON value.
///
/// Accepts a bare array or a paginated `{"results": [...]}` envelope.
/// Entries that are not objects are skipped with a warning.
#[must_use]
pub fn normalize_causes(value: Value) -> Vec<Cause> {
    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(mut envelope) => match envelope.remove("results") {
            Some(Value::Array(entries)) => entries,
            Some(_) | None => vec![Value::Object(envelope)],
        },
        other => {
            tracing::warn!(kind = %json_kind(&other), "cause payload is neither array nor object");
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let kind = json_kind(&entry);
            let raw = RawCause::from_value(entry);
            if raw.is_none() {
                tracing::warn!(index, kind, "skipping non-object cause entry");
            }
            raw
        })
        .map(|raw| raw.normalize())
        .collect()
}

/// Parse and normalize a JSON cause payload.
///
/// # Errors
///
/// Returns an error only when `json` is not syntactically valid JSON.
pub fn parse_causes(json: &str) -> Result<Vec<Cause>> {
    let value: Value = serde_json::from_str(json).context("cause payload is not valid JSON")?;
    Ok(normalize_causes(value))
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
