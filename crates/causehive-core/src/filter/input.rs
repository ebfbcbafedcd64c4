//! The filter state as the UI holds it.
//!
//! Pickers, sliders, and query strings speak this legacy camelCase shape:
//! parallel `category`/`categories` fields, the `"all"` sentinel, and amounts
//! that may be typed as strings. [`CauseFilter::from`] migrates it into the
//! canonical criteria in one place.

use super::{AmountRange, CauseFilter, DateRange, ProgressRange, Selection};
use crate::model::cause::parse_timestamp;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The `"all"` sentinel used by single-select pickers.
pub const ALL: &str = "all";

/// Filter state as created at view mount and mutated by user interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterInput {
    pub search: String,
    pub category: String,
    pub categories: Vec<String>,
    pub location: String,
    pub locations: Vec<String>,
    pub status: String,
    pub urgency: String,
    pub sort_by: String,
    #[serde(deserialize_with = "text_or_number")]
    pub min_target: String,
    #[serde(deserialize_with = "text_or_number")]
    pub max_target: String,
    pub start_date: String,
    pub end_date: String,
    pub min_progress: f64,
    pub max_progress: f64,
}

impl Default for FilterInput {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: ALL.to_string(),
            categories: Vec::new(),
            location: ALL.to_string(),
            locations: Vec::new(),
            status: ALL.to_string(),
            urgency: ALL.to_string(),
            sort_by: "newest".to_string(),
            min_target: String::new(),
            max_target: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            min_progress: ProgressRange::FULL.min,
            max_progress: ProgressRange::FULL.max,
        }
    }
}

impl FilterInput {
    /// Reset every field to its view-mount default.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Canonical criteria for this input.
    #[must_use]
    pub fn to_filter(&self) -> CauseFilter {
        CauseFilter::from(self.clone())
    }
}

impl From<FilterInput> for CauseFilter {
    fn from(input: FilterInput) -> Self {
        Self {
            search: input.search,
            category: Selection::from_legacy(&input.category, &input.categories),
            location: Selection::from_legacy(&input.location, &input.locations),
            status: enumerated(&input.status),
            urgency: enumerated(&input.urgency),
            target: AmountRange {
                min: amount("minTarget", &input.min_target),
                max: amount("maxTarget", &input.max_target),
            },
            deadline: DateRange {
                start: date("startDate", &input.start_date),
                end: date("endDate", &input.end_date),
            },
            progress: ProgressRange {
                min: finite_or(input.min_progress, ProgressRange::FULL.min),
                max: finite_or(input.max_progress, ProgressRange::FULL.max),
            },
        }
    }
}

fn enumerated(raw: &str) -> Option<String> {
    let value = raw.trim().to_lowercase();
    (!value.is_empty() && value != ALL).then_some(value)
}

fn amount(field: &str, raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            tracing::debug!(field, raw, "ignoring non-numeric amount bound");
            None
        }
    }
}

fn date(field: &str, raw: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    if raw.trim().is_empty() {
        return None;
    }
    let parsed = parse_timestamp(raw);
    if parsed.is_none() {
        tracing::debug!(field, raw, "ignoring unparsable date bound");
    }
    parsed
}

const fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}
