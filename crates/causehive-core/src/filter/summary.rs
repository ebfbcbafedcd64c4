//! Derived presentation helpers: the active-filter badge count and the
//! summary chips shown above the list.

use super::{CauseFilter, Selection};

/// Currency prefix used for amount chips.
pub const CURRENCY_SYMBOL: &str = "GH₵";

/// Number of independent filter dimensions that are active.
///
/// Each dimension contributes at most one, whichever picker variant set it.
#[must_use]
pub fn active_filter_count(filter: &CauseFilter) -> usize {
    [
        filter.search_term().is_some(),
        filter.category.is_active(),
        filter.location.is_active(),
        filter.status.is_some(),
        filter.urgency.is_some(),
        filter.target.is_active(),
        filter.deadline.is_active(),
        filter.progress.is_active(),
    ]
    .into_iter()
    .filter(|active| *active)
    .count()
}

/// Human-readable chips, one per active dimension, in toolbar order.
#[must_use]
pub fn filters_summary(filter: &CauseFilter) -> Vec<String> {
    let mut summary = Vec::new();

    if filter.search_term().is_some() {
        summary.push(format!("Search: \"{}\"", filter.search.trim()));
    }
    if let Some(chip) = selection_chip(&filter.category, "Category", "Categories") {
        summary.push(chip);
    }
    if let Some(chip) = selection_chip(&filter.location, "Location", "Locations") {
        summary.push(chip);
    }
    if let Some(ref status) = filter.status {
        summary.push(format!("Status: {status}"));
    }
    if let Some(ref urgency) = filter.urgency {
        summary.push(format!("Urgency: {urgency}"));
    }

    match (filter.target.min, filter.target.max) {
        (Some(min), Some(max)) => summary.push(format!(
            "Amount: {CURRENCY_SYMBOL}{} - {CURRENCY_SYMBOL}{}",
            amount(min),
            amount(max)
        )),
        (Some(min), None) => summary.push(format!("Min Amount: {CURRENCY_SYMBOL}{}", amount(min))),
        (None, Some(max)) => summary.push(format!("Max Amount: {CURRENCY_SYMBOL}{}", amount(max))),
        (None, None) => {}
    }

    let day = |at: chrono::DateTime<chrono::Utc>| at.format("%Y-%m-%d").to_string();
    match (filter.deadline.start, filter.deadline.end) {
        (Some(start), Some(end)) => {
            summary.push(format!("Deadline: {} to {}", day(start), day(end)));
        }
        (Some(start), None) => summary.push(format!("Deadline from: {}", day(start))),
        (None, Some(end)) => summary.push(format!("Deadline until: {}", day(end))),
        (None, None) => {}
    }

    if filter.progress.is_active() {
        summary.push(format!(
            "Progress: {}% - {}%",
            amount(filter.progress.min),
            amount(filter.progress.max)
        ));
    }

    summary
}

/// Slug back to a label: `"poverty-relief"` → `"poverty relief"`.
fn label(value: &str) -> String {
    value.replace('-', " ")
}

fn selection_chip(selection: &Selection, singular: &str, plural: &str) -> Option<String> {
    match selection {
        Selection::Any => None,
        Selection::One(value) => Some(format!("{singular}: {}", label(value))),
        Selection::AnyOf(values) => {
            let labels: Vec<String> = values.iter().map(|v| label(v)).collect();
            Some(format!("{plural}: {}", labels.join(", ")))
        }
    }
}

/// `500.0` → `"500"`, `12.5` → `"12.5"`.
fn amount(value: f64) -> String {
    format!("{value}")
}
