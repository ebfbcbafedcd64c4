//! Cause list filtering.
//!
//! [`CauseFilter`] is the canonical criteria value. Every rule is combined
//! with AND semantics and an inactive rule admits every cause. Evaluation is
//! a pure predicate: no rule mutates the cause or the filter, and malformed
//! causes never fail the pass (absent fields are read through the defaulting
//! accessors on [`Cause`]).
//!
//! The legacy UI shape with parallel single/multi-select fields lives in
//! [`input::FilterInput`] and is converted once at the boundary.

pub mod input;
pub mod sort;
pub mod summary;

use crate::model::cause::{Cause, slug};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use input::FilterInput;

// ---------------------------------------------------------------------------
// Criteria types
// ---------------------------------------------------------------------------

/// A picker dimension (category or location).
///
/// Values are stored as slugs (`"poverty-relief"`), the same form
/// [`slug`] produces from a cause label.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", content = "values", rename_all = "snake_case")]
pub enum Selection {
    /// No constraint.
    #[default]
    Any,
    /// The legacy single-select value.
    One(String),
    /// The multi-select set, in the order the user picked.
    AnyOf(Vec<String>),
}

impl Selection {
    /// Merge the legacy single-select and the multi-select fields.
    ///
    /// A non-empty multi-select wins; otherwise a single value other than
    /// the `"all"` sentinel; otherwise [`Selection::Any`].
    #[must_use]
    pub fn from_legacy(single: &str, multi: &[String]) -> Self {
        let mut picked: Vec<String> = Vec::with_capacity(multi.len());
        for value in multi.iter().map(|v| slug(v)).filter(|v| !v.is_empty()) {
            if !picked.contains(&value) {
                picked.push(value);
            }
        }
        if !picked.is_empty() {
            return Self::AnyOf(picked);
        }

        let single = slug(single);
        if single.is_empty() || single == "all" {
            Self::Any
        } else {
            Self::One(single)
        }
    }

    /// Returns true if this dimension constrains the list.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self, Self::Any)
    }

    /// Returns true if a cause whose label normalizes to `value` passes.
    ///
    /// Selected values are normalized too, so a hand-built selection such as
    /// `One("Water Sanitation")` behaves like one read from the UI.
    #[must_use]
    pub fn admits(&self, value: &str) -> bool {
        match self {
            Self::Any => true,
            Self::One(expected) => slug(expected) == value,
            Self::AnyOf(set) => set.iter().any(|candidate| slug(candidate) == value),
        }
    }
}

/// Inclusive bounds on the target amount.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AmountRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl AmountRange {
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    #[must_use]
    pub fn contains(&self, amount: f64) -> bool {
        self.min.is_none_or(|min| amount >= min) && self.max.is_none_or(|max| amount <= max)
    }
}

/// Inclusive bounds on the deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| at >= start) && self.end.is_none_or(|end| at <= end)
    }
}

/// Inclusive bounds on funding progress, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressRange {
    pub min: f64,
    pub max: f64,
}

impl ProgressRange {
    pub const FULL: Self = Self {
        min: 0.0,
        max: 100.0,
    };

    /// Anything other than exactly `[0, 100]` counts as active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.min != Self::FULL.min || self.max != Self::FULL.max
    }

    #[must_use]
    pub fn contains(&self, progress: f64) -> bool {
        progress >= self.min && progress <= self.max
    }
}

impl Default for ProgressRange {
    fn default() -> Self {
        Self::FULL
    }
}

/// Filter criteria applied to the cause list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CauseFilter {
    /// Free-text search over title, description, organizer, and category.
    pub search: String,
    pub category: Selection,
    pub location: Selection,
    /// Lower-cased status; `None` stands for the `"all"` sentinel.
    pub status: Option<String>,
    /// Lower-cased urgency; `None` stands for the `"all"` sentinel.
    pub urgency: Option<String>,
    pub target: AmountRange,
    pub deadline: DateRange,
    pub progress: ProgressRange,
}

impl CauseFilter {
    /// Returns true if no rule constrains the list.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        summary::active_filter_count(self) == 0
    }

    /// Trimmed, lower-cased search term, or `None` when search is inactive.
    #[must_use]
    pub fn search_term(&self) -> Option<String> {
        let term = self.search.trim();
        (!term.is_empty()).then(|| term.to_lowercase())
    }

    /// Returns true if the cause satisfies all active criteria.
    #[must_use]
    pub fn matches(&self, cause: &Cause) -> bool {
        if let Some(term) = self.search_term() {
            let haystack = [
                cause.title.as_str(),
                cause.description.as_str(),
                cause.organizer_name.as_str(),
                cause.category.as_str(),
            ]
            .join(" ")
            .to_lowercase();
            if !haystack.contains(&term) {
                return false;
            }
        }
        if self.category.is_active() && !self.category.admits(&cause.category_slug()) {
            return false;
        }
        if self.location.is_active() && !self.location.admits(&cause.location_slug()) {
            return false;
        }
        if let Some(ref status) = self.status {
            if !same_label(&cause.status, status) {
                return false;
            }
        }
        if let Some(ref urgency) = self.urgency {
            if !same_label(&cause.urgency, urgency) {
                return false;
            }
        }
        if self.target.is_active() && !self.target.contains(cause.target_or_zero()) {
            return false;
        }
        if self.deadline.is_active() && !self.deadline.contains(cause.deadline_or_sentinel()) {
            return false;
        }
        self.progress.contains(cause.progress())
    }

    /// Apply this filter to a list of causes.
    ///
    /// Returns a new vec containing only causes that match all active criteria.
    #[must_use]
    pub fn apply(&self, causes: &[Cause]) -> Vec<Cause> {
        causes
            .iter()
            .filter(|cause| self.matches(cause))
            .cloned()
            .collect()
    }
}

/// Case-insensitive exact comparison of enumerated labels.
fn same_label(actual: &str, wanted: &str) -> bool {
    actual.to_lowercase() == wanted.to_lowercase()
}

/// Filter `causes` by `filter`, preserving input order.
#[must_use]
pub fn filter_causes(causes: &[Cause], filter: &CauseFilter) -> Vec<Cause> {
    filter.apply(causes)
}
