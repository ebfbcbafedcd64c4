//! Cause list ordering.
//!
//! Sorting always works on a copy and uses a stable sort, so causes with
//! equal keys keep their input order under every key.

use crate::model::cause::Cause;
use anyhow::{Result, bail};
use icu_collator::{Collator, CollatorOptions, Strength};
use icu_provider::DataLocale;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sort key selected in the list toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// `created_at` descending; missing timestamps sort as the epoch.
    #[default]
    Newest,
    /// `created_at` ascending.
    Oldest,
    /// Target amount descending; missing targets sort as zero.
    TargetHigh,
    /// Target amount ascending.
    TargetLow,
    /// Computed progress descending.
    ProgressHigh,
    /// Computed progress ascending.
    ProgressLow,
    /// Deadline ascending; missing deadlines sort last.
    DeadlineSoon,
    /// Title ascending by collation order, ignoring case.
    Alphabetical,
}

impl SortKey {
    pub const ALL: [Self; 8] = [
        Self::Newest,
        Self::Oldest,
        Self::TargetHigh,
        Self::TargetLow,
        Self::ProgressHigh,
        Self::ProgressLow,
        Self::DeadlineSoon,
        Self::Alphabetical,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::TargetHigh => "target-high",
            Self::TargetLow => "target-low",
            Self::ProgressHigh => "progress-high",
            Self::ProgressLow => "progress-low",
            Self::DeadlineSoon => "deadline-soon",
            Self::Alphabetical => "alphabetical",
        }
    }

    /// Exact picker tag lookup; no trimming or case folding.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == tag)
    }

    /// Label shown in the sort picker.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Newest => "Newest first",
            Self::Oldest => "Oldest first",
            Self::TargetHigh => "Highest target",
            Self::TargetLow => "Lowest target",
            Self::ProgressHigh => "Most funded",
            Self::ProgressLow => "Least funded",
            Self::DeadlineSoon => "Ending soon",
            Self::Alphabetical => "A-Z",
        }
    }

    /// Next key in picker order, wrapping around.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Newest => Self::Oldest,
            Self::Oldest => Self::TargetHigh,
            Self::TargetHigh => Self::TargetLow,
            Self::TargetLow => Self::ProgressHigh,
            Self::ProgressHigh => Self::ProgressLow,
            Self::ProgressLow => Self::DeadlineSoon,
            Self::DeadlineSoon => Self::Alphabetical,
            Self::Alphabetical => Self::Newest,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let tag = s.trim().to_ascii_lowercase();
        if let Some(key) = Self::ALL.into_iter().find(|key| key.as_str() == tag) {
            return Ok(key);
        }
        bail!(
            "unknown sort key '{}': expected one of {}",
            s.trim(),
            Self::ALL.map(Self::as_str).join(", ")
        )
    }
}

/// Return a copy of `causes` ordered by `key`.
#[must_use]
pub fn sort_causes(causes: &[Cause], key: SortKey) -> Vec<Cause> {
    let mut sorted = causes.to_vec();
    match key {
        SortKey::Newest => {
            sorted.sort_by(|a, b| b.created_or_epoch().cmp(&a.created_or_epoch()));
        }
        SortKey::Oldest => {
            sorted.sort_by_key(Cause::created_or_epoch);
        }
        SortKey::TargetHigh => {
            sorted.sort_by(|a, b| b.target_or_zero().total_cmp(&a.target_or_zero()));
        }
        SortKey::TargetLow => {
            sorted.sort_by(|a, b| a.target_or_zero().total_cmp(&b.target_or_zero()));
        }
        SortKey::ProgressHigh => {
            sorted.sort_by(|a, b| b.progress().total_cmp(&a.progress()));
        }
        SortKey::ProgressLow => {
            sorted.sort_by(|a, b| a.progress().total_cmp(&b.progress()));
        }
        SortKey::DeadlineSoon => {
            sorted.sort_by_key(Cause::deadline_or_sentinel);
        }
        SortKey::Alphabetical => match title_collator() {
            Some(collator) => sorted.sort_by(|a, b| collator.compare(&a.title, &b.title)),
            None => sorted.sort_by_cached_key(|cause| cause.title.to_lowercase()),
        },
    }
    sorted
}

/// Root-locale collator at secondary strength: accents count, case does not.
fn title_collator() -> Option<Collator> {
    let mut options = CollatorOptions::new();
    options.strength = Some(Strength::Secondary);
    match Collator::try_new(&DataLocale::default(), options) {
        Ok(collator) => Some(collator),
        Err(err) => {
            tracing::warn!("collation data unavailable, comparing lowercased titles: {err}");
            None
        }
    }
}

/// Order by a raw picker tag; an unrecognized tag leaves the order untouched.
#[must_use]
pub fn sort_causes_by_tag(causes: &[Cause], tag: &str) -> Vec<Cause> {
    match SortKey::from_tag(tag) {
        Some(key) => sort_causes(causes, key),
        None => {
            tracing::debug!(tag, "unknown sort tag, keeping input order");
            causes.to_vec()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::cause::parse_timestamp;

    fn cause(title: &str) -> Cause {
        Cause {
            id: title.to_string(),
            title: title.to_string(),
            ..Cause::default()
        }
    }

    fn titles(causes: &[Cause]) -> Vec<&str> {
        causes.iter().map(|c| c.title.as_str()).collect()
    }

    #[test]
    fn tags_parse_and_display_round_trip() {
        for key in SortKey::ALL {
            assert_eq!(key.as_str().parse::<SortKey>().expect("known tag"), key);
            assert_eq!(key.to_string(), key.as_str());
        }
        assert_eq!(
            " Target-High ".parse::<SortKey>().expect("case-insensitive"),
            SortKey::TargetHigh
        );
        assert!("popularity".parse::<SortKey>().is_err());
    }

    #[test]
    fn next_cycles_through_every_key() {
        let mut key = SortKey::default();
        let mut seen = Vec::new();
        for _ in 0..SortKey::ALL.len() {
            seen.push(key);
            key = key.next();
        }
        assert_eq!(key, SortKey::Newest);
        assert_eq!(seen, SortKey::ALL);
    }

    #[test]
    fn newest_and_oldest_treat_missing_as_epoch() {
        let causes = vec![
            Cause {
                created_at: parse_timestamp("2025-02-01"),
                ..cause("Feb")
            },
            cause("Undated"),
            Cause {
                created_at: parse_timestamp("2025-03-01"),
                ..cause("Mar")
            },
        ];
        assert_eq!(
            titles(&sort_causes(&causes, SortKey::Newest)),
            ["Mar", "Feb", "Undated"]
        );
        assert_eq!(
            titles(&sort_causes(&causes, SortKey::Oldest)),
            ["Undated", "Feb", "Mar"]
        );
    }

    #[test]
    fn target_sorts_treat_missing_as_zero() {
        let causes = vec![
            Cause {
                target_amount: Some(500.0),
                ..cause("Mid")
            },
            cause("None"),
            Cause {
                target_amount: Some(9000.0),
                ..cause("Big")
            },
        ];
        assert_eq!(
            titles(&sort_causes(&causes, SortKey::TargetHigh)),
            ["Big", "Mid", "None"]
        );
        assert_eq!(
            titles(&sort_causes(&causes, SortKey::TargetLow)),
            ["None", "Mid", "Big"]
        );
    }

    #[test]
    fn progress_sorts_use_computed_progress() {
        let causes = vec![
            Cause {
                target_amount: Some(100.0),
                current_amount: Some(10.0),
                ..cause("Ten")
            },
            Cause {
                progress_percentage: Some(90.0),
                ..cause("Ninety")
            },
            Cause {
                target_amount: Some(100.0),
                current_amount: Some(40.0),
                ..cause("Forty")
            },
        ];
        assert_eq!(
            titles(&sort_causes(&causes, SortKey::ProgressHigh)),
            ["Ninety", "Forty", "Ten"]
        );
        assert_eq!(
            titles(&sort_causes(&causes, SortKey::ProgressLow)),
            ["Ten", "Forty", "Ninety"]
        );
    }

    #[test]
    fn deadline_soon_puts_open_ended_last() {
        let causes = vec![
            cause("Open"),
            Cause {
                deadline: parse_timestamp("2026-01-01"),
                ..cause("Later")
            },
            Cause {
                deadline: parse_timestamp("2025-01-01"),
                ..cause("Sooner")
            },
        ];
        assert_eq!(
            titles(&sort_causes(&causes, SortKey::DeadlineSoon)),
            ["Sooner", "Later", "Open"]
        );
    }

    #[test]
    fn alphabetical_ignores_case() {
        let causes = vec![cause("banana"), cause("Apple"), cause("cherry")];
        assert_eq!(
            titles(&sort_causes(&causes, SortKey::Alphabetical)),
            ["Apple", "banana", "cherry"]
        );
    }

    #[test]
    fn alphabetical_collates_accented_titles() {
        let causes = vec![
            cause("Zongo Water"),
            cause("Éducation pour tous"),
            cause("Apple"),
            cause("école Nkwanta"),
            cause("Ewe Library"),
        ];
        assert_eq!(
            titles(&sort_causes(&causes, SortKey::Alphabetical)),
            ["Apple", "école Nkwanta", "Éducation pour tous", "Ewe Library", "Zongo Water"]
        );
    }

    #[test]
    fn ties_keep_input_order() {
        let causes: Vec<Cause> = ["x", "X", "x"]
            .into_iter()
            .enumerate()
            .map(|(pos, title)| Cause {
                id: format!("c{pos}"),
                title: title.to_string(),
                ..Cause::default()
            })
            .collect();
        for key in SortKey::ALL {
            let sorted = sort_causes(&causes, key);
            let ids: Vec<_> = sorted.iter().map(|c| c.id.as_str()).collect();
            assert_eq!(ids, ["c0", "c1", "c2"], "{key} reordered equal keys");
        }
    }

    #[test]
    fn unknown_tag_is_identity() {
        let causes = vec![cause("b"), cause("a")];
        assert_eq!(titles(&sort_causes_by_tag(&causes, "popularity")), ["b", "a"]);
        assert_eq!(titles(&sort_causes_by_tag(&causes, "alphabetical")), ["a", "b"]);
        assert_eq!(titles(&sort_causes_by_tag(&causes, "Alphabetical")), ["b", "a"]);
        assert_eq!(titles(&sort_causes_by_tag(&causes, " alphabetical")), ["b", "a"]);
        assert_eq!(SortKey::from_tag("target-high"), Some(SortKey::TargetHigh));
        assert_eq!(SortKey::from_tag("Target-High"), None);
    }

    #[test]
    fn sorting_does_not_mutate_input() {
        let causes = vec![cause("b"), cause("a")];
        let before = causes.clone();
        let _ = sort_causes(&causes, SortKey::Alphabetical);
        assert_eq!(causes, before);
    }
}
