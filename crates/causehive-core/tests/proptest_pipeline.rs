use causehive_core::filter::{AmountRange, DateRange, ProgressRange};
use causehive_core::model::cause::parse_timestamp;
use causehive_core::{Cause, CauseFilter, Selection, SortKey, filter_causes, sort_causes};
use proptest::prelude::*;

const CATEGORIES: &[&str] = &["Education", "Healthcare", "Poverty Relief", "Agriculture", ""];
const STATUSES: &[&str] = &["live", "draft", "closed", "LIVE", ""];
const DAYS: &[&str] = &["2025-01-01", "2025-03-15", "2025-06-30", "2026-01-01"];

fn arb_day() -> impl Strategy<Value = Option<chrono::DateTime<chrono::Utc>>> {
    prop::option::of(prop::sample::select(DAYS)).prop_map(|day| day.and_then(parse_timestamp))
}

fn arb_cause() -> impl Strategy<Value = Cause> {
    (
        0u32..1000,
        "[a-cA-C]{0,3}",
        prop::option::of(0u32..500),
        prop::option::of(0u32..600),
        prop::sample::select(CATEGORIES),
        prop::sample::select(STATUSES),
        arb_day(),
        arb_day(),
    )
        .prop_map(
            |(id, title, target, current, category, status, deadline, created_at)| Cause {
                id: id.to_string(),
                title,
                target_amount: target.map(f64::from),
                current_amount: current.map(f64::from),
                category: category.to_string(),
                status: status.to_string(),
                deadline,
                created_at,
                ..Cause::default()
            },
        )
}

fn arb_filter() -> impl Strategy<Value = CauseFilter> {
    (
        "[a-c]{0,2}",
        prop::option::of(prop::sample::select(&["education", "healthcare", "poverty-relief"][..])),
        prop::option::of(prop::sample::select(&["live", "draft"][..])),
        prop::option::of(0u32..300),
        prop::option::of(200u32..500),
        arb_day(),
        0u32..60,
    )
        .prop_map(|(search, category, status, min, max, end, min_progress)| CauseFilter {
            search,
            category: category.map_or(Selection::Any, |c| Selection::One(c.to_string())),
            status: status.map(str::to_string),
            target: AmountRange {
                min: min.map(f64::from),
                max: max.map(f64::from),
            },
            deadline: DateRange { start: None, end },
            progress: ProgressRange {
                min: f64::from(min_progress),
                max: 100.0,
            },
            ..CauseFilter::default()
        })
}

fn arb_sort_key() -> impl Strategy<Value = SortKey> {
    prop::sample::select(&SortKey::ALL[..])
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(512))]

    #[test]
    fn filter_is_idempotent(
        causes in prop::collection::vec(arb_cause(), 0..24),
        filter in arb_filter(),
    ) {
        let once = filter_causes(&causes, &filter);
        let twice = filter_causes(&once, &filter);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn filter_does_not_mutate_and_keeps_order(
        causes in prop::collection::vec(arb_cause(), 0..24),
        filter in arb_filter(),
    ) {
        let before = causes.clone();
        let kept = filter_causes(&causes, &filter);
        prop_assert_eq!(&causes, &before);

        let mut cursor = before.iter();
        for cause in &kept {
            prop_assert!(cursor.any(|c| c == cause), "filter reordered causes");
        }
    }

    #[test]
    fn sort_is_a_stable_permutation(
        causes in prop::collection::vec(arb_cause(), 0..24),
        key in arb_sort_key(),
    ) {
        // Tag every cause with its input position so ties are observable.
        let tagged: Vec<Cause> = causes
            .into_iter()
            .enumerate()
            .map(|(pos, cause)| Cause { id: pos.to_string(), ..cause })
            .collect();
        let before = tagged.clone();

        let sorted = sort_causes(&tagged, key);
        prop_assert_eq!(&tagged, &before);
        prop_assert_eq!(sorted.len(), tagged.len());

        // Re-sorting the output by the same key must be a no-op, and among
        // neighbors with equal keys the input positions must ascend.
        prop_assert_eq!(&sort_causes(&sorted, key), &sorted);
        for pair in sorted.windows(2) {
            let swapped = sort_causes(&[pair[1].clone(), pair[0].clone()], key);
            let tie = swapped[0] == pair[1];
            if tie {
                let a: usize = pair[0].id.parse().expect("position id");
                let b: usize = pair[1].id.parse().expect("position id");
                prop_assert!(a < b, "{} broke input order for equal keys", key);
            }
        }
    }

    #[test]
    fn progress_is_always_bounded(cause in arb_cause()) {
        let progress = cause.progress();
        prop_assert!((0.0..=100.0).contains(&progress));
    }
}
