//! `hive list`: filter, sort, and print causes.

use crate::output::{OutputMode, pretty_kv, pretty_rule, pretty_section, render_mode};
use anyhow::Result;
use causehive_core::config::ClientConfig;
use causehive_core::filter::input::ALL;
use causehive_core::saved::SavedCauses;
use causehive_core::{
    Cause, FilterInput, SortKey, active_filter_count, filter_causes, filters_summary,
    sort_causes,
};
use clap::Args;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Read causes from a JSON file instead of the API.
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// API page to fetch.
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Free-text search over title, description, organizer, and category.
    #[arg(short, long)]
    pub search: Option<String>,

    /// Category slug; repeat to allow several.
    #[arg(short, long)]
    pub category: Vec<String>,

    /// Location slug; repeat to allow several.
    #[arg(short, long)]
    pub location: Vec<String>,

    #[arg(long)]
    pub status: Option<String>,

    #[arg(long)]
    pub urgency: Option<String>,

    /// Minimum target amount (inclusive).
    #[arg(long)]
    pub min_target: Option<String>,

    /// Maximum target amount (inclusive).
    #[arg(long)]
    pub max_target: Option<String>,

    /// Earliest deadline, YYYY-MM-DD.
    #[arg(long)]
    pub from: Option<String>,

    /// Latest deadline, YYYY-MM-DD.
    #[arg(long)]
    pub until: Option<String>,

    #[arg(long, default_value_t = 0.0)]
    pub min_progress: f64,

    #[arg(long, default_value_t = 100.0)]
    pub max_progress: f64,

    /// Sort order.
    #[arg(long, default_value_t = SortKey::Newest)]
    pub sort: SortKey,

    /// Only causes in the saved list.
    #[arg(long)]
    pub saved: bool,

    /// Maximum causes to show.
    #[arg(short = 'n', long, default_value = "50")]
    pub limit: usize,
}

impl ListArgs {
    /// The equivalent UI filter state.
    pub fn filter_input(&self) -> FilterInput {
        let pick = |value: &Option<String>| value.clone().unwrap_or_else(|| ALL.to_string());
        FilterInput {
            search: self.search.clone().unwrap_or_default(),
            categories: self.category.clone(),
            locations: self.location.clone(),
            status: pick(&self.status),
            urgency: pick(&self.urgency),
            sort_by: self.sort.to_string(),
            min_target: self.min_target.clone().unwrap_or_default(),
            max_target: self.max_target.clone().unwrap_or_default(),
            start_date: self.from.clone().unwrap_or_default(),
            end_date: self.until.clone().unwrap_or_default(),
            min_progress: self.min_progress,
            max_progress: self.max_progress,
            ..FilterInput::default()
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CauseRow {
    pub id: String,
    pub title: String,
    pub category: String,
    pub location: String,
    pub status: String,
    pub target_amount: f64,
    pub progress: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
}

impl From<&Cause> for CauseRow {
    fn from(cause: &Cause) -> Self {
        Self {
            id: cause.id.clone(),
            title: cause.title.clone(),
            category: cause.category.clone(),
            location: cause.location.clone(),
            status: cause.status.clone(),
            target_amount: cause.target_or_zero(),
            progress: (cause.progress() * 10.0).round() / 10.0,
            deadline: cause.deadline.map(|d| d.format("%Y-%m-%d").to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListReport {
    pub total: usize,
    pub matched: usize,
    pub sort: SortKey,
    pub active_filters: usize,
    pub summary: Vec<String>,
    pub causes: Vec<CauseRow>,
}

/// Filter and sort `causes` the way the cause list view does.
pub fn build_report(causes: &[Cause], args: &ListArgs, saved: Option<&[String]>) -> ListReport {
    let filter = args.filter_input().to_filter();
    let mut matched = filter_causes(causes, &filter);
    if let Some(saved) = saved {
        matched.retain(|cause| saved.contains(&cause.id));
    }
    let sorted = sort_causes(&matched, args.sort);

    ListReport {
        total: causes.len(),
        matched: sorted.len(),
        sort: args.sort,
        active_filters: active_filter_count(&filter),
        summary: filters_summary(&filter),
        causes: sorted.iter().take(args.limit).map(CauseRow::from).collect(),
    }
}

pub fn run_list(args: &ListArgs, output: OutputMode, config: &ClientConfig) -> Result<()> {
    let causes = super::load_causes(config, args.file.as_deref(), args.page)?;
    let saved = if args.saved {
        let store = super::open_store(config)?;
        Some(SavedCauses::load(store).ids().to_vec())
    } else {
        None
    };

    let report = build_report(&causes, args, saved.as_deref());
    tracing::info!(
        total = report.total,
        matched = report.matched,
        active_filters = report.active_filters,
        "listed causes"
    );
    render_mode(output, &report, write_text, write_pretty)
}

fn write_text(report: &ListReport, w: &mut dyn Write) -> io::Result<()> {
    if report.causes.is_empty() {
        return Ok(());
    }
    writeln!(w, "id\ttitle\tcategory\tstatus\ttarget\tprogress")?;
    for row in &report.causes {
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}",
            row.id, row.title, row.category, row.status, row.target_amount, row.progress
        )?;
    }
    Ok(())
}

fn write_pretty(report: &ListReport, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(
        w,
        &format!(
            "Causes ({} of {}, sorted by {})",
            report.matched,
            report.total,
            report.sort.label()
        ),
    )?;
    if report.active_filters > 0 {
        pretty_kv(w, "Filters", report.active_filters.to_string())?;
        for chip in &report.summary {
            writeln!(w, "  • {chip}")?;
        }
        pretty_rule(w)?;
    }
    if report.causes.is_empty() {
        writeln!(w, "No causes match these filters.")?;
        return Ok(());
    }
    for row in &report.causes {
        writeln!(w, "{:<8} {}", row.id, row.title)?;
        let mut meta = vec![format!("{:>5.1}%", row.progress)];
        if !row.category.is_empty() {
            meta.push(row.category.clone());
        }
        if !row.location.is_empty() {
            meta.push(row.location.clone());
        }
        if let Some(deadline) = &row.deadline {
            meta.push(format!("due {deadline}"));
        }
        writeln!(w, "         {}", meta.join(" · "))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use causehive_core::parse_causes;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: ListArgs,
    }

    fn args(argv: &[&str]) -> ListArgs {
        let mut full = vec!["test"];
        full.extend_from_slice(argv);
        Wrapper::parse_from(full).args
    }

    const CAUSES: &str = r#"[
        {"id": 1, "title": "A", "target_amount": 100, "current_amount": 50,
         "category": "Health", "status": "live"},
        {"id": 2, "title": "B", "target_amount": 200, "current_amount": 20,
         "category": "Education", "status": "draft"},
        {"id": 3, "title": "C", "target_amount": 300, "current_amount": 300,
         "category": "Education", "status": "live"}
    ]"#;

    #[test]
    fn list_args_defaults() {
        let a = args(&[]);
        assert!(a.file.is_none());
        assert!(a.category.is_empty());
        assert_eq!(a.sort, SortKey::Newest);
        assert_eq!(a.limit, 50);
        assert!(a.filter_input().to_filter().is_empty());
    }

    #[test]
    fn flags_become_filter_input() {
        let a = args(&["--category", "education", "--status", "Live", "--min-target", "150"]);
        let input = a.filter_input();
        assert_eq!(input.categories, ["education"]);
        assert_eq!(input.category, ALL);
        assert_eq!(input.status, "Live");
        assert_eq!(input.min_target, "150");
    }

    #[test]
    fn report_filters_sorts_and_summarizes() {
        let causes = parse_causes(CAUSES).expect("valid");
        let a = args(&["--status", "live", "--sort", "target-high"]);
        let report = build_report(&causes, &a, None);
        assert_eq!(report.total, 3);
        assert_eq!(report.matched, 2);
        let titles: Vec<&str> = report.causes.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["C", "A"]);
        assert_eq!(report.active_filters, 1);
        assert_eq!(report.summary, ["Status: live"]);
        assert!((report.causes[1].progress - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn saved_only_and_limit() {
        let causes = parse_causes(CAUSES).expect("valid");
        let saved = vec!["2".to_string(), "3".to_string()];
        let a = args(&["--sort", "alphabetical", "-n", "1"]);
        let report = build_report(&causes, &a, Some(&saved));
        assert_eq!(report.matched, 2);
        assert_eq!(report.causes.len(), 1);
        assert_eq!(report.causes[0].title, "B");
    }

    #[test]
    fn unknown_sort_is_rejected() {
        let parsed = Wrapper::try_parse_from(["test", "--sort", "random"]);
        assert!(parsed.is_err());
    }
}
