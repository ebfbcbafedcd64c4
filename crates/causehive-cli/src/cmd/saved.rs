//! `hive saved`: the saved-causes list.

use crate::output::{OutputMode, render};
use anyhow::Result;
use causehive_core::config::ClientConfig;
use causehive_core::saved::SavedCauses;
use clap::{Args, Subcommand};
use serde::Serialize;
use std::io::Write;

#[derive(Args, Debug)]
pub struct SavedArgs {
    #[command(subcommand)]
    pub command: Option<SavedCommand>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum SavedCommand {
    /// List saved cause ids (default).
    List,
    /// Save a cause.
    Add { id: String },
    /// Unsave a cause.
    Remove { id: String },
    /// Save a cause if it is not saved, otherwise unsave it.
    Toggle { id: String },
    /// Remove every saved cause.
    Clear,
}

#[derive(Debug, Serialize)]
struct SavedReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    changed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    saved: Option<bool>,
    ids: Vec<String>,
}

pub fn run_saved(args: &SavedArgs, output: OutputMode, config: &ClientConfig) -> Result<()> {
    let mut saved = SavedCauses::load(super::open_store(config)?);

    let (changed, state) = match args.command.clone().unwrap_or(SavedCommand::List) {
        SavedCommand::List => (None, None),
        SavedCommand::Add { id } => (Some(saved.save(&id)), Some(true)),
        SavedCommand::Remove { id } => (Some(saved.remove(&id)), Some(false)),
        SavedCommand::Toggle { id } => (Some(true), Some(saved.toggle(&id))),
        SavedCommand::Clear => {
            let had_any = saved.count() > 0;
            saved.clear();
            (Some(had_any), None)
        }
    };

    let report = SavedReport {
        changed,
        saved: state,
        ids: saved.ids().to_vec(),
    };
    render(output, &report, |report, w| {
        if report.ids.is_empty() {
            return writeln!(w, "No saved causes");
        }
        for id in &report.ids {
            writeln!(w, "{id}")?;
        }
        Ok(())
    })
}
