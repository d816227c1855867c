//! Command handlers for the heist CLI.
//!
//! Each submodule handles one CLI command or command group.
//! The dispatch itself lives in main.rs.

pub mod completions;
pub mod config;
pub mod events;
pub mod info;
pub mod ls;
pub mod scan;

use anyhow::{Context, Result};
use std::path::PathBuf;

use heist::{ArtFileReader, Config, LoopOptions};

use crate::cli::Selection;

/// Open a reader over `files` with the config's types and hidden records.
pub fn open_reader(files: &[PathBuf], config: &Config) -> Result<ArtFileReader> {
    let reader = ArtFileReader::open(config.registry(), files)
        .with_context(|| format!("Failed to open {}", describe_files(files)))?;
    Ok(reader.with_hidden(config.listing.hidden.clone()))
}

/// Loop options from command-line selection, falling back to `[reader]`.
pub fn loop_options(selection: &Selection, config: &Config) -> LoopOptions {
    LoopOptions {
        selected: selection.select.iter().copied().collect(),
        max_count: selection.max.or(config.reader.max_events),
    }
}

/// "run42.events" or "3 files".
fn describe_files(files: &[PathBuf]) -> String {
    match files {
        [single] => single.display().to_string(),
        _ => format!("{} files", files.len()),
    }
}
