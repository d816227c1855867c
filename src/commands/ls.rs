//! Ls command handler

use anyhow::Result;
use std::path::PathBuf;

use heist::{ArtFileReader, Config, ListOptions, RecordStatus, RecordSummary};

use super::open_reader;

/// List records, optionally with their element counts at the first event.
#[cfg(not(tarpaulin_include))]
pub fn handle(
    files: &[PathBuf],
    pattern: Option<String>,
    regex: Option<String>,
    counts: bool,
    config: &Config,
) -> Result<()> {
    let mut reader = open_reader(files, config)?;
    let options = config.list_options(pattern, regex);
    for line in listing(&mut reader, &options, counts)? {
        println!("{}", line);
    }
    Ok(())
}

pub(crate) fn listing(
    reader: &mut ArtFileReader,
    options: &ListOptions,
    counts: bool,
) -> Result<Vec<String>> {
    if !counts {
        let names = reader.list_records(options)?;
        return Ok(names.into_iter().map(|name| format!("  {}", name)).collect());
    }
    Ok(reader.ls(options)?.iter().map(format_summary).collect())
}

fn format_summary(summary: &RecordSummary) -> String {
    match &summary.status {
        RecordStatus::Present(Some(n)) => format!(" {:>6} {}", n, summary.name),
        RecordStatus::Present(None) => format!(" {:>6} {}", "-", summary.name),
        RecordStatus::Empty => format!(" {:>6} {}", 0, summary.name),
        RecordStatus::Missing | RecordStatus::Unretrievable(_) => {
            format!("  ????  {}", summary.name)
        }
    }
}
