//! Info command handler

use anyhow::{Context, Result};
use std::path::PathBuf;

use heist::store::IndexedFile;
use heist::{Config, FileEventSource};

/// Show size, event count and writing process of each file.
#[cfg(not(tarpaulin_include))]
pub fn handle(files: &[PathBuf], config: &Config) -> Result<()> {
    let source = FileEventSource::open(config.registry(), files)
        .context("Failed to index event files")?;
    for line in summary(source.files()) {
        println!("{}", line);
    }
    Ok(())
}

pub(crate) fn summary(files: &[IndexedFile]) -> Vec<String> {
    let mut lines: Vec<String> = files.iter().map(describe).collect();
    if files.len() > 1 {
        let events: usize = files.iter().map(|f| f.event_count).sum();
        let size: u64 = files.iter().map(|f| f.size).sum();
        lines.push(format!(
            "Total: {} files, {} events, {}",
            files.len(),
            events,
            humansize::format_size(size, humansize::BINARY)
        ));
    }
    lines
}

fn describe(file: &IndexedFile) -> String {
    format!(
        "{}: {} events, {} records, {}, process {}",
        file.path.display(),
        file.event_count,
        file.branches.len(),
        humansize::format_size(file.size, humansize::BINARY),
        file.header.process.as_deref().unwrap_or("?")
    )
}
