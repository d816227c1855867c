//! Events command handler

use anyhow::Result;
use std::path::PathBuf;

use heist::{ArtFileReader, Config, LoopOptions};

use super::{loop_options, open_reader};
use crate::cli::Selection;

/// Print the label of every selected event.
#[cfg(not(tarpaulin_include))]
pub fn handle(files: &[PathBuf], selection: &Selection, short: bool, config: &Config) -> Result<()> {
    let mut reader = open_reader(files, config)?;
    let short = short || config.reader.short_labels;
    for line in labels(&mut reader, loop_options(selection, config), short)? {
        println!("{}", line);
    }
    Ok(())
}

/// Labels of the events a loop with `options` yields.
pub(crate) fn labels(
    reader: &mut ArtFileReader,
    options: LoopOptions,
    short: bool,
) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    reader.event_loop(options)?.for_each(|evt| {
        lines.push(evt.label(short)?);
        Ok(())
    })?;
    Ok(lines)
}
