//! Scan command handler

use anyhow::Result;
use std::path::PathBuf;

use heist::{ArtFileReader, Config, InputTag, Lookup, LoopOptions};

use super::{loop_options, open_reader};
use crate::cli::Selection;

/// Print the element count of one record at every selected event.
#[cfg(not(tarpaulin_include))]
pub fn handle(files: &[PathBuf], tag: &str, selection: &Selection, config: &Config) -> Result<()> {
    let mut reader = open_reader(files, config)?;
    let tag = config.resolve_tag(reader.registry(), tag)?;
    let options = loop_options(selection, config);
    for line in scan(&mut reader, &tag, options, config.reader.short_labels)? {
        println!("{}", line);
    }
    Ok(())
}

/// One line per yielded event: label, then the count or `-` when absent.
pub(crate) fn scan(
    reader: &mut ArtFileReader,
    tag: &InputTag,
    options: LoopOptions,
    short: bool,
) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    reader.event_loop(options)?.for_each(|evt| {
        let count = match evt.lookup(tag)? {
            Lookup::Found(record) => record
                .len()
                .map_or_else(|| "1".to_string(), |n| n.to_string()),
            Lookup::Empty | Lookup::NotFound => "-".to_string(),
            Lookup::Failed(reason) => format!("- ({})", reason),
        };
        lines.push(format!("{}\t{}", evt.label(short)?, count));
        Ok(())
    })?;
    Ok(lines)
}
