//! Event file writer.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::{EventData, FileHeader};
use crate::error::Result;

/// Writes an event file: the header line, then one line per event.
pub struct EventFileWriter<W: Write> {
    out: W,
    written: usize,
}

impl EventFileWriter<BufWriter<fs::File>> {
    /// Create (or truncate) a file at `path` and write the header.
    pub fn create<P: AsRef<Path>>(path: P, header: &FileHeader) -> Result<Self> {
        let file = fs::File::create(path.as_ref())?;
        Self::new(BufWriter::new(file), header)
    }
}

impl<W: Write> EventFileWriter<W> {
    /// Write the header to `out`.
    pub fn new(mut out: W, header: &FileHeader) -> Result<Self> {
        serde_json::to_writer(&mut out, header)?;
        writeln!(out)?;
        Ok(Self { out, written: 0 })
    }

    pub fn write_event(&mut self, event: &EventData) -> Result<()> {
        serde_json::to_writer(&mut self.out, event)?;
        writeln!(self.out)?;
        self.written += 1;
        Ok(())
    }

    /// Number of events written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush and return the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}
