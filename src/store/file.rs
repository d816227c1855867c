//! Event files on disk.
//!
//! Every file is indexed when the source opens: the header is validated,
//! events are counted and branch names collected. Indexing runs on the rayon
//! pool, one file per task. Event payloads are then loaded one file at a time
//! as the position crosses file boundaries.

use std::collections::HashSet;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{branch_getter, EventData, EventSource, ProductGetter};
use crate::error::{HeistError, Result};
use crate::types::{Registry, TypeHandle};

/// Value of the header's `format` field.
pub const FORMAT_NAME: &str = "heist";

/// Supported header `version`.
pub const FORMAT_VERSION: u32 = 1;

/// First line of an event file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHeader {
    pub format: String,
    pub version: u32,
    /// Name of the process that wrote the file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process: Option<String>,
    /// Branches declared up front; products found in events are added on top
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<String>,
}

impl FileHeader {
    pub fn new(process: Option<String>) -> Self {
        Self {
            format: FORMAT_NAME.to_string(),
            version: FORMAT_VERSION,
            process,
            branches: Vec::new(),
        }
    }
}

impl Default for FileHeader {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Summary of one event file, gathered when the source opens.
#[derive(Debug, Clone)]
pub struct IndexedFile {
    pub path: PathBuf,
    pub header: FileHeader,
    pub event_count: usize,
    pub branches: Vec<String>,
    /// Size on disk in bytes
    pub size: u64,
}

/// Index one event file.
fn index_file(path: &Path) -> Result<IndexedFile> {
    let fail = |reason: String| HeistError::session_init(Some(path.to_path_buf()), reason);

    let size = fs::metadata(path)
        .map_err(|e| fail(format!("cannot read file: {}", e)))?
        .len();
    let file = fs::File::open(path).map_err(|e| fail(format!("cannot open file: {}", e)))?;
    let mut lines = BufReader::new(file).lines();

    let header_line = lines
        .next()
        .ok_or_else(|| fail("file is empty".to_string()))?
        .map_err(|e| fail(format!("cannot read header: {}", e)))?;
    let header: FileHeader = serde_json::from_str(&header_line)
        .map_err(|e| fail(format!("invalid header: {}", e)))?;

    if header.format != FORMAT_NAME {
        return Err(fail(format!("not a {} event file", FORMAT_NAME)));
    }
    if header.version != FORMAT_VERSION {
        return Err(fail(format!(
            "only version {} is supported (got version {})",
            FORMAT_VERSION, header.version
        )));
    }

    let mut branches = header.branches.clone();
    let mut seen: HashSet<String> = branches.iter().cloned().collect();
    let mut event_count = 0;

    for (line_num, line_result) in lines.enumerate() {
        let line =
            line_result.map_err(|e| fail(format!("cannot read line {}: {}", line_num + 2, e)))?;
        if line.trim().is_empty() {
            continue;
        }

        let event: EventData = serde_json::from_str(&line)
            .map_err(|e| fail(format!("invalid event on line {}: {}", line_num + 2, e)))?;
        for branch in event.products.keys() {
            if seen.insert(branch.clone()) {
                branches.push(branch.clone());
            }
        }
        event_count += 1;
    }

    Ok(IndexedFile {
        path: path.to_path_buf(),
        header,
        event_count,
        branches,
        size,
    })
}

fn read_events(file: &IndexedFile) -> Result<Vec<EventData>> {
    let corrupt = |line: usize, reason: String| HeistError::Corrupt {
        path: file.path.clone(),
        line,
        reason,
    };

    let reader = BufReader::new(fs::File::open(&file.path)?);
    let mut events = Vec::with_capacity(file.event_count);

    // Header was validated while indexing
    for (line_num, line_result) in reader.lines().enumerate().skip(1) {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }
        let event: EventData =
            serde_json::from_str(&line).map_err(|e| corrupt(line_num + 1, e.to_string()))?;
        events.push(event);
    }

    if events.len() != file.event_count {
        return Err(corrupt(
            0,
            format!(
                "expected {} events, found {}",
                file.event_count,
                events.len()
            ),
        ));
    }

    Ok(events)
}

/// Events read from an ordered list of files.
pub struct FileEventSource {
    registry: Arc<Registry>,
    files: Vec<IndexedFile>,
    /// Index into `files`; `files.len()` means past the end
    file_index: usize,
    events: Vec<EventData>,
    position: usize,
}

impl FileEventSource {
    /// Index `paths` and move to the first event.
    pub fn open<P>(registry: Arc<Registry>, paths: &[P]) -> Result<Self>
    where
        P: AsRef<Path> + Sync,
    {
        if paths.is_empty() {
            return Err(HeistError::session_init(None, "no input files"));
        }

        let files = paths
            .par_iter()
            .map(|p| index_file(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let mut source = Self {
            registry,
            file_index: files.len(),
            files,
            events: Vec::new(),
            position: 0,
        };
        source.to_begin()?;
        Ok(source)
    }

    /// Indexed input files, in input order.
    pub fn files(&self) -> &[IndexedFile] {
        &self.files
    }

    /// Total number of events across all files.
    pub fn event_count(&self) -> usize {
        self.files.iter().map(|f| f.event_count).sum()
    }

    fn load(&mut self, file_index: usize) -> Result<()> {
        let file = &self.files[file_index];
        self.events = read_events(file)?;
        debug!(path = %file.path.display(), events = self.events.len(), "loaded event file");
        self.file_index = file_index;
        self.position = 0;
        Ok(())
    }

    fn set_end(&mut self) {
        self.file_index = self.files.len();
        self.events.clear();
        self.position = 0;
    }

    fn next_nonempty(&self, from: usize) -> Option<usize> {
        (from..self.files.len()).find(|&i| self.files[i].event_count > 0)
    }

    fn previous_nonempty(&self, before: usize) -> Option<usize> {
        (0..before).rev().find(|&i| self.files[i].event_count > 0)
    }

    fn load_last_of(&mut self, file_index: usize) -> Result<()> {
        self.load(file_index)?;
        self.position = self.events.len().saturating_sub(1);
        Ok(())
    }
}

impl EventSource for FileEventSource {
    fn at_end(&self) -> bool {
        self.file_index >= self.files.len()
    }

    fn next(&mut self) -> Result<()> {
        if self.at_end() {
            return Err(HeistError::AtEnd);
        }
        if self.position + 1 < self.events.len() {
            self.position += 1;
            return Ok(());
        }
        // A file that fails to load leaves the cursor on the last good event.
        match self.next_nonempty(self.file_index + 1) {
            Some(i) => self.load(i)?,
            None => self.set_end(),
        }
        Ok(())
    }

    fn previous(&mut self) -> Result<()> {
        if !self.at_end() && self.position > 0 {
            self.position -= 1;
            return Ok(());
        }
        let before = if self.at_end() {
            self.files.len()
        } else {
            self.file_index
        };
        match self.previous_nonempty(before) {
            Some(i) => self.load_last_of(i),
            None => Err(HeistError::RewindPastStart),
        }
    }

    fn to_begin(&mut self) -> Result<()> {
        match self.next_nonempty(0) {
            Some(i) if i == self.file_index => {
                self.position = 0;
                Ok(())
            }
            Some(i) => self.load(i),
            None => {
                self.set_end();
                Ok(())
            }
        }
    }

    fn current(&self) -> Option<&EventData> {
        if self.at_end() {
            return None;
        }
        self.events.get(self.position)
    }

    fn valid_handle_getter(&self, handle: &TypeHandle) -> Result<Box<dyn ProductGetter>> {
        branch_getter(&self.registry, handle)
    }

    fn branch_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.files
            .iter()
            .flat_map(|f| f.branches.iter())
            .filter(|b| seen.insert(b.as_str()))
            .cloned()
            .collect()
    }
}
