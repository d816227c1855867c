//! File-session controller and the filtered event loop.
//!
//! [`ArtFileReader`] accumulates input files, lazily opens an [`Event`]
//! cursor over them and drives iteration:
//!
//! ```no_run
//! use std::sync::Arc;
//! use heist::{ArtFileReader, LoopOptions, Registry};
//!
//! # fn main() -> heist::Result<()> {
//! let registry = Arc::new(Registry::with_core());
//! let mut reader = ArtFileReader::open(registry, "run42.events")?;
//! let mut events = reader.event_loop(LoopOptions::default().max_count(30))?;
//! while let Some(evt) = events.next_event()? {
//!     println!("{}", evt.label(false)?);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The loop lends the same cursor on every step; the borrow ends before the
//! next step starts. Take [`Event::id`] for a snapshot that outlives it.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{HeistError, Result};
use crate::event::{Event, RecordStatus, RecordSummary};
use crate::store::{EventId, EventSource, EVENT_AUXILIARY};
use crate::tag::TRIGGER_RESULTS;
use crate::types::Registry;

/// An ordered list of input files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileList(Vec<PathBuf>);

impl FileList {
    pub fn into_vec(self) -> Vec<PathBuf> {
        self.0
    }
}

impl From<&str> for FileList {
    fn from(path: &str) -> Self {
        Self(vec![PathBuf::from(path)])
    }
}

impl From<String> for FileList {
    fn from(path: String) -> Self {
        Self(vec![PathBuf::from(path)])
    }
}

impl From<&Path> for FileList {
    fn from(path: &Path) -> Self {
        Self(vec![path.to_path_buf()])
    }
}

impl From<PathBuf> for FileList {
    fn from(path: PathBuf) -> Self {
        Self(vec![path])
    }
}

impl<T: Into<PathBuf>> From<Vec<T>> for FileList {
    fn from(paths: Vec<T>) -> Self {
        Self(paths.into_iter().map(Into::into).collect())
    }
}

impl<T: AsRef<Path>> From<&[T]> for FileList {
    fn from(paths: &[T]) -> Self {
        Self(paths.iter().map(|p| p.as_ref().to_path_buf()).collect())
    }
}

impl<T: Into<PathBuf>, const N: usize> From<[T; N]> for FileList {
    fn from(paths: [T; N]) -> Self {
        Self(paths.into_iter().map(Into::into).collect())
    }
}

/// Accepts a JSON string or an array of strings.
impl TryFrom<&Value> for FileList {
    type Error = HeistError;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::String(path) => Ok(Self::from(path.as_str())),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(PathBuf::from)
                        .ok_or_else(|| HeistError::InvalidFiles(item.to_string()))
                })
                .collect::<Result<Vec<_>>>()
                .map(Self),
            other => Err(HeistError::InvalidFiles(other.to_string())),
        }
    }
}

/// Which positions an event loop yields, and how many.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoopOptions {
    /// Zero-based loop indices to yield; empty yields every position
    pub selected: BTreeSet<usize>,
    /// Stop after this many yields
    pub max_count: Option<usize>,
}

impl LoopOptions {
    pub fn select<I: IntoIterator<Item = usize>>(mut self, indices: I) -> Self {
        self.selected.extend(indices);
        self
    }

    pub fn max_count(mut self, max: usize) -> Self {
        self.max_count = Some(max);
        self
    }

    fn wants(&self, loop_index: usize) -> bool {
        self.selected.is_empty() || self.selected.contains(&loop_index)
    }

    fn exhausted(&self, yielded: usize) -> bool {
        self.max_count.map_or(false, |max| yielded >= max)
    }
}

/// Filters for [`ArtFileReader::list_records`] and [`ArtFileReader::ls`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Case-insensitive substring
    pub pattern: Option<String>,
    /// Regular expression (not implemented)
    pub regex: Option<String>,
    /// Keep records that are missing or unretrievable in `ls` output
    pub show_failed: bool,
}

impl ListOptions {
    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self {
            pattern: Some(pattern.into()),
            ..Self::default()
        }
    }
}

/// Tracks input files, owns the event cursor and provides the event loop.
pub struct ArtFileReader {
    registry: Arc<Registry>,
    files: Vec<PathBuf>,
    event: Option<Event>,
    loop_index: usize,
    yield_index: usize,
    hidden: Vec<String>,
}

impl ArtFileReader {
    /// A reader with no files and no open session.
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            files: Vec::new(),
            event: None,
            loop_index: 0,
            yield_index: 0,
            hidden: vec![EVENT_AUXILIARY.to_string()],
        }
    }

    /// Add `files`, declare the trigger-results getter and open the session.
    pub fn open<F>(registry: Arc<Registry>, files: F) -> Result<Self>
    where
        F: TryInto<FileList>,
        HeistError: From<F::Error>,
    {
        let mut reader = Self::new(registry);
        reader.add_files(files)?;

        match reader.registry.resolve(TRIGGER_RESULTS) {
            Ok(handle) => {
                reader.registry.declare_getter(&handle);
            }
            Err(e) => debug!(error = %e, "trigger results type not registered"),
        }

        let event = reader.initialize()?;
        if !event.at_end() {
            info!(label = %event.label(false)?, "initialized reader");
        }
        Ok(reader)
    }

    /// Record names excluded from listings.
    pub fn with_hidden(mut self, hidden: Vec<String>) -> Self {
        self.hidden = hidden;
        self
    }

    /// Append to the file list. Takes effect on the next (re)initialization.
    pub fn add_files<F>(&mut self, files: F) -> Result<()>
    where
        F: TryInto<FileList>,
        HeistError: From<F::Error>,
    {
        let files = files.try_into()?.into_vec();
        if self.event.is_some() {
            debug!(
                count = files.len(),
                "files added after initialization; reinitialize to read them"
            );
        }
        self.files.extend(files);
        Ok(())
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn is_initialized(&self) -> bool {
        self.event.is_some()
    }

    /// Open the session over the accumulated files, once.
    pub fn initialize(&mut self) -> Result<&mut Event> {
        if self.event.is_none() {
            self.reinitialize()?;
        }
        self.event.as_mut().ok_or(HeistError::NotInitialized)
    }

    /// Discard the cursor and its getter cache and open a fresh session.
    pub fn reinitialize(&mut self) -> Result<&mut Event> {
        self.event = None;
        let event = Event::open(Arc::clone(&self.registry), &self.files)?;
        debug!(files = self.files.len(), "opened event session");
        Ok(self.event.insert(event))
    }

    /// Open the session over a caller-provided source instead of the files.
    pub fn initialize_with(&mut self, source: Box<dyn EventSource>) -> &mut Event {
        let event = Event::new(source, Arc::clone(&self.registry), self.files.clone());
        self.event.insert(event)
    }

    /// The cursor, initializing on first use.
    pub fn event(&mut self) -> Result<&mut Event> {
        self.initialize()
    }

    /// Positions visited by the most recent loop.
    pub fn loop_index(&self) -> usize {
        self.loop_index
    }

    /// Positions yielded by the most recent loop.
    pub fn yield_index(&self) -> usize {
        self.yield_index
    }

    /// Start a loop from the cursor's current position.
    ///
    /// Initializes the session if needed. A loop that ran to the end leaves
    /// the cursor there; call [`Event::to_begin`] or [`reinitialize`] to
    /// loop again.
    ///
    /// [`reinitialize`]: ArtFileReader::reinitialize
    pub fn event_loop(&mut self, options: LoopOptions) -> Result<EventLoop<'_>> {
        self.initialize()?;
        self.loop_index = 0;
        self.yield_index = 0;
        Ok(EventLoop {
            reader: self,
            options,
            visited: false,
            finished: false,
        })
    }

    /// Names of the records stored in the input, with the trailing `.`
    /// removed and hidden names skipped.
    ///
    /// Works with the cursor at the end of the input.
    pub fn list_records(&mut self, options: &ListOptions) -> Result<Vec<String>> {
        let pattern = match (&options.pattern, &options.regex) {
            (Some(_), Some(_)) => {
                return Err(HeistError::InvalidArguments(
                    "do not specify both a pattern and a regex".to_string(),
                ))
            }
            (None, Some(_)) => {
                return Err(HeistError::NotImplemented(
                    "regex filtering of record names".to_string(),
                ))
            }
            (pattern, None) => pattern.as_ref().map(|p| p.to_lowercase()),
        };

        let branches = self.initialize()?.branch_names();
        let names = branches
            .iter()
            .filter(|branch| {
                pattern
                    .as_ref()
                    .map_or(true, |p| branch.to_lowercase().contains(p.as_str()))
            })
            .map(|branch| branch.trim_end_matches('.'))
            .filter(|name| !self.hidden.iter().any(|h| h == name))
            .map(str::to_string)
            .collect();
        Ok(names)
    }

    /// Element counts of the listed records at the current event.
    ///
    /// Empty records are skipped; missing and unretrievable ones only
    /// appear with `show_failed`.
    pub fn ls(&mut self, options: &ListOptions) -> Result<Vec<RecordSummary>> {
        let names = self.list_records(options)?;
        let summaries = self.initialize()?.ls(&names)?;
        Ok(summaries
            .into_iter()
            .filter(|s| match s.status {
                RecordStatus::Present(_) => true,
                RecordStatus::Empty => false,
                RecordStatus::Missing | RecordStatus::Unretrievable(_) => options.show_failed,
            })
            .collect())
    }
}

/// A running event loop over an [`ArtFileReader`].
///
/// Each step lends the reader's cursor until the next step.
pub struct EventLoop<'r> {
    reader: &'r mut ArtFileReader,
    options: LoopOptions,
    /// The cursor sits on a position this loop already visited
    visited: bool,
    finished: bool,
}

impl<'r> EventLoop<'r> {
    /// Move to the next selected position and lend the cursor, or `None`
    /// once the input or the yield budget is exhausted.
    pub fn next_event(&mut self) -> Result<Option<&mut Event>> {
        if self.finished {
            return Ok(None);
        }

        let options = &self.options;
        let reader = &mut *self.reader;
        let event = reader.event.as_mut().ok_or(HeistError::NotInitialized)?;

        loop {
            if self.visited {
                if options.exhausted(reader.yield_index) {
                    if let Some(max) = options.max_count {
                        info!(max, "Reached maximum {} events", max);
                    }
                    self.finished = true;
                    return Ok(None);
                }
                event.advance()?;
                self.visited = false;
            }

            if event.at_end() {
                self.finished = true;
                return Ok(None);
            }

            let index = reader.loop_index;
            reader.loop_index += 1;
            self.visited = true;

            if options.wants(index) {
                if options.exhausted(reader.yield_index) {
                    self.finished = true;
                    return Ok(None);
                }
                reader.yield_index += 1;
                return Ok(Some(event));
            }
        }
    }

    /// Run `f` on every yielded position; returns the number of yields.
    pub fn for_each<F>(mut self, mut f: F) -> Result<usize>
    where
        F: FnMut(&mut Event) -> Result<()>,
    {
        let mut count = 0;
        while let Some(event) = self.next_event()? {
            f(event)?;
            count += 1;
        }
        Ok(count)
    }

    /// Iterate identity snapshots instead of lending the cursor.
    pub fn ids(self) -> EventIds<'r> {
        EventIds {
            inner: self,
            failed: false,
        }
    }

    pub fn loop_index(&self) -> usize {
        self.reader.loop_index
    }

    pub fn yield_index(&self) -> usize {
        self.reader.yield_index
    }
}

/// Iterator of [`EventId`] snapshots; stops after the first error.
pub struct EventIds<'r> {
    inner: EventLoop<'r>,
    failed: bool,
}

impl Iterator for EventIds<'_> {
    type Item = Result<EventId>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.inner.next_event() {
            Ok(Some(event)) => Some(event.id()),
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "event loop stopped");
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
