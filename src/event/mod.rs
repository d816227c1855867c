//! The event cursor.
//!
//! [`Event`] wraps an [`EventSource`] position together with the session's
//! getter cache. It answers identity queries for the current event and
//! retrieves records, creating one product getter per type on first use.
//!
//! Identity and record access past the last event fail with
//! [`HeistError::AtEnd`].

mod cache;

pub use cache::GetterCache;

use std::any::type_name;
use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::warn;

use crate::error::{HeistError, Result};
use crate::record::{Lookup, Record};
use crate::store::{EventId, EventSource, FetchError, FileEventSource};
use crate::tag::{InputTag, TagRef};
use crate::types::Registry;

/// Outcome of one record in an [`Event::ls`] listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordStatus {
    /// Present; element count for collections
    Present(Option<usize>),
    /// Present with zero elements
    Empty,
    /// Not stored at this event
    Missing,
    /// Could not be retrieved (unknown type, no getter, decode failure)
    Unretrievable(String),
}

/// One line of an [`Event::ls`] listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSummary {
    pub name: String,
    pub status: RecordStatus,
}

/// Cursor over an event sequence with a per-session getter cache.
pub struct Event {
    source: Box<dyn EventSource>,
    registry: Arc<Registry>,
    files: Vec<PathBuf>,
    getters: GetterCache,
}

impl Event {
    /// Wrap an already opened source.
    pub fn new(source: Box<dyn EventSource>, registry: Arc<Registry>, files: Vec<PathBuf>) -> Self {
        Self {
            source,
            registry,
            files,
            getters: GetterCache::new(),
        }
    }

    /// Open event files in order and position the cursor on the first event.
    pub fn open(registry: Arc<Registry>, files: &[PathBuf]) -> Result<Self> {
        let source = FileEventSource::open(Arc::clone(&registry), files)?;
        Ok(Self::new(Box::new(source), registry, files.to_vec()))
    }

    /// Files this session was opened from.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn at_end(&self) -> bool {
        self.source.at_end()
    }

    /// Move to the next event.
    pub fn advance(&mut self) -> Result<()> {
        self.source.next()
    }

    /// Move to the previous event. Fails on the first event.
    pub fn rewind(&mut self) -> Result<()> {
        self.source.previous()
    }

    /// Move back to the first event. Cached getters stay valid.
    pub fn to_begin(&mut self) -> Result<()> {
        self.source.to_begin()
    }

    /// Run, subrun and event number of the current event.
    pub fn id(&self) -> Result<EventId> {
        self.source
            .current()
            .map(|data| data.aux)
            .ok_or(HeistError::AtEnd)
    }

    pub fn run(&self) -> Result<u32> {
        Ok(self.id()?.run)
    }

    pub fn subrun(&self) -> Result<u32> {
        Ok(self.id()?.subrun)
    }

    pub fn event_number(&self) -> Result<u32> {
        Ok(self.id()?.event)
    }

    /// `Run<r> SubRun<s> Event<e>`, or `r<r>s<s>e<e>` when `short`.
    pub fn label(&self, short: bool) -> Result<String> {
        Ok(self.id()?.label(short))
    }

    /// Number of product getters created in this session.
    pub fn getter_count(&self) -> usize {
        self.getters.len()
    }

    /// Every record name stored in the input, as stored (with trailing dot).
    pub fn branch_names(&self) -> Vec<String> {
        self.source.branch_names()
    }

    /// Look up a record at the current event, keeping "not found", "empty"
    /// and "failed" apart.
    ///
    /// Errors are reserved for problems that affect every event: a bad
    /// quicktag, an unknown type, a getter that cannot be created, or a
    /// cursor past the end.
    pub fn lookup<'a>(&mut self, tag: impl Into<TagRef<'a>>) -> Result<Lookup> {
        if self.source.at_end() {
            return Err(HeistError::AtEnd);
        }

        let tag: Cow<'_, InputTag> = match tag.into() {
            TagRef::Tag(tag) => Cow::Borrowed(tag),
            TagRef::Quicktag(quicktag) => {
                Cow::Owned(InputTag::from_quicktag(&self.registry, quicktag)?)
            }
        };

        let source = &self.source;
        let getter = self
            .getters
            .get_or_create(tag.handle(), |handle| source.valid_handle_getter(handle))?;
        let data = source.current().ok_or(HeistError::AtEnd)?;

        Ok(match getter.fetch(data, &tag) {
            Ok(record) if record.is_empty() => Lookup::Empty,
            Ok(record) => Lookup::Found(record),
            Err(FetchError::NotFound) => Lookup::NotFound,
            Err(FetchError::Failed(reason)) => Lookup::Failed(reason),
        })
    }

    /// Retrieve a record at the current event.
    ///
    /// Returns `None` when the record is missing, empty or could not be
    /// retrieved; the last case is also logged. Use [`Event::lookup`] to tell
    /// these apart.
    pub fn get_record<'a>(&mut self, tag: impl Into<TagRef<'a>>) -> Result<Option<Record>> {
        let tag = tag.into();
        let lookup = self.lookup(tag)?;
        if let Lookup::Failed(reason) = &lookup {
            warn!(tag = ?tag, reason = %reason, "record retrieval failed; treating as absent");
        }
        Ok(lookup.into_record())
    }

    /// Retrieve a record as its registered Rust type.
    ///
    /// For a collection tag `T` is `Vec<Element>`.
    pub fn get<'a, T: 'static>(&mut self, tag: impl Into<TagRef<'a>>) -> Result<Option<T>> {
        match self.get_record(tag)? {
            Some(record) => record
                .into_inner::<T>()
                .map(Some)
                .map_err(|record| HeistError::TypeMismatch {
                    expected: type_name::<T>(),
                    found: record.type_name().to_string(),
                }),
            None => Ok(None),
        }
    }

    /// Summarize each named record at the current event.
    pub fn ls(&mut self, names: &[String]) -> Result<Vec<RecordSummary>> {
        if self.source.at_end() {
            return Err(HeistError::AtEnd);
        }

        let mut summaries = Vec::with_capacity(names.len());
        for name in names {
            let status = match self.lookup(name) {
                Ok(Lookup::Found(record)) => RecordStatus::Present(record.len()),
                Ok(Lookup::Empty) => RecordStatus::Empty,
                Ok(Lookup::NotFound) => RecordStatus::Missing,
                Ok(Lookup::Failed(reason)) => RecordStatus::Unretrievable(reason),
                Err(e) => RecordStatus::Unretrievable(e.to_string()),
            };
            summaries.push(RecordSummary {
                name: name.clone(),
                status,
            });
        }
        Ok(summaries)
    }
}
