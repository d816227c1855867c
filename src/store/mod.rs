//! Event stores.
//!
//! The cursor and getter cache talk to events only through the
//! [`EventSource`] trait. Two sources ship with the crate:
//!
//! - [`FileEventSource`] reads newline-delimited JSON event files
//! - [`MemoryEventSource`] holds events built in memory
//!
//! # File format
//!
//! ```text
//! {"format":"heist","version":1,"process":"RECO","branches":[...]}    <- header
//! {"aux":{"run":1,"subRun":0,"event":1},"products":{"<branch>":...}}    <- event
//! {"aux":{"run":1,"subRun":0,"event":2},"products":{}}                  <- event
//! ```
//!
//! Branch names are `FriendlyType_module_instance_process.`, for example
//! `gm2calo::CrystalHitArtRecords_islandFitterDAQ_fitter_RECO.`.

mod file;
mod getter;
mod memory;
mod writer;

pub use file::{FileEventSource, FileHeader, IndexedFile, FORMAT_NAME, FORMAT_VERSION};
pub use getter::{branch_getter, BranchGetter, FetchError, ProductGetter};
pub use memory::MemoryEventSource;
pub use writer::EventFileWriter;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::tag::InputTag;
use crate::types::TypeHandle;

/// Name of the auxiliary branch; it holds identity, not a data product.
pub const EVENT_AUXILIARY: &str = "EventAuxiliary";

/// Run, subrun and event numbers of one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId {
    pub run: u32,
    #[serde(rename = "subRun")]
    pub subrun: u32,
    pub event: u32,
}

impl EventId {
    pub fn new(run: u32, subrun: u32, event: u32) -> Self {
        Self { run, subrun, event }
    }

    /// `Run<r> SubRun<s> Event<e>`, or `r<r>s<s>e<e>` when `short`.
    pub fn label(&self, short: bool) -> String {
        if short {
            format!("r{}s{}e{}", self.run, self.subrun, self.event)
        } else {
            format!("Run{} SubRun{} Event{}", self.run, self.subrun, self.event)
        }
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label(false))
    }
}

/// One stored event: identity plus raw products keyed by branch name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventData {
    pub aux: EventId,
    #[serde(default)]
    pub products: serde_json::Map<String, serde_json::Value>,
}

impl EventData {
    pub fn new(aux: EventId) -> Self {
        Self {
            aux,
            products: serde_json::Map::new(),
        }
    }

    /// Add a product under its branch name (builder style).
    pub fn with_product(mut self, branch: impl Into<String>, value: serde_json::Value) -> Self {
        self.products.insert(branch.into(), value);
        self
    }

    /// Find the stored product for a tag.
    ///
    /// With an empty process on the tag, the last matching branch (the
    /// latest process) wins.
    pub fn product(&self, tag: &InputTag) -> Option<(&str, &serde_json::Value)> {
        let prefix = tag.branch_prefix();
        let matches = self.products.iter().filter(|(branch, _)| {
            branch
                .trim_end_matches('.')
                .strip_prefix(&prefix)
                .map(|process| {
                    !process.contains('_') && (tag.process().is_empty() || process == tag.process())
                })
                .unwrap_or(false)
        });

        matches.last().map(|(branch, value)| (branch.as_str(), value))
    }
}

/// An ordered sequence of events with a movable current position.
///
/// Implementations stand in for the event-access library: they own the
/// position and hand out product getters for concrete types.
pub trait EventSource {
    /// True once the position has moved past the last event.
    fn at_end(&self) -> bool;

    /// Move to the next event. Fails with `AtEnd` if already past the end.
    fn next(&mut self) -> Result<()>;

    /// Move to the previous event. Fails with `RewindPastStart` on the first.
    fn previous(&mut self) -> Result<()>;

    /// Move back to the first event.
    fn to_begin(&mut self) -> Result<()>;

    /// The current event, or `None` past the end.
    fn current(&self) -> Option<&EventData>;

    /// Create a getter for products of `handle`'s type.
    fn valid_handle_getter(&self, handle: &TypeHandle) -> Result<Box<dyn ProductGetter>>;

    /// Every branch name in the input, in first-seen order.
    fn branch_names(&self) -> Vec<String>;
}
