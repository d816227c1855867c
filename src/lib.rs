//! heist library
//!
//! Typed record lookup and filtered event loops over art-style event files.
//!
//! - [`Registry`] maps type descriptors to Rust types
//! - [`InputTag`] names a record; quicktags build one from a branch name
//! - [`Event`] is the cursor, with a per-session product-getter cache
//! - [`ArtFileReader`] owns the files and runs the event loop

pub mod config;
pub mod error;
pub mod event;
pub mod reader;
pub mod record;
pub mod store;
pub mod tag;
pub mod types;

pub use config::Config;
pub use error::{HeistError, Result};
pub use event::{Event, GetterCache, RecordStatus, RecordSummary};
pub use reader::{ArtFileReader, EventIds, EventLoop, FileList, ListOptions, LoopOptions};
pub use record::{Lookup, Record};
pub use store::{
    EventData, EventFileWriter, EventId, EventSource, FileEventSource, FileHeader,
    MemoryEventSource, ProductGetter,
};
pub use tag::{convert_quicktag, InputTag, TagRef, TagSpec};
pub use types::{Dictionary, Registry, TypeHandle};
