//! Error types for record lookup and event iteration.
//!
//! Configuration and resolution problems surface here as errors. Retrieval
//! problems at a single event do not: they degrade to an absent record (see
//! [`crate::record::Lookup`]) so an outer event loop keeps running.

use std::convert::Infallible;
use std::path::PathBuf;

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, HeistError>;

/// Errors raised by the heist library.
#[derive(Debug, thiserror::Error)]
pub enum HeistError {
    /// Constructor arguments were missing, conflicting or ambiguous.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Something other than a path or a sequence of paths was given as input.
    #[error("Input files must be a path or a sequence of paths: {0}")]
    InvalidFiles(String),

    /// A quicktag string did not have 2 to 4 underscore-delimited fields.
    #[error("Cannot parse quicktag '{quicktag}': {reason}")]
    QuicktagParse { quicktag: String, reason: String },

    /// A type descriptor does not follow `ROOT.ns.Name` / `ROOT.vector(..)`.
    #[error("Malformed type descriptor '{0}'")]
    MalformedDescriptor(String),

    /// A type descriptor does not name a registered type.
    #[error("Could not resolve '{0}' to a registered type")]
    UnknownType(String),

    /// The event source could not produce a getter for a type.
    #[error("Could not instantiate product getter for type '{type_name}': {reason}")]
    GetterInstantiation { type_name: String, reason: String },

    /// The event source could not be opened.
    #[error("Could not open event session ({}): {reason}", display_path(.path))]
    SessionInit {
        path: Option<PathBuf>,
        reason: String,
    },

    /// An event file changed or broke after it was indexed.
    #[error("Corrupt event file {}, line {line}: {reason}", .path.display())]
    Corrupt {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// A record was requested as a Rust type other than the registered one.
    #[error("Record of type '{found}' cannot be read as {expected}")]
    TypeMismatch {
        expected: &'static str,
        found: String,
    },

    /// An operation needing an open session was called before `initialize`.
    #[error("Event session has not been initialized")]
    NotInitialized,

    /// Identity or record access after the last event.
    #[error("Event cursor is past the last event")]
    AtEnd,

    /// `rewind` called on the first event.
    #[error("Cannot rewind before the first event")]
    RewindPastStart,

    /// A declared option that has no implementation.
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn display_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "no file".to_string())
}

impl HeistError {
    pub(crate) fn session_init(path: Option<PathBuf>, reason: impl Into<String>) -> Self {
        HeistError::SessionInit {
            path,
            reason: reason.into(),
        }
    }

    pub(crate) fn quicktag(quicktag: &str, reason: impl Into<String>) -> Self {
        HeistError::QuicktagParse {
            quicktag: quicktag.to_string(),
            reason: reason.into(),
        }
    }
}

/// Lets `TryInto<FileList>` bounds accept the infallible conversions.
impl From<Infallible> for HeistError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}
