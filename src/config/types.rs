//! Configuration type definitions and defaults

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::store::EVENT_AUXILIARY;
use crate::tag::TagSpec;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub reader: ReaderConfig,
    #[serde(default)]
    pub listing: ListingConfig,
    #[serde(default)]
    pub types: TypesConfig,
    /// Named tags, usable as `@name` wherever a tag is expected
    #[serde(default)]
    pub tags: BTreeMap<String, TagSpec>,
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// `tracing` filter directive used when RUST_LOG is unset, e.g. "heist=debug"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

/// Event loop configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Default cap on yielded events; unset loops over everything
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_events: Option<usize>,
    /// Print `r1s0e5` instead of `Run1 SubRun0 Event5`
    #[serde(default)]
    pub short_labels: bool,
    /// Keep missing and unretrievable records in listings
    #[serde(default)]
    pub show_failed: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_events: None,
            short_labels: false,
            show_failed: false,
        }
    }
}

/// Record listing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Record names never listed
    #[serde(default = "default_hidden")]
    pub hidden: Vec<String>,
}

pub fn default_hidden() -> Vec<String> {
    vec![EVENT_AUXILIARY.to_string()]
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            hidden: default_hidden(),
        }
    }
}

/// Types registered before any file is opened
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypesConfig {
    /// C++ element type names decoded as plain JSON
    #[serde(default)]
    pub untyped: Vec<String>,
    /// C++ element type names that resolve but cannot be retrieved
    #[serde(default)]
    pub opaque: Vec<String>,
}
