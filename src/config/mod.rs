//! Configuration management for heist

mod io;
mod types;

pub use types::*;

use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::reader::ListOptions;
use crate::tag::InputTag;
use crate::types::{CoreDictionary, Registry, TypeList};

/// Prefix marking a tag argument as a named tag from `[tags]`
pub const NAMED_TAG_PREFIX: char = '@';

impl Config {
    /// Get the config file path (~/.config/heist/config.toml)
    pub fn config_path() -> Result<PathBuf> {
        io::config_path()
    }

    /// Get the config directory path (~/.config/heist)
    pub fn config_dir() -> Result<PathBuf> {
        io::config_dir()
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> Result<Self> {
        io::load()
    }

    /// Load configuration from a specific file, or return defaults if not found
    pub fn load_from(path: &Path) -> Result<Self> {
        io::load_from(path)
    }

    /// Types from `[types]` as a dictionary.
    pub fn type_list(&self) -> TypeList {
        TypeList {
            name: "config".to_string(),
            untyped: self.types.untyped.clone(),
            opaque: self.types.opaque.clone(),
        }
    }

    /// A permissive registry with the core and configured types loaded.
    ///
    /// Unknown types in files still resolve, as untyped JSON.
    pub fn registry(&self) -> Arc<Registry> {
        let registry = Registry::permissive();
        registry.load_dictionary(&CoreDictionary);
        registry.load_dictionary(&self.type_list());
        Arc::new(registry)
    }

    /// Build a tag from a quicktag or an `@name` reference to `[tags]`.
    pub fn resolve_tag(&self, registry: &Registry, arg: &str) -> Result<InputTag> {
        match arg.strip_prefix(NAMED_TAG_PREFIX) {
            Some(name) => {
                let spec = self
                    .tags
                    .get(name)
                    .ok_or_else(|| anyhow!("No tag named '{}' in [tags]", name))?;
                InputTag::from_spec(registry, spec)
                    .with_context(|| format!("Invalid tag '{}' in [tags]", name))
            }
            None => InputTag::from_quicktag(registry, arg)
                .with_context(|| format!("Invalid quicktag '{}'", arg)),
        }
    }

    /// Listing options with this config's defaults.
    pub fn list_options(&self, pattern: Option<String>, regex: Option<String>) -> ListOptions {
        ListOptions {
            pattern,
            regex,
            show_failed: self.reader.show_failed,
        }
    }
}
