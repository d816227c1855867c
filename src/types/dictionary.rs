//! Dictionaries: named bundles of type registrations.
//!
//! A dictionary is loaded into a [`Registry`] at most once, keyed by its name.

use crate::error::Result;

use super::art::TriggerResults;
use super::Registry;

/// A named set of types to register together.
pub trait Dictionary {
    /// Unique name; a second load with the same name is skipped.
    fn name(&self) -> &str;

    /// Register this dictionary's types.
    fn register(&self, registry: &Registry) -> Result<()>;
}

/// Framework types present in every event file.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoreDictionary;

impl CoreDictionary {
    pub const NAME: &'static str = "heist/core";
}

impl Dictionary for CoreDictionary {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn register(&self, registry: &Registry) -> Result<()> {
        registry.register::<TriggerResults>("art::TriggerResults")
    }
}

/// Types listed by name, e.g. from the config file.
///
/// `untyped` types decode to `serde_json::Value`; `opaque` types resolve but
/// cannot be retrieved.
#[derive(Debug, Clone, Default)]
pub struct TypeList {
    pub name: String,
    pub untyped: Vec<String>,
    pub opaque: Vec<String>,
}

impl Dictionary for TypeList {
    fn name(&self) -> &str {
        &self.name
    }

    fn register(&self, registry: &Registry) -> Result<()> {
        for cpp_name in &self.untyped {
            registry.register_untyped(cpp_name)?;
        }
        for cpp_name in &self.opaque {
            registry.register_opaque(cpp_name)?;
        }
        Ok(())
    }
}
