//! Record tags.
//!
//! An [`InputTag`] names one data product: its type plus the module label,
//! instance name and process name that produced it. Tags are built either
//! from explicit fields or from a quicktag string (see [`quicktag`]).
//!
//! Building a tag resolves its type against a [`Registry`] and declares the
//! getter template for that type. A type without a template still yields a
//! tag; retrieving it later fails.

pub mod quicktag;

pub use quicktag::{convert_quicktag, QuicktagFields, TRIGGER_RESULTS};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{HeistError, Result};
use crate::types::{Registry, TypeHandle};

/// A typed record tag.
#[derive(Debug, Clone, PartialEq)]
pub struct InputTag {
    handle: TypeHandle,
    label: String,
    instance: String,
    process: String,
}

impl InputTag {
    /// Build a tag from an explicit type descriptor and module label.
    ///
    /// `instance` and `process` may be empty. An empty process matches the
    /// latest process that wrote the product.
    pub fn new(
        registry: &Registry,
        type_descriptor: &str,
        label: &str,
        instance: &str,
        process: &str,
    ) -> Result<Self> {
        if label.is_empty() {
            return Err(HeistError::InvalidArguments(
                "a module label is required".to_string(),
            ));
        }

        let handle = registry.resolve(type_descriptor)?;
        registry.declare_getter(&handle);

        Ok(Self {
            handle,
            label: label.to_string(),
            instance: instance.to_string(),
            process: process.to_string(),
        })
    }

    /// Build a tag from a quicktag such as `ns::Types_module_instance_process`.
    pub fn from_quicktag(registry: &Registry, quicktag: &str) -> Result<Self> {
        let fields = convert_quicktag(quicktag)?;
        Self::new(
            registry,
            &fields.type_descriptor,
            &fields.module_label,
            &fields.instance,
            &fields.process,
        )
    }

    /// Build a tag from a [`TagSpec`], checking that exactly one
    /// construction path was given.
    pub fn from_spec(registry: &Registry, spec: &TagSpec) -> Result<Self> {
        let ambiguous = || {
            HeistError::InvalidArguments(
                "specify a type and module label, or a quicktag, but not both".to_string(),
            )
        };

        match (&spec.type_descriptor, &spec.label, &spec.quicktag) {
            (None, None, Some(quicktag)) => {
                if !spec.instance.is_empty() || !spec.process.is_empty() {
                    return Err(ambiguous());
                }
                Self::from_quicktag(registry, quicktag)
            }
            // A lone type string is read as a quicktag
            (Some(quicktag), None, None) => {
                if !spec.instance.is_empty() || !spec.process.is_empty() {
                    return Err(ambiguous());
                }
                Self::from_quicktag(registry, quicktag)
            }
            (Some(type_descriptor), Some(label), None) => Self::new(
                registry,
                type_descriptor,
                label,
                &spec.instance,
                &spec.process,
            ),
            _ => Err(ambiguous()),
        }
    }

    /// Resolved type of the tagged record.
    pub fn handle(&self) -> &TypeHandle {
        &self.handle
    }

    /// Canonical type descriptor, e.g. `ROOT.vector(ROOT.ns.Type)`.
    pub fn type_descriptor(&self) -> &str {
        self.handle.canonical()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }

    pub fn process(&self) -> &str {
        &self.process
    }

    /// Branch name prefix shared by every process that wrote this product:
    /// `FriendlyType_module_instance_`.
    pub fn branch_prefix(&self) -> String {
        format!(
            "{}_{}_{}_",
            self.handle.friendly_name(),
            self.label,
            self.instance
        )
    }
}

/// Formats as a quicktag: `FriendlyType_module_instance_process`.
impl fmt::Display for InputTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{}_{}",
            self.handle.friendly_name(),
            self.label,
            self.instance,
            self.process
        )
    }
}

/// Unvalidated description of a tag, as written in a config file.
///
/// ```toml
/// [tags.hits]
/// quicktag = "gm2calo::CrystalHitArtRecords_islandFitterDAQ_fitter"
///
/// [tags.trigger]
/// type = "ROOT.art.TriggerResults"
/// label = "TriggerResults"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSpec {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_descriptor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub instance: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub process: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quicktag: Option<String>,
}

impl TagSpec {
    pub fn quicktag(quicktag: impl Into<String>) -> Self {
        Self {
            quicktag: Some(quicktag.into()),
            ..Self::default()
        }
    }
}

/// Either a built tag or a quicktag to convert on use.
#[derive(Debug, Clone, Copy)]
pub enum TagRef<'a> {
    Tag(&'a InputTag),
    Quicktag(&'a str),
}

impl<'a> From<&'a InputTag> for TagRef<'a> {
    fn from(tag: &'a InputTag) -> Self {
        TagRef::Tag(tag)
    }
}

impl<'a> From<&'a str> for TagRef<'a> {
    fn from(quicktag: &'a str) -> Self {
        TagRef::Quicktag(quicktag)
    }
}

impl<'a> From<&'a String> for TagRef<'a> {
    fn from(quicktag: &'a String) -> Self {
        TagRef::Quicktag(quicktag.as_str())
    }
}
