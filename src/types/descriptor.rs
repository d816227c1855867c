//! Type descriptor grammar.
//!
//! A descriptor names a stored element type, optionally wrapped in the
//! collection constructor:
//!
//! ```text
//! ROOT.gm2calo.CrystalHitArtRecord               <- single element
//! ROOT.vector(ROOT.gm2calo.CrystalHitArtRecord)  <- collection
//! ```
//!
//! Each descriptor has three spellings: the canonical descriptor above, the
//! C++ name (`vector<gm2calo::CrystalHitArtRecord>`) and the friendly name
//! used for branch names in event files (`gm2calo::CrystalHitArtRecords`).

use std::fmt;

use crate::error::{HeistError, Result};

/// Root namespace every canonical descriptor starts with.
pub const ROOT_NAMESPACE: &str = "ROOT";

/// Name of the collection constructor.
pub const COLLECTION_CTOR: &str = "vector";

/// Whether a descriptor names one element or a collection of elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeShape {
    Single,
    Collection,
}

/// A parsed type descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    /// Namespace path and type name, e.g. `["gm2calo", "CrystalHitArtRecord"]`
    path: Vec<String>,
    shape: TypeShape,
}

fn valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !segment.starts_with(|c: char| c.is_ascii_digit())
}

impl TypeDescriptor {
    /// Descriptor for a single element named by its namespace path.
    fn single(path: Vec<String>) -> Self {
        Self {
            path,
            shape: TypeShape::Single,
        }
    }

    /// Parse a canonical descriptor (`ROOT.ns.Name` or `ROOT.vector(...)`).
    pub fn parse(descriptor: &str) -> Result<Self> {
        let trimmed = descriptor.trim();
        let malformed = || HeistError::MalformedDescriptor(descriptor.to_string());

        let rest = trimmed
            .strip_prefix(ROOT_NAMESPACE)
            .and_then(|r| r.strip_prefix('.'))
            .ok_or_else(malformed)?;

        if let Some(inner) = rest
            .strip_prefix(COLLECTION_CTOR)
            .and_then(|r| r.strip_prefix('('))
        {
            let inner = inner.strip_suffix(')').ok_or_else(malformed)?;
            let element = Self::parse(inner).map_err(|_| malformed())?;
            if element.is_collection() {
                // Nested collections have no friendly spelling
                return Err(malformed());
            }
            return Ok(element.collection());
        }

        let path: Vec<String> = rest.split('.').map(str::to_string).collect();
        if !path.iter().all(|s| valid_segment(s)) {
            return Err(malformed());
        }
        Ok(Self::single(path))
    }

    /// Parse a C++ spelling (`ns::Name`, `vector<ns::Name>`, `std::vector<ns::Name>`).
    pub fn from_cpp_name(name: &str) -> Result<Self> {
        let trimmed = name.trim();
        let malformed = || HeistError::MalformedDescriptor(name.to_string());

        let unwrapped = trimmed
            .strip_prefix("std::")
            .unwrap_or(trimmed)
            .strip_prefix(COLLECTION_CTOR)
            .and_then(|r| r.strip_prefix('<'));
        if let Some(inner) = unwrapped {
            let inner = inner.trim_end().strip_suffix('>').ok_or_else(malformed)?;
            let element = Self::from_cpp_name(inner).map_err(|_| malformed())?;
            if element.is_collection() {
                return Err(malformed());
            }
            return Ok(element.collection());
        }

        let path: Vec<String> = trimmed.split("::").map(str::to_string).collect();
        if !path.iter().all(|s| valid_segment(s)) {
            return Err(malformed());
        }
        Ok(Self::single(path))
    }

    pub fn shape(&self) -> TypeShape {
        self.shape
    }

    pub fn is_collection(&self) -> bool {
        self.shape == TypeShape::Collection
    }

    /// The element type (itself, for single descriptors).
    pub fn element(&self) -> Self {
        Self::single(self.path.clone())
    }

    /// The collection of this descriptor's element type.
    pub fn collection(&self) -> Self {
        Self {
            path: self.path.clone(),
            shape: TypeShape::Collection,
        }
    }

    /// Canonical descriptor, e.g. `ROOT.vector(ROOT.ns.Name)`.
    pub fn canonical(&self) -> String {
        let element = format!("{}.{}", ROOT_NAMESPACE, self.path.join("."));
        match self.shape {
            TypeShape::Single => element,
            TypeShape::Collection => format!("{}.{}({})", ROOT_NAMESPACE, COLLECTION_CTOR, element),
        }
    }

    /// C++ spelling, e.g. `vector<ns::Name>`.
    pub fn cpp_name(&self) -> String {
        let element = self.path.join("::");
        match self.shape {
            TypeShape::Single => element,
            TypeShape::Collection => format!("{}<{}>", COLLECTION_CTOR, element),
        }
    }

    /// Friendly spelling used in branch names, e.g. `ns::Names`.
    pub fn friendly_name(&self) -> String {
        let element = self.path.join("::");
        match self.shape {
            TypeShape::Single => element,
            TypeShape::Collection => format!("{}s", element),
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}
