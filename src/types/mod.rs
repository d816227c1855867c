//! Type registry.
//!
//! Maps canonical type descriptors to [`TypeHandle`]s. Types are registered
//! up front (directly or through a [`Dictionary`]) and looked up by string when
//! a record tag is built; nothing is evaluated at runtime.
//!
//! The registry also owns the set of types that have a getter template
//! declared. A template is what an event source needs before it can hand out
//! a product getter for a type.
//!
//! # Example
//!
//! ```
//! use heist::Registry;
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct CrystalHit {
//!     energy: f64,
//! }
//!
//! let registry = Registry::with_core();
//! registry.register::<CrystalHit>("gm2calo::CrystalHitArtRecord")?;
//!
//! let handle = registry.resolve("ROOT.vector(ROOT.gm2calo.CrystalHitArtRecord)")?;
//! assert_eq!(handle.cpp_name(), "vector<gm2calo::CrystalHitArtRecord>");
//! # Ok::<(), heist::HeistError>(())
//! ```

pub mod art;
pub mod descriptor;
pub mod dictionary;

pub use descriptor::{TypeDescriptor, TypeShape, COLLECTION_CTOR, ROOT_NAMESPACE};
pub use dictionary::{CoreDictionary, Dictionary, TypeList};

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{HeistError, Result};
use crate::record::Record;

/// Decodes a stored JSON product into a [`Record`].
pub type DecodeFn =
    Arc<dyn Fn(&serde_json::Value) -> std::result::Result<Record, serde_json::Error> + Send + Sync>;

/// A resolved, concrete type.
#[derive(Clone)]
pub struct TypeHandle {
    descriptor: TypeDescriptor,
    canonical: Arc<str>,
    cpp_name: Arc<str>,
    friendly_name: Arc<str>,
    decoder: Option<DecodeFn>,
}

impl TypeHandle {
    fn new(descriptor: TypeDescriptor, decoder: Option<DecodeFn>) -> Self {
        Self {
            canonical: Arc::from(descriptor.canonical()),
            cpp_name: Arc::from(descriptor.cpp_name()),
            friendly_name: Arc::from(descriptor.friendly_name()),
            descriptor,
            decoder,
        }
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    /// Canonical descriptor string; this is the getter cache key.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    pub fn cpp_name(&self) -> &str {
        &self.cpp_name
    }

    pub fn friendly_name(&self) -> &str {
        &self.friendly_name
    }

    pub fn is_collection(&self) -> bool {
        self.descriptor.is_collection()
    }

    /// Decoder for stored products, if the type can be retrieved at all.
    pub fn decoder(&self) -> Option<&DecodeFn> {
        self.decoder.as_ref()
    }
}

impl fmt::Debug for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeHandle")
            .field("canonical", &self.canonical)
            .field("cpp_name", &self.cpp_name)
            .field("retrievable", &self.decoder.is_some())
            .finish()
    }
}

impl PartialEq for TypeHandle {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

fn decoder_for<T>(cpp_name: Arc<str>) -> DecodeFn
where
    T: DeserializeOwned + Send + 'static,
{
    Arc::new(move |value| {
        let decoded: T = T::deserialize(value)?;
        Ok(Record::new(Arc::clone(&cpp_name), decoded, None))
    })
}

fn collection_decoder_for<T>(cpp_name: Arc<str>) -> DecodeFn
where
    T: DeserializeOwned + Send + 'static,
{
    Arc::new(move |value| {
        let decoded: Vec<T> = Vec::<T>::deserialize(value)?;
        let len = decoded.len();
        Ok(Record::new(Arc::clone(&cpp_name), decoded, Some(len)))
    })
}

/// Registry of resolvable types, loaded dictionaries and declared getter
/// templates.
///
/// Shared by reference (usually behind an `Arc`) between tags and event
/// sessions. All three tables are append-only; only the template set can be
/// cleared, with [`Registry::reset_templates`].
#[derive(Default)]
pub struct Registry {
    types: RwLock<HashMap<String, TypeHandle>>,
    dictionaries: Mutex<HashSet<String>>,
    templates: Mutex<HashSet<String>>,
    permissive: bool,
}

impl Registry {
    /// An empty, strict registry: unknown descriptors fail to resolve.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty registry that resolves any well-formed descriptor, treating
    /// unknown types as untyped JSON.
    pub fn permissive() -> Self {
        Self {
            permissive: true,
            ..Self::default()
        }
    }

    /// A strict registry with the core dictionary loaded.
    pub fn with_core() -> Self {
        let registry = Self::new();
        registry.load_dictionary(&CoreDictionary);
        registry
    }

    pub fn is_permissive(&self) -> bool {
        self.permissive
    }

    /// Register `T` for the element type `cpp_name` and `Vec<T>` for the
    /// matching collection.
    pub fn register<T>(&self, cpp_name: &str) -> Result<()>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let element = element_descriptor(cpp_name)?;
        let collection = element.collection();

        let single = decoder_for::<T>(Arc::from(element.cpp_name()));
        let many = collection_decoder_for::<T>(Arc::from(collection.cpp_name()));
        self.insert(TypeHandle::new(element, Some(single)));
        self.insert(TypeHandle::new(collection, Some(many)));
        Ok(())
    }

    /// Register `cpp_name` with products decoded as `serde_json::Value`.
    pub fn register_untyped(&self, cpp_name: &str) -> Result<()> {
        self.register::<serde_json::Value>(cpp_name)
    }

    /// Register a type that resolves but cannot be retrieved.
    pub fn register_opaque(&self, cpp_name: &str) -> Result<()> {
        let element = element_descriptor(cpp_name)?;
        let collection = element.collection();
        self.insert(TypeHandle::new(element, None));
        self.insert(TypeHandle::new(collection, None));
        Ok(())
    }

    fn insert(&self, handle: TypeHandle) {
        debug!(descriptor = %handle.canonical(), "registered type");
        self.types
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(handle.canonical().to_string(), handle);
    }

    /// Resolve a canonical descriptor to its handle.
    pub fn resolve(&self, descriptor: &str) -> Result<TypeHandle> {
        let parsed = TypeDescriptor::parse(descriptor)?;
        let canonical = parsed.canonical();

        if let Some(handle) = self
            .types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&canonical)
        {
            return Ok(handle.clone());
        }

        if self.permissive {
            self.register_untyped(&parsed.element().cpp_name())?;
            return self
                .types
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .get(&canonical)
                .cloned()
                .ok_or(HeistError::UnknownType(canonical));
        }

        Err(HeistError::UnknownType(descriptor.trim().to_string()))
    }

    /// True if `descriptor` resolves without synthesizing a type.
    pub fn contains(&self, descriptor: &str) -> bool {
        TypeDescriptor::parse(descriptor)
            .map(|d| {
                self.types
                    .read()
                    .unwrap_or_else(PoisonError::into_inner)
                    .contains_key(&d.canonical())
            })
            .unwrap_or(false)
    }

    /// Load a dictionary once. Returns true if it was loaded by this call.
    pub fn load_dictionary(&self, dictionary: &dyn Dictionary) -> bool {
        let name = dictionary.name().to_string();
        if self
            .dictionaries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&name)
        {
            debug!(dictionary = %name, "dictionary already loaded");
            return false;
        }

        match dictionary.register(self) {
            Ok(()) => {
                self.dictionaries
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(name);
                true
            }
            Err(e) => {
                warn!(dictionary = %name, error = %e, "failed to load dictionary");
                false
            }
        }
    }

    /// Names of loaded dictionaries, sorted.
    pub fn loaded_dictionaries(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .dictionaries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Declare the getter template for a type.
    ///
    /// Idempotent per C++ name. Returns false, after logging, when the type
    /// has no decoder; the failure only surfaces when a getter is requested.
    pub fn declare_getter(&self, handle: &TypeHandle) -> bool {
        let mut templates = self
            .templates
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if templates.contains(handle.cpp_name()) {
            return true;
        }
        if handle.decoder().is_none() {
            warn!(
                type_name = %handle.cpp_name(),
                "failed to declare getter template: type has no decoder"
            );
            return false;
        }
        debug!(type_name = %handle.cpp_name(), "declared getter template");
        templates.insert(handle.cpp_name().to_string());
        true
    }

    pub fn is_declared(&self, cpp_name: &str) -> bool {
        self.templates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(cpp_name)
    }

    /// C++ names with a declared getter template, sorted.
    pub fn declared_getters(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .templates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Forget every declared template.
    pub fn reset_templates(&self) {
        self.templates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let types = self.types.read().unwrap_or_else(PoisonError::into_inner).len();
        f.debug_struct("Registry")
            .field("types", &types)
            .field("dictionaries", &self.loaded_dictionaries())
            .field("templates", &self.declared_getters())
            .field("permissive", &self.permissive)
            .finish()
    }
}

fn element_descriptor(cpp_name: &str) -> Result<TypeDescriptor> {
    let descriptor = TypeDescriptor::from_cpp_name(cpp_name)?;
    if descriptor.is_collection() {
        return Err(HeistError::InvalidArguments(format!(
            "register the element type, not the collection '{}'",
            cpp_name
        )));
    }
    Ok(descriptor)
}
