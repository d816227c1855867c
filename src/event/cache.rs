//! Per-session product getter cache.
//!
//! One getter per canonical type descriptor, created on first use and kept
//! for the lifetime of the session. Tags that share a type share a getter.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::debug;

use crate::error::Result;
use crate::store::ProductGetter;
use crate::types::TypeHandle;

/// Getters keyed by canonical type descriptor.
#[derive(Default)]
pub struct GetterCache {
    getters: HashMap<String, Box<dyn ProductGetter>>,
}

impl GetterCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the getter for `handle`, calling `create` only on a miss.
    ///
    /// A failed `create` leaves the cache unchanged.
    pub fn get_or_create<F>(&mut self, handle: &TypeHandle, create: F) -> Result<&dyn ProductGetter>
    where
        F: FnOnce(&TypeHandle) -> Result<Box<dyn ProductGetter>>,
    {
        match self.getters.entry(handle.canonical().to_string()) {
            Entry::Occupied(entry) => Ok(&**entry.into_mut()),
            Entry::Vacant(entry) => {
                let getter = create(handle)?;
                debug!(descriptor = %handle.canonical(), "cached product getter");
                Ok(&**entry.insert(getter))
            }
        }
    }

    pub fn contains(&self, descriptor: &str) -> bool {
        self.getters.contains_key(descriptor)
    }

    pub fn len(&self) -> usize {
        self.getters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.getters.is_empty()
    }

    /// Cached descriptors, sorted.
    pub fn descriptors(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.getters.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}
