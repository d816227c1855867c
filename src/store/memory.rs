//! In-memory event source.

use std::sync::Arc;

use super::{branch_getter, EventData, EventSource, ProductGetter};
use crate::error::{HeistError, Result};
use crate::types::{Registry, TypeHandle};

/// Events held in a `Vec`.
pub struct MemoryEventSource {
    registry: Arc<Registry>,
    events: Vec<EventData>,
    position: usize,
}

impl MemoryEventSource {
    pub fn new(registry: Arc<Registry>, events: Vec<EventData>) -> Self {
        Self {
            registry,
            events,
            position: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Zero-based index of the current event (equal to `len()` at the end).
    pub fn position(&self) -> usize {
        self.position
    }
}

impl EventSource for MemoryEventSource {
    fn at_end(&self) -> bool {
        self.position >= self.events.len()
    }

    fn next(&mut self) -> Result<()> {
        if self.at_end() {
            return Err(HeistError::AtEnd);
        }
        self.position += 1;
        Ok(())
    }

    fn previous(&mut self) -> Result<()> {
        if self.position == 0 || self.events.is_empty() {
            return Err(HeistError::RewindPastStart);
        }
        self.position = self.position.min(self.events.len()) - 1;
        Ok(())
    }

    fn to_begin(&mut self) -> Result<()> {
        self.position = 0;
        Ok(())
    }

    fn current(&self) -> Option<&EventData> {
        self.events.get(self.position)
    }

    fn valid_handle_getter(&self, handle: &TypeHandle) -> Result<Box<dyn ProductGetter>> {
        branch_getter(&self.registry, handle)
    }

    fn branch_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for event in &self.events {
            for branch in event.products.keys() {
                if !names.contains(branch) {
                    names.push(branch.clone());
                }
            }
        }
        names
    }
}
