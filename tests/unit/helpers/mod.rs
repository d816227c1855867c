//! Test helper utilities

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use heist::{
    ArtFileReader, EventData, EventId, EventSource, MemoryEventSource, ProductGetter, Registry,
    Result, TypeHandle,
};
use serde::Deserialize;
use serde_json::json;

pub const HITS_BRANCH: &str = "gm2calo::CrystalHitArtRecords_islandFitterDAQ_fitter_RECO.";
pub const HITS_QUICKTAG: &str = "gm2calo::CrystalHitArtRecords_islandFitterDAQ_fitter";

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CrystalHit {
    pub energy: f64,
    pub time: f64,
}

/// Strict registry with the core dictionary and `CrystalHit` registered.
pub fn hits_registry() -> Arc<Registry> {
    let registry = Registry::with_core();
    registry
        .register::<CrystalHit>("gm2calo::CrystalHitArtRecord")
        .expect("register CrystalHit");
    Arc::new(registry)
}

/// `n` events in run 1; event `e` carries `e % 3` hits.
pub fn hit_events(n: u32) -> Vec<EventData> {
    (0..n)
        .map(|e| {
            let hits: Vec<_> = (0..e % 3)
                .map(|i| json!({"energy": 10.0 * f64::from(i + 1), "time": f64::from(e)}))
                .collect();
            EventData::new(EventId::new(1, 0, e)).with_product(HITS_BRANCH, json!(hits))
        })
        .collect()
}

/// A reader over in-memory events.
pub fn memory_reader(registry: Arc<Registry>, events: Vec<EventData>) -> ArtFileReader {
    let mut reader = ArtFileReader::new(Arc::clone(&registry));
    reader.initialize_with(Box::new(MemoryEventSource::new(registry, events)));
    reader
}

/// Event source that counts getter creations.
pub struct CountingSource {
    inner: MemoryEventSource,
    created: Arc<AtomicUsize>,
}

impl CountingSource {
    pub fn new(registry: Arc<Registry>, events: Vec<EventData>) -> (Self, Arc<AtomicUsize>) {
        let created = Arc::new(AtomicUsize::new(0));
        let source = Self {
            inner: MemoryEventSource::new(registry, events),
            created: Arc::clone(&created),
        };
        (source, created)
    }
}

impl EventSource for CountingSource {
    fn at_end(&self) -> bool {
        self.inner.at_end()
    }

    fn next(&mut self) -> Result<()> {
        self.inner.next()
    }

    fn previous(&mut self) -> Result<()> {
        self.inner.previous()
    }

    fn to_begin(&mut self) -> Result<()> {
        self.inner.to_begin()
    }

    fn current(&self) -> Option<&EventData> {
        self.inner.current()
    }

    fn valid_handle_getter(&self, handle: &TypeHandle) -> Result<Box<dyn ProductGetter>> {
        self.created.fetch_add(1, Ordering::SeqCst);
        self.inner.valid_handle_getter(handle)
    }

    fn branch_names(&self) -> Vec<String> {
        self.inner.branch_names()
    }
}

pub fn created(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}
