//! Record retrieval through the event cursor

use std::sync::Arc;

use heist::{
    Event, EventData, EventId, HeistError, InputTag, Lookup, MemoryEventSource, Registry,
};
use serde_json::json;

use crate::helpers::{
    created, hit_events, hits_registry, CountingSource, CrystalHit, HITS_BRANCH, HITS_QUICKTAG,
};

fn counting_event(events: Vec<EventData>) -> (Event, Arc<std::sync::atomic::AtomicUsize>) {
    let registry = hits_registry();
    let (source, counter) = CountingSource::new(Arc::clone(&registry), events);
    (Event::new(Box::new(source), registry, Vec::new()), counter)
}

#[test]
fn one_getter_per_descriptor_for_many_calls() {
    let (mut evt, counter) = counting_event(hit_events(6));
    let registry = Arc::clone(evt.registry());
    let tag = InputTag::from_quicktag(&registry, HITS_QUICKTAG).unwrap();

    for _ in 0..5 {
        while !evt.at_end() {
            evt.get_record(&tag).unwrap();
            evt.get_record(HITS_QUICKTAG).unwrap();
            evt.advance().unwrap();
        }
        evt.to_begin().unwrap();
    }

    assert_eq!(created(&counter), 1);
    assert_eq!(evt.getter_count(), 1);
}

#[test]
fn distinct_descriptors_get_distinct_getters() {
    let (mut evt, counter) = counting_event(hit_events(2));
    evt.get_record(HITS_QUICKTAG).unwrap();
    evt.get_record("gm2calo::CrystalHitArtRecord_islandFitterDAQ")
        .unwrap();
    evt.get_record("art::TriggerResults_TriggerResults").unwrap();
    assert_eq!(created(&counter), 3);
}

#[test]
fn failed_getter_creation_is_retried_and_not_cached() {
    let registry = hits_registry();
    registry.register_opaque("gm2calo::Blob").unwrap();
    let (source, counter) = CountingSource::new(Arc::clone(&registry), hit_events(2));
    let mut evt = Event::new(Box::new(source), registry, Vec::new());

    for _ in 0..2 {
        assert!(matches!(
            evt.get_record("gm2calo::Blobs_mod"),
            Err(HeistError::GetterInstantiation { .. })
        ));
    }
    assert_eq!(created(&counter), 2);
    assert_eq!(evt.getter_count(), 0);
}

#[test]
fn retrieval_does_not_move_the_cursor() {
    let (mut evt, _) = counting_event(hit_events(3));
    evt.advance().unwrap();
    let before = evt.id().unwrap();
    evt.get_record(HITS_QUICKTAG).unwrap();
    evt.get_record("gm2calo::CrystalHitArtRecords_nobody").unwrap();
    assert_eq!(evt.id().unwrap(), before);
}

#[test]
fn absent_versus_present() {
    let registry = hits_registry();
    let events = vec![
        EventData::new(EventId::new(1, 0, 1)).with_product(
            HITS_BRANCH,
            json!([{"energy": 1.5, "time": 0.0}, {"energy": 3.0, "time": 1.0}]),
        ),
        EventData::new(EventId::new(1, 0, 2)).with_product(HITS_BRANCH, json!([])),
    ];
    let source = MemoryEventSource::new(Arc::clone(&registry), events);
    let mut evt = Event::new(Box::new(source), registry, Vec::new());

    // never written by any module
    assert!(evt
        .get_record("gm2calo::CrystalHitArtRecords_neverRan")
        .unwrap()
        .is_none());

    let hits: Vec<CrystalHit> = evt.get(HITS_QUICKTAG).unwrap().unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[1].energy, 3.0);

    let record = evt.get_record(HITS_QUICKTAG).unwrap().unwrap();
    assert_eq!(record.len(), Some(2));
    assert!(record.is_collection());

    evt.advance().unwrap();
    assert!(evt.get_record(HITS_QUICKTAG).unwrap().is_none());
}

#[test]
fn lookup_distinguishes_absent_outcomes() {
    let registry = hits_registry();
    let events = vec![
        EventData::new(EventId::new(1, 0, 1)).with_product(HITS_BRANCH, json!([])),
        EventData::new(EventId::new(1, 0, 2)),
        EventData::new(EventId::new(1, 0, 3)).with_product(HITS_BRANCH, json!([{"energy": 1}])),
        EventData::new(EventId::new(1, 0, 4))
            .with_product(HITS_BRANCH, json!([{"energy": 1.0, "time": 2.0}])),
    ];
    let source = MemoryEventSource::new(Arc::clone(&registry), events);
    let mut evt = Event::new(Box::new(source), registry, Vec::new());

    assert!(matches!(evt.lookup(HITS_QUICKTAG).unwrap(), Lookup::Empty));
    evt.advance().unwrap();
    assert!(matches!(evt.lookup(HITS_QUICKTAG).unwrap(), Lookup::NotFound));
    evt.advance().unwrap();
    assert!(matches!(evt.lookup(HITS_QUICKTAG).unwrap(), Lookup::Failed(_)));
    assert!(evt.get_record(HITS_QUICKTAG).unwrap().is_none());
    evt.advance().unwrap();
    assert!(evt.lookup(HITS_QUICKTAG).unwrap().is_found());
}

#[test]
fn latest_process_wins_without_process_name() {
    let registry = Arc::new(Registry::permissive());
    let events = vec![EventData::new(EventId::new(1, 0, 1))
        .with_product("calo::Hits_fitter__RECO.", json!([1]))
        .with_product("calo::Hits_fitter__REPROC.", json!([1, 2, 3]))];
    let source = MemoryEventSource::new(Arc::clone(&registry), events);
    let mut evt = Event::new(Box::new(source), registry, Vec::new());

    let latest = evt.get_record("calo::Hits_fitter").unwrap().unwrap();
    assert_eq!(latest.len(), Some(3));
    let pinned = evt.get_record("calo::Hits_fitter__RECO").unwrap().unwrap();
    assert_eq!(pinned.len(), Some(1));
}

#[test]
fn end_of_sequence_is_a_defined_error() {
    let (mut evt, _) = counting_event(hit_events(1));
    evt.advance().unwrap();
    assert!(evt.at_end());
    assert!(matches!(evt.id(), Err(HeistError::AtEnd)));
    assert!(matches!(evt.run(), Err(HeistError::AtEnd)));
    assert!(matches!(
        evt.get_record(HITS_QUICKTAG),
        Err(HeistError::AtEnd)
    ));
    assert!(matches!(evt.advance(), Err(HeistError::AtEnd)));

    evt.rewind().unwrap();
    assert_eq!(evt.event_number().unwrap(), 0);
    assert!(matches!(evt.rewind(), Err(HeistError::RewindPastStart)));
}
