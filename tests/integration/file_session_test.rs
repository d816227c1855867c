//! Reader sessions over event files on disk

use std::fs;
use std::sync::Arc;

use heist::{ArtFileReader, HeistError, ListOptions, LoopOptions, Registry};
use tempfile::TempDir;

use crate::helpers::{two_runs, write_run};

fn registry() -> Arc<Registry> {
    Arc::new(Registry::permissive())
}

fn labels(reader: &mut ArtFileReader, options: LoopOptions) -> Vec<String> {
    let mut labels = Vec::new();
    reader
        .event_loop(options)
        .unwrap()
        .for_each(|evt| {
            labels.push(evt.label(true)?);
            Ok(())
        })
        .unwrap();
    labels
}

#[test]
fn loop_crosses_file_boundaries() {
    let (_temp, files) = two_runs();
    let mut reader = ArtFileReader::open(registry(), files.as_slice()).unwrap();
    assert_eq!(
        labels(&mut reader, LoopOptions::default()),
        vec!["r1s0e0", "r1s0e1", "r1s0e2", "r2s0e0", "r2s0e1", "r2s0e2", "r2s0e3"]
    );
}

#[test]
fn selection_spans_files() {
    let (_temp, files) = two_runs();
    let mut reader = ArtFileReader::open(registry(), files.as_slice()).unwrap();
    assert_eq!(
        labels(&mut reader, LoopOptions::default().select([2, 3]).max_count(5)),
        vec!["r1s0e2", "r2s0e0"]
    );
}

#[test]
fn rewind_crosses_back_into_previous_file() {
    let (_temp, files) = two_runs();
    let mut reader = ArtFileReader::open(registry(), files.as_slice()).unwrap();
    let evt = reader.event().unwrap();
    for _ in 0..3 {
        evt.advance().unwrap();
    }
    assert_eq!(evt.label(true).unwrap(), "r2s0e0");
    evt.rewind().unwrap();
    assert_eq!(evt.label(true).unwrap(), "r1s0e2");
}

#[test]
fn empty_files_are_skipped() {
    let temp = TempDir::new().unwrap();
    let files = vec![
        write_run(temp.path(), "empty.events", 1, 0, 0),
        write_run(temp.path(), "run2.events", 2, 5, 2),
        write_run(temp.path(), "empty2.events", 3, 0, 0),
    ];
    let mut reader = ArtFileReader::open(registry(), files).unwrap();
    assert_eq!(
        labels(&mut reader, LoopOptions::default()),
        vec!["r2s0e5", "r2s0e6"]
    );
}

#[test]
fn files_are_added_incrementally() {
    let (_temp, files) = two_runs();
    let mut reader = ArtFileReader::new(registry());
    reader.add_files(files[0].clone()).unwrap();
    reader.add_files(vec![files[1].clone()]).unwrap();
    assert_eq!(labels(&mut reader, LoopOptions::default()).len(), 7);
}

#[test]
fn reinitialize_picks_up_added_files() {
    let (_temp, files) = two_runs();
    let mut reader = ArtFileReader::open(registry(), files[0].clone()).unwrap();
    reader.add_files(files[1].clone()).unwrap();
    assert_eq!(labels(&mut reader, LoopOptions::default()).len(), 3);

    reader.reinitialize().unwrap();
    assert_eq!(labels(&mut reader, LoopOptions::default()).len(), 7);
}

#[test]
fn records_are_read_from_disk() {
    let (_temp, files) = two_runs();
    let mut reader = ArtFileReader::open(registry(), files.as_slice()).unwrap();
    let mut counts = Vec::new();
    reader
        .event_loop(LoopOptions::default())
        .unwrap()
        .for_each(|evt| {
            let record = evt.get_record("calo::Hits_fitter")?;
            counts.push(record.and_then(|r| r.len()).unwrap_or(0));
            Ok(())
        })
        .unwrap();
    assert_eq!(counts, vec![0, 1, 2, 0, 1, 2, 0]);
}

#[test]
fn listing_hides_auxiliary_and_works_at_end() {
    let (_temp, files) = two_runs();
    let mut reader = ArtFileReader::open(registry(), files.as_slice()).unwrap();
    labels(&mut reader, LoopOptions::default());
    assert!(reader.event().unwrap().at_end());
    assert_eq!(
        reader.list_records(&ListOptions::default()).unwrap(),
        vec!["calo::Hits_fitter__RECO"]
    );
}

#[test]
fn open_failures_are_session_errors() {
    let temp = TempDir::new().unwrap();

    let missing = temp.path().join("missing.events");
    assert!(matches!(
        ArtFileReader::open(registry(), missing),
        Err(HeistError::SessionInit { .. })
    ));

    let garbage = temp.path().join("garbage.events");
    fs::write(&garbage, "this is not json\n").unwrap();
    assert!(matches!(
        ArtFileReader::open(registry(), garbage),
        Err(HeistError::SessionInit { .. })
    ));

    let wrong_version = temp.path().join("v9.events");
    fs::write(
        &wrong_version,
        "{\"format\":\"heist\",\"version\":9,\"branches\":[]}\n",
    )
    .unwrap();
    let err = ArtFileReader::open(registry(), wrong_version).err().unwrap();
    assert!(err.to_string().contains("version"));

    assert!(matches!(
        ArtFileReader::open(registry(), Vec::<String>::new()),
        Err(HeistError::SessionInit { .. })
    ));
}

#[test]
fn file_changed_after_opening_is_corrupt() {
    let temp = TempDir::new().unwrap();
    let first = write_run(temp.path(), "a.events", 1, 0, 1);
    let second = write_run(temp.path(), "b.events", 2, 0, 2);
    let mut reader = ArtFileReader::open(registry(), vec![first, second.clone()]).unwrap();

    let header = fs::read_to_string(&second).unwrap();
    let header = header.lines().next().unwrap().to_string();
    fs::write(&second, format!("{}\n{{broken\n", header)).unwrap();

    let evt = reader.event().unwrap();
    let err = evt.advance().unwrap_err();
    assert!(matches!(err, HeistError::Corrupt { .. }));

    assert!(!evt.at_end());
    assert_eq!(evt.label(true).unwrap(), "r1s0e0");
    assert!(matches!(evt.advance(), Err(HeistError::Corrupt { .. })));
    assert_eq!(evt.run().unwrap(), 1);
}
