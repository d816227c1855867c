//! Test helper utilities

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use heist::{EventData, EventFileWriter, EventId, FileHeader};
use serde_json::json;
use tempfile::TempDir;

pub const HITS_BRANCH: &str = "calo::Hits_fitter__RECO.";

/// Write an event file with events `first..first + count` of `run`.
///
/// Event `e` carries `e % 3` hits.
pub fn write_run(dir: &Path, name: &str, run: u32, first: u32, count: u32) -> PathBuf {
    let path = dir.join(name);
    let mut writer = EventFileWriter::create(&path, &FileHeader::new(Some("RECO".to_string())))
        .expect("Failed to create event file");
    for e in first..first + count {
        let hits: Vec<_> = (0..e % 3).map(|i| json!({"energy": i})).collect();
        let event = EventData::new(EventId::new(run, 0, e))
            .with_product("EventAuxiliary", json!({}))
            .with_product(HITS_BRANCH, json!(hits));
        writer.write_event(&event).expect("Failed to write event");
    }
    writer.finish().expect("Failed to finish event file");
    path
}

/// Temp dir with two runs: 3 events in run 1, 4 events in run 2.
pub fn two_runs() -> (TempDir, Vec<PathBuf>) {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let files = vec![
        write_run(temp.path(), "run1.events", 1, 0, 3),
        write_run(temp.path(), "run2.events", 2, 0, 4),
    ];
    (temp, files)
}
