//! CLI behaviour, run against the built binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::helpers::two_runs;

/// heist with a config file inside `dir` and no RUST_LOG from the caller.
fn heist(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("heist").expect("heist binary");
    cmd.arg("--config")
        .arg(dir.join("config.toml"))
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn ls_lists_records_without_auxiliary() {
    let (temp, files) = two_runs();
    heist(temp.path())
        .arg("ls")
        .args(&files)
        .assert()
        .success()
        .stdout("  calo::Hits_fitter__RECO\n");
}

#[test]
fn ls_regex_is_not_implemented() {
    let (temp, files) = two_runs();
    heist(temp.path())
        .args(["ls", "--regex", "Hits.*"])
        .args(&files)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not implemented"));
}

#[test]
fn ls_counts_at_first_event() {
    let (temp, files) = two_runs();
    // first event has no hits, so nothing is listed unless failures are shown
    heist(temp.path())
        .args(["ls", "--counts"])
        .args(&files)
        .assert()
        .success()
        .stdout("");
}

#[test]
fn events_prints_selected_labels() {
    let (temp, files) = two_runs();
    heist(temp.path())
        .args(["events", "--short", "--select", "1,3"])
        .args(&files)
        .assert()
        .success()
        .stdout("r1s0e1\nr2s0e0\n");
}

#[test]
fn events_max_from_config() {
    let (temp, files) = two_runs();
    fs::write(
        temp.path().join("config.toml"),
        "[reader]\nmax_events = 2\nshort_labels = true\n",
    )
    .unwrap();
    heist(temp.path())
        .arg("events")
        .args(&files)
        .assert()
        .success()
        .stdout("r1s0e0\nr1s0e1\n");
}

#[test]
fn scan_prints_counts_per_event() {
    let (temp, files) = two_runs();
    heist(temp.path())
        .args(["scan", "--tag", "calo::Hits_fitter", "--max", "4"])
        .args(&files)
        .assert()
        .success()
        .stdout(
            "Run1 SubRun0 Event0\t-\n\
             Run1 SubRun0 Event1\t1\n\
             Run1 SubRun0 Event2\t2\n\
             Run2 SubRun0 Event0\t-\n",
        );
}

#[test]
fn scan_with_named_tag() {
    let (temp, files) = two_runs();
    fs::write(
        temp.path().join("config.toml"),
        "[tags.hits]\nquicktag = \"calo::Hits_fitter\"\n",
    )
    .unwrap();
    heist(temp.path())
        .args(["scan", "--tag", "@hits", "--select", "2"])
        .args(&files)
        .assert()
        .success()
        .stdout("Run1 SubRun0 Event2\t2\n");
}

#[test]
fn scan_rejects_bad_quicktag() {
    let (temp, files) = two_runs();
    heist(temp.path())
        .args(["scan", "--tag", "Hits"])
        .args(&files)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid quicktag"));
}

#[test]
fn info_shows_counts_and_total() {
    let (temp, files) = two_runs();
    heist(temp.path())
        .arg("info")
        .args(&files)
        .assert()
        .success()
        .stdout(predicate::str::contains("3 events"))
        .stdout(predicate::str::contains("4 events"))
        .stdout(predicate::str::contains("Total: 2 files, 7 events"));
}

#[test]
fn missing_file_fails_with_context() {
    let temp = TempDir::new().unwrap();
    heist(temp.path())
        .args(["events", "nowhere.events"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open nowhere.events"));
}

#[test]
fn config_show_prints_defaults() {
    let temp = TempDir::new().unwrap();
    heist(temp.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[listing]"))
        .stdout(predicate::str::contains("EventAuxiliary"));
}

#[test]
fn config_path_honours_flag() {
    let temp = TempDir::new().unwrap();
    heist(temp.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn completions_for_bash() {
    let temp = TempDir::new().unwrap();
    heist(temp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("heist"));
}

#[test]
fn version_flag() {
    let temp = TempDir::new().unwrap();
    heist(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("heist "));
}
