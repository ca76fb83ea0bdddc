//! CLI integration tests.
//!
//! These tests run the built `depipe` binary against a scratch facility tree
//! and check its stdout and exit codes.

#![cfg(feature = "cli")]

mod common;

use std::process::{Command, Output};

use common::{Facility, listing};

fn depipe(facility: &Facility, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_depipe"))
        .arg("--root")
        .arg(facility.root())
        .arg("--quiet")
        .args(args)
        .env_remove("DEPIPE_ROOT")
        .output()
        .expect("Failed to run depipe")
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_remove_then_undo() {
    let facility = Facility::bhtn();
    let file = facility.add_package("20190901", b"line1|\nline2\n");
    let root = facility.root().display().to_string();

    let output = depipe(
        &facility,
        &["remove", "BHTN", "RETRO", "01D", "20190831", "20190901", "|"],
    );
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stdout_lines(&output),
        [
            format!("{root}/BHTN/20190831/20190831.BHTN.RETRO01D.zip FAIL - missing file"),
            format!("{root}/BHTN/20190901/20190901.BHTN.RETRO01D.zip PASS"),
        ]
    );

    let output = depipe(&facility, &["u", "BHTN", "RETRO", "01D", "20190901", "20190901"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(listing(file.dir()), ["20190901.BHTN.RETRO01D.zip"]);
}

#[test]
fn test_add_field_and_undo_with_field() {
    let facility = Facility::bhtn();
    let file = facility.add_package("20190901", b"x\n");

    let output = depipe(
        &facility,
        &["a", "BHTN", "RETRO", "01D", "20190901", "20190901", "HIST", "3"],
    );
    assert_eq!(output.status.code(), Some(0));
    assert!(file.dir().join("20190901.BHTN.RETRO01D.HIST.zip").is_file());

    let output = depipe(
        &facility,
        &[
            "undo", "BHTN", "RETRO", "01D", "20190901", "20190901", "--field", "HIST", "3",
        ],
    );
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(listing(file.dir()), ["20190901.BHTN.RETRO01D.zip"]);
}

#[test]
fn test_scan_json() {
    let facility = Facility::bhtn();
    facility.add_package("20190902", b"x\n");

    let output = depipe(
        &facility,
        &["-f", "json", "scan", "BHTN", "RETRO", "01D", "20190901", "20190902"],
    );
    assert_eq!(output.status.code(), Some(1));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value[0][0]["status"], "FAIL");
    assert_eq!(value[0][0]["reason"], "missing file");
    assert_eq!(value[0][1]["status"], "PASS");
    assert_eq!(value[1]["operation"], "scan");
    assert_eq!(value[1]["passed"], 1);
}

#[test]
fn test_bad_arguments() {
    let facility = Facility::bhtn();
    facility.add_package("20190901", b"x\n");

    let cases: [&[&str]; 5] = [
        // Not a single character
        &["remove", "BHTN", "RETRO", "01D", "20190901", "20190901", "||"],
        // Unknown facility
        &["scan", "NOPE", "RETRO", "01D", "20190901", "20190901"],
        // Malformed date
        &["scan", "BHTN", "RETRO", "01D", "2019-09-01", "20190901"],
        // Reversed range
        &["scan", "BHTN", "RETRO", "01D", "20190902", "20190901"],
        // Missing arguments
        &["scan", "BHTN"],
    ];

    for args in cases {
        let output = depipe(&facility, args);
        assert_eq!(output.status.code(), Some(255), "{:?}", args);
        assert!(output.stdout.is_empty(), "{:?}", args);
    }
}
