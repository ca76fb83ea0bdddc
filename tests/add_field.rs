//! Integration tests for ADD-FIELD and its undo.

mod common;

use std::fs;

use depipe::{Batch, DateRange, FailReason, FieldInsertion, FileOperation, Layout, Operation};

use common::{Facility, listing, read_zip, snapshot};

fn add_field(name: &str, position: usize) -> FileOperation {
    FileOperation::new(Operation::AddField(
        FieldInsertion::new(name, position).unwrap(),
    ))
}

#[test]
fn test_add_field_appends_past_the_end() {
    let facility = Facility::bhtn();
    let file = facility.add_package("20190901", b"a|b|\n");

    assert!(add_field("HIST", 3).run(&file).unwrap().is_pass());

    assert_eq!(
        listing(file.dir()),
        [
            "20190901.BHTN.RETRO01D.HIST.zip",
            "20190901.BHTN.RETRO01D.zip.orig"
        ]
    );

    // Only the names change; the content is carried over untouched.
    let entries = read_zip(&file.dir().join("20190901.BHTN.RETRO01D.HIST.zip"));
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].0, "20190901.BHTN.RETRO01D.HIST");
    assert_eq!(entries[0].1, b"a|b|\n");
}

#[test]
fn test_add_field_positions() {
    let cases = [
        (0, "HIST.20190901.BHTN.RETRO01D.zip"),
        (1, "20190901.HIST.BHTN.RETRO01D.zip"),
        (2, "20190901.BHTN.HIST.RETRO01D.zip"),
        (7, "20190901.BHTN.RETRO01D.HIST.zip"),
    ];

    for (position, expected) in cases {
        let facility = Facility::bhtn();
        let file = facility.add_package("20190901", b"x\n");

        assert!(add_field("HIST", position).run(&file).unwrap().is_pass());
        assert!(
            file.dir().join(expected).is_file(),
            "position {position}: {:?}",
            listing(file.dir())
        );
    }
}

#[test]
fn test_add_field_with_suffix_layout() {
    let facility = Facility::new(Layout::new("BHTN", "RETRO", "01D").suffix("V2"));
    let file = facility.add_package("20190901", b"x\n");
    assert_eq!(file.name(), "20190901.BHTN.RETRO01D.V2");

    assert!(add_field("HIST", 3).run(&file).unwrap().is_pass());
    assert!(file.dir().join("20190901.BHTN.RETRO01D.HIST.V2.zip").is_file());
    assert!(file.backup_package_path().is_file());
}

#[test]
fn test_add_field_refuses_existing_backup() {
    let facility = Facility::bhtn();
    let file = facility.add_package("20190901", b"x\n");
    assert!(add_field("HIST", 3).run(&file).unwrap().is_pass());

    // Put a package back in place; the earlier backup must survive.
    facility.add_package("20190901", b"y\n");
    let before = snapshot(facility.root());

    let outcome = add_field("HIST", 3).run(&file).unwrap();
    assert_eq!(outcome.reason(), Some(FailReason::BackupExists));
    assert_eq!(snapshot(facility.root()), before);
}

#[test]
fn test_undo_with_field_restores_original_state() {
    let facility = Facility::bhtn();
    facility.add_package("20190901", b"a|\n");
    facility.add_package("20190902", b"b|\n");
    let before = snapshot(facility.root());
    let range = DateRange::parse("20190901", "20190902").unwrap();

    let field = FieldInsertion::new("HIST", 1).unwrap();
    let batch = Batch::new(
        facility.layout().clone(),
        FileOperation::new(Operation::AddField(field.clone())),
    );
    assert!(batch.run(&range, |_| Ok(())).unwrap().is_ok());
    assert_ne!(snapshot(facility.root()), before);

    let batch = Batch::new(
        facility.layout().clone(),
        FileOperation::new(Operation::Undo {
            derived: Some(field),
        }),
    );
    assert!(batch.run(&range, |_| Ok(())).unwrap().is_ok());
    assert_eq!(snapshot(facility.root()), before);
}

#[test]
fn test_plain_undo_leaves_derived_package() {
    let facility = Facility::bhtn();
    let file = facility.add_package("20190901", b"x\n");
    let original = fs::read(file.package_path()).unwrap();
    assert!(add_field("HIST", 3).run(&file).unwrap().is_pass());

    let undo = FileOperation::new(Operation::Undo { derived: None });
    assert!(undo.run(&file).unwrap().is_pass());

    assert_eq!(fs::read(file.package_path()).unwrap(), original);
    assert_eq!(
        listing(file.dir()),
        [
            "20190901.BHTN.RETRO01D.HIST.zip",
            "20190901.BHTN.RETRO01D.zip"
        ]
    );
}
