//! Property-based tests using proptest.
//!
//! These tests verify invariants of the name and line transforms using
//! randomly generated inputs.

use std::fs;

use depipe::EntryName;
use depipe::transform::{HEADER_LINE, insert_field, strip_trailing_char};
use proptest::prelude::*;
use tempfile::TempDir;

/// Strategy for dot-separated file names like `20190901.BHTN.RETRO01D`.
fn file_name_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec("[A-Z0-9]{1,8}", 1..6).prop_map(|parts| parts.join("."))
}

/// Strategy for lines that never contain the delimiter or a line break.
fn plain_lines_strategy() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec("[a-zA-Z0-9 ,;]{1,20}", 0..20)
}

fn strip(input: &[u8]) -> Vec<u8> {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("in");
    let dst = dir.path().join("out");
    fs::write(&src, input).unwrap();
    strip_trailing_char(&src, &dst, '|').unwrap().unwrap();
    fs::read(&dst).unwrap()
}

fn with_header(body: &str) -> Vec<u8> {
    format!("{}\n{}", HEADER_LINE, body).into_bytes()
}

proptest! {
    /// The field lands at the requested index, clamped to the end.
    #[test]
    fn field_inserted_at_position(
        name in file_name_strategy(),
        field in "[A-Z]{1,6}",
        position in 0usize..10,
    ) {
        let original: Vec<&str> = name.split('.').collect();
        let result = insert_field(&name, &field, position);
        let tokens: Vec<&str> = result.split('.').collect();

        prop_assert_eq!(tokens.len(), original.len() + 1);
        let at = position.min(original.len());
        prop_assert_eq!(tokens[at], field.as_str());

        let mut without = tokens.clone();
        without.remove(at);
        prop_assert_eq!(without, original);
    }

    /// Lines without a trailing delimiter pass through unchanged.
    #[test]
    fn clean_lines_unchanged(lines in plain_lines_strategy()) {
        let body: String = lines.iter().map(|l| format!("{}\n", l)).collect();
        prop_assert_eq!(strip(body.as_bytes()), with_header(&body));
    }

    /// A single trailing delimiter is removed from every line.
    #[test]
    fn trailing_delimiter_removed(lines in plain_lines_strategy()) {
        let input: String = lines.iter().map(|l| format!("{}|\n", l)).collect();
        let expected: String = lines.iter().map(|l| format!("{}\n", l)).collect();
        prop_assert_eq!(strip(input.as_bytes()), with_header(&expected));
    }

    /// Delimiters inside a line are never touched.
    #[test]
    fn inner_delimiters_kept(fields in proptest::collection::vec("[a-z0-9]{1,5}", 2..6)) {
        let line = format!("{}\n", fields.join("|"));
        prop_assert_eq!(strip(line.as_bytes()), with_header(&line));
    }

    /// Bare file names are valid entry names; anything with a separator is not.
    #[test]
    fn entry_names_are_base_names(
        name in file_name_strategy(),
        dir in "[a-z]{1,8}",
    ) {
        let name = format!("20190901.{}", name);
        prop_assert!(EntryName::new(&name).is_ok());
        let nested = format!("{}/{}", dir, name);
        prop_assert!(EntryName::new(&nested).is_err());
        let windows = format!("{}\\{}", dir, name);
        prop_assert!(EntryName::new(&windows).is_err());
    }
}
