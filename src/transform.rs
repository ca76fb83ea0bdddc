//! Content and filename rewrites applied between extraction and repackaging.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::{Error, READ_BUFFER_SIZE, Result};

/// Comment line written at the top of every rewritten file.
pub const HEADER_LINE: &str = "# Header line - ignore";

/// Counters reported by [`strip_trailing_char`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformStats {
    /// Lines read from the input.
    pub lines_read: usize,
    /// Lines whose trailing character was removed.
    pub lines_stripped: usize,
}

/// Rewrites `input` into `output`, dropping `ch` where it ends a line.
///
/// The output starts with [`HEADER_LINE`]. A line whose last character before
/// the terminator is `ch` is written without it and terminated by a single
/// `\n`. Every other line, and every line shorter than two bytes, is copied
/// byte for byte. The input is processed as bytes, so content that is not
/// valid UTF-8 passes through untouched.
///
/// A final line without a terminator is checked like any other and gains a
/// `\n` when stripped. Unstripped `\r\n` lines keep their terminator.
///
/// Returns `Ok(None)` when `input` does not exist.
///
/// # Errors
///
/// Returns [`Error::Transform`] if the input cannot be read or the output
/// cannot be written.
pub fn strip_trailing_char(
    input: &Path,
    output: &Path,
    ch: char,
) -> Result<Option<TransformStats>> {
    let source = match File::open(input) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(transform_error(input, e)),
    };
    let mut reader = BufReader::with_capacity(READ_BUFFER_SIZE, source);

    let sink = File::create(output).map_err(|e| transform_error(output, e))?;
    let mut writer = BufWriter::new(sink);

    let mut encoded = [0u8; 4];
    let delimiter = ch.encode_utf8(&mut encoded).as_bytes();

    let mut stats = TransformStats::default();
    let mut line = Vec::new();

    writeln!(writer, "{}", HEADER_LINE).map_err(|e| transform_error(output, e))?;

    loop {
        line.clear();
        let read = reader
            .read_until(b'\n', &mut line)
            .map_err(|e| transform_error(input, e))?;
        if read == 0 {
            break;
        }
        stats.lines_read += 1;

        match strip_line(&line, delimiter) {
            Some(body) => {
                writer
                    .write_all(body)
                    .and_then(|()| writer.write_all(b"\n"))
                    .map_err(|e| transform_error(output, e))?;
                stats.lines_stripped += 1;
            }
            None => writer
                .write_all(&line)
                .map_err(|e| transform_error(output, e))?,
        }
    }

    writer.flush().map_err(|e| transform_error(output, e))?;

    log::debug!(
        "Rewrote '{}' -> '{}': {} lines, {} stripped",
        input.display(),
        output.display(),
        stats.lines_read,
        stats.lines_stripped
    );
    Ok(Some(stats))
}

/// Returns the line body without `delimiter` if it ends the line.
fn strip_line<'a>(line: &'a [u8], delimiter: &[u8]) -> Option<&'a [u8]> {
    if line.len() < 2 {
        return None;
    }

    let body = line
        .strip_suffix(b"\r\n")
        .or_else(|| line.strip_suffix(b"\n"))
        .unwrap_or(line);

    body.strip_suffix(delimiter)
}

fn transform_error(path: &Path, source: io::Error) -> Error {
    Error::Transform {
        path: path.to_path_buf(),
        source,
    }
}

/// Inserts `field` as a dot-delimited token of `file_name`.
///
/// `position` is 0-indexed among the existing tokens; later tokens shift
/// right. Positions past the end append.
///
/// ```
/// use depipe::transform::insert_field;
///
/// assert_eq!(insert_field("20190901.BHTN.PMTS01D", "HIST", 3), "20190901.BHTN.PMTS01D.HIST");
/// assert_eq!(insert_field("20190901.BHTN.PMTS01D", "HIST", 1), "20190901.HIST.BHTN.PMTS01D");
/// assert_eq!(insert_field("20190901.BHTN.PMTS01D", "HIST", 0), "HIST.20190901.BHTN.PMTS01D");
/// ```
pub fn insert_field(file_name: &str, field: &str, position: usize) -> String {
    let mut tokens: Vec<&str> = file_name.split('.').collect();
    let at = position.min(tokens.len());
    tokens.insert(at, field);
    tokens.join(".")
}
