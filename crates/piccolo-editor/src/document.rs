//! Document: the rows of the file being viewed.
//!
//! A `Document` is an ordered list of [`Row`]s, one per source line, with
//! the line terminator stripped. Rows are raw bytes: the file is shown as
//! it is, with no decoding step that could fail on non-UTF-8 input.
//!
//! # Loading
//!
//! The file is streamed line by line on `\n`. A final line without a
//! terminator is still a row, and a trailing terminator does not produce an
//! extra empty row. A `\r` right before the `\n` belongs to the terminator
//! (CRLF files), so it is stripped too; a raw carriage return would
//! otherwise send the terminal cursor back to column 0 mid-row.
//!
//! Rows are immutable once loaded.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use piccolo_term::{Error, Result};
use tracing::info;

// ---------------------------------------------------------------------------
// Row
// ---------------------------------------------------------------------------

/// One line of the document, terminator stripped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    bytes: Vec<u8>,
}

impl Row {
    /// A row holding exactly `bytes`.
    #[must_use]
    pub const fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Build a row from a line split off at `\n`, dropping a trailing `\r`.
    fn from_line(mut line: Vec<u8>) -> Self {
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Self::new(line)
    }

    /// Length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the row is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The row's bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<&str> for Row {
    fn from(s: &str) -> Self {
        Self::new(s.as_bytes().to_vec())
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// The rows of a file, in file order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    rows: Vec<Row>,
}

impl Document {
    /// An empty document.
    #[must_use]
    pub const fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Load the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::File`] naming `path` if it cannot be opened or read.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(Error::file(path))?;
        let doc = Self::from_reader(file).map_err(Error::file(path))?;
        info!(path = %path.display(), rows = doc.row_count(), "loaded document");
        Ok(doc)
    }

    /// Read rows from any byte stream.
    ///
    /// # Errors
    ///
    /// Returns the underlying read error.
    pub fn from_reader(reader: impl Read) -> io::Result<Self> {
        let rows = BufReader::new(reader)
            .split(b'\n')
            .map(|line| line.map(Row::from_line))
            .collect::<io::Result<Vec<_>>>()?;
        Ok(Self { rows })
    }

    /// Build a document from in-memory text. Handy for tests and demos.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        // Reading from a byte slice cannot fail.
        Self::from_reader(text.as_bytes()).unwrap_or_default()
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether the document has no rows at all.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The row at `index`, if there is one.
    #[inline]
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Iterate over all rows.
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }
}

impl FromIterator<Row> for Document {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use pretty_assertions::assert_eq;

    fn rows(doc: &Document) -> Vec<&[u8]> {
        doc.rows().map(Row::as_bytes).collect()
    }

    // ── Row ───────────────────────────────────────────────────────────

    #[test]
    fn row_len_and_bytes() {
        let row = Row::from("hello");
        assert_eq!(row.len(), 5);
        assert!(!row.is_empty());
        assert_eq!(row.as_bytes(), b"hello");
    }

    #[test]
    fn row_default_is_empty() {
        assert!(Row::default().is_empty());
    }

    #[test]
    fn from_line_strips_carriage_return() {
        assert_eq!(Row::from_line(b"abc\r".to_vec()).as_bytes(), b"abc");
        assert_eq!(Row::from_line(b"a\rb".to_vec()).as_bytes(), b"a\rb");
    }

    // ── from_reader ─────────────────────────────────────────────────

    #[test]
    fn n_lines_make_n_rows() {
        let doc = Document::from_text("one\ntwo\nthree\n");
        assert_eq!(doc.row_count(), 3);
        assert_eq!(rows(&doc), [&b"one"[..], b"two", b"three"]);
    }

    #[test]
    fn last_line_without_newline_is_kept() {
        let doc = Document::from_text("one\ntwo");
        assert_eq!(rows(&doc), [&b"one"[..], b"two"]);
    }

    #[test]
    fn empty_input_is_empty_document() {
        let doc = Document::from_text("");
        assert!(doc.is_empty());
        assert_eq!(doc.row_count(), 0);
    }

    #[test]
    fn lone_newline_is_one_empty_row() {
        let doc = Document::from_text("\n");
        assert_eq!(doc.row_count(), 1);
        assert!(doc.row(0).unwrap().is_empty());
    }

    #[test]
    fn blank_lines_are_rows() {
        let doc = Document::from_text("a\n\n\nb\n");
        assert_eq!(rows(&doc), [&b"a"[..], b"", b"", b"b"]);
    }

    #[test]
    fn crlf_terminators_are_stripped() {
        let doc = Document::from_text("one\r\ntwo\r\n");
        assert_eq!(rows(&doc), [&b"one"[..], b"two"]);
    }

    #[test]
    fn non_utf8_bytes_survive() {
        let doc = Document::from_reader(&[0xFF, b'a', b'\n', 0xC3][..]).unwrap();
        assert_eq!(rows(&doc), [&[0xFF, b'a'][..], &[0xC3]]);
    }

    #[test]
    fn row_out_of_range_is_none() {
        let doc = Document::from_text("only");
        assert!(doc.row(0).is_some());
        assert!(doc.row(1).is_none());
    }

    #[test]
    fn collect_from_rows() {
        let doc: Document = ["a", "b"].into_iter().map(Row::from).collect();
        assert_eq!(doc.row_count(), 2);
    }

    // ── open ────────────────────────────────────────────────────────

    #[test]
    fn open_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "fn main() {{\n    body\n}}").unwrap();

        let doc = Document::open(file.path()).unwrap();
        assert_eq!(rows(&doc), [&b"fn main() {"[..], b"    body", b"}"]);
    }

    #[test]
    fn open_empty_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(Document::open(file.path()).unwrap().is_empty());
    }

    #[test]
    fn open_read_only_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "locked\n").unwrap();
        let mut perms = file.as_file().metadata().unwrap().permissions();
        perms.set_readonly(true);
        std::fs::set_permissions(file.path(), perms).unwrap();

        let doc = Document::open(file.path()).unwrap();
        assert_eq!(rows(&doc), [&b"locked"[..]]);
    }

    #[test]
    fn open_missing_file_is_file_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");

        let err = Document::open(&path).unwrap_err();
        match err {
            Error::File { path: p, source } => {
                assert_eq!(p, path);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("expected File error, got {other:?}"),
        }
    }

    #[test]
    fn open_directory_is_file_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Document::open(dir.path()),
            Err(Error::File { .. })
        ));
    }
}
