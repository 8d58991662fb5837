// SPDX-License-Identifier: MIT
//
// Viewport geometry: how many rows and columns the terminal has.
//
// The driver usually knows (TIOCGWINSZ). Some terminals answer the ioctl
// with zero columns or not at all; for those we fall back to asking the
// terminal itself: shove the cursor into the bottom-right corner, request
// a cursor position report, and read where it landed.
//
// The report is `ESC [ row ; col R`, row first. `Size` stores rows and
// columns by name so nothing downstream depends on that order.
//
// Known limitation: after a probe, the next key is read and thrown away, on
// the assumption that it is an artifact of moving the real cursor. The read
// blocks like any other key read, so if no such artifact arrives the first
// genuine keystroke is the one dropped.

use tracing::debug;

use crate::ansi;
use crate::device::Device;
use crate::error::{Error, Result};
use crate::input;
use crate::output::OutputBuffer;
use crate::terminal::Terminal;

/// Longest cursor position report we are willing to read.
const MAX_REPORT_LEN: usize = 32;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Number of rows (height in character cells).
    pub rows: u16,
    /// Number of columns (width in character cells).
    pub cols: u16,
}

// ─── Resolution ─────────────────────────────────────────────────────────────

/// Determine the terminal size, falling back to a cursor probe.
///
/// The terminal must already be in raw mode: the probe reads the report
/// byte by byte, which would otherwise wait for Enter. After a probe this
/// blocks for one more key and discards it.
///
/// # Errors
///
/// [`Error::Geometry`] if no usable size comes back, [`Error::Parse`] if the
/// terminal's report is malformed, [`Error::Device`] if the probe cannot be
/// written or read.
pub fn resolve<D: Device>(term: &mut Terminal<D>) -> Result<Size> {
    match term.device().window_size() {
        Ok(size) if size.cols > 0 => {
            debug!(rows = size.rows, cols = size.cols, "window size from ioctl");
            return Ok(size);
        }
        Ok(_) => debug!("ioctl reported zero columns, probing cursor"),
        Err(e) => debug!(error = %e, "window size ioctl failed, probing cursor"),
    }

    let size = probe(term)?;
    debug!(rows = size.rows, cols = size.cols, "window size from cursor probe");

    let key = input::read_key(term)?;
    debug!(?key, "discarded key after cursor probe");
    Ok(size)
}

/// Move the cursor to the far corner and ask where it is.
fn probe<D: Device>(term: &mut Terminal<D>) -> Result<Size> {
    let mut out = OutputBuffer::new();
    ansi::cursor_to_bottom_right(&mut out);
    ansi::request_cursor_position(&mut out);
    term.write_frame(&out)?;

    let mut report = Vec::with_capacity(MAX_REPORT_LEN);
    while report.len() < MAX_REPORT_LEN {
        match term.read_byte()? {
            Some(b'R') | None => break,
            Some(byte) => report.push(byte),
        }
    }
    parse_cursor_report(&report)
}

/// Parse a cursor position report with the trailing `R` removed.
///
/// Expects `ESC [ row ; col`.
///
/// # Errors
///
/// [`Error::Geometry`] when the report is empty or a dimension is zero;
/// [`Error::Parse`] when it is not shaped like a report.
pub fn parse_cursor_report(report: &[u8]) -> Result<Size> {
    const OP: &str = "cursor position report";

    if report.is_empty() {
        return Err(Error::Geometry {
            op: OP,
            reason: "terminal did not answer".into(),
        });
    }

    let malformed = || Error::Parse {
        op: OP,
        response: String::from_utf8_lossy(report).into_owned(),
    };

    let body = report.strip_prefix(b"\x1b[").ok_or_else(malformed)?;
    let body = std::str::from_utf8(body).map_err(|_| malformed())?;
    let (rows, cols) = body.split_once(';').ok_or_else(malformed)?;
    let rows: u16 = rows.parse().map_err(|_| malformed())?;
    let cols: u16 = cols.parse().map_err(|_| malformed())?;

    if rows == 0 || cols == 0 {
        return Err(Error::Geometry {
            op: OP,
            reason: format!("terminal reported {rows} rows and {cols} columns"),
        });
    }
    Ok(Size { rows, cols })
}

// ─── Tests ───────────────────────────────────────────────────────────────────
