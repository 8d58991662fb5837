// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that append VT100 sequences to an `OutputBuffer`. No state,
// no decisions about when to emit; callers decide. This module just knows
// the byte-level encoding of the handful of commands piccolo needs.
//
// Cursor positions are 0-indexed in our API and converted to 1-indexed for
// the terminal (the protocol counts from 1).

use crate::output::OutputBuffer;

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to `(x, y)` using the CUP (Cursor Position) sequence.
///
/// Our coordinates are 0-indexed; CUP is 1-indexed.
#[inline]
pub fn cursor_to(out: &mut OutputBuffer, x: usize, y: usize) {
    out.push_str(&format!("\x1b[{};{}H", y + 1, x + 1));
}

/// Move the cursor to the top-left corner (CUP with no parameters).
#[inline]
pub fn cursor_home(out: &mut OutputBuffer) {
    out.extend_from_slice(b"\x1b[H");
}

/// Push the cursor as far right and down as the terminal allows.
///
/// CUF and CUD stop at the screen edge, unlike CUP with a huge argument,
/// whose behavior is unspecified.
#[inline]
pub fn cursor_to_bottom_right(out: &mut OutputBuffer) {
    out.extend_from_slice(b"\x1b[999C\x1b[999B");
}

/// Ask the terminal to report the cursor position (DSR 6).
///
/// The answer arrives on input as `ESC [ row ; col R`.
#[inline]
pub fn request_cursor_position(out: &mut OutputBuffer) {
    out.extend_from_slice(b"\x1b[6n");
}

/// Hide the cursor (DECTCEM reset).
#[inline]
pub fn cursor_hide(out: &mut OutputBuffer) {
    out.extend_from_slice(b"\x1b[?25l");
}

/// Show the cursor (DECTCEM set).
#[inline]
pub fn cursor_show(out: &mut OutputBuffer) {
    out.extend_from_slice(b"\x1b[?25h");
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear the entire screen (ED 2).
#[inline]
pub fn clear_screen(out: &mut OutputBuffer) {
    out.extend_from_slice(b"\x1b[2J");
}

/// Clear from the cursor to the end of the line (EL 0).
#[inline]
pub fn clear_line(out: &mut OutputBuffer) {
    out.extend_from_slice(b"\x1b[K");
}

// ─── Tests ───────────────────────────────────────────────────────────────────
