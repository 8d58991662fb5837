// SPDX-License-Identifier: MIT
//
// piccolo-term: Terminal control for piccolo.
//
// Everything that touches the controlling terminal lives here: the termios
// snapshot and raw-mode lifecycle, the window-size query with its
// cursor-position fallback, the escape-sequence key decoder, and the frame
// buffer that lets a whole screen go out in one write.
//
// No TUI framework sits underneath. Raw mode is plain termios, output is
// plain VT100, and the device itself is a trait so that tests can drive the
// whole stack against an in-memory terminal.

#[cfg(not(unix))]
compile_error!("piccolo-term drives a termios terminal and only builds on Unix");

pub mod ansi;
pub mod device;
pub mod error;
pub mod geometry;
pub mod input;
pub mod output;
pub mod terminal;

pub use error::{Error, Result};
