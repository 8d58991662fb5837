// SPDX-License-Identifier: MIT
//
// Terminal devices: the seam between piccolo and the OS.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr) and ioctl (TIOCGWINSZ). These are the standard POSIX interfaces
// for terminal control and there is no safe alternative. Each unsafe block
// is minimal and touches only a stack-owned struct.
#![allow(unsafe_code)]
//
// A `Device` is anything that reads keystrokes, writes escape sequences, and
// exposes termios attributes plus a window size. Two implementations:
//
//   Tty           the real thing. Input from /dev/tty, output to stdout.
//   MemoryDevice  scripted input bytes and timeouts, captured output, and a
//                mutable attribute slot. Drives every terminal test.

use std::collections::VecDeque;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::os::unix::io::AsRawFd;

use crate::geometry::Size;

/// Path of the controlling terminal.
const TTY_PATH: &str = "/dev/tty";

// ─── Attributes ─────────────────────────────────────────────────────────────

/// Snapshot of a terminal's line-discipline configuration.
///
/// Wraps the raw `termios` so it can be restored verbatim. Raw-mode
/// attributes are always derived from a snapshot via [`raw`](Self::raw),
/// never assembled from scratch.
#[derive(Clone, Copy)]
pub struct Attributes(libc::termios);

impl Attributes {
    /// Wrap an existing `termios`.
    #[must_use]
    pub const fn from_termios(termios: libc::termios) -> Self {
        Self(termios)
    }

    /// The wrapped `termios`.
    #[must_use]
    pub const fn as_termios(&self) -> &libc::termios {
        &self.0
    }

    /// Mutable access to the wrapped `termios`.
    pub const fn as_termios_mut(&mut self) -> &mut libc::termios {
        &mut self.0
    }

    /// Derive raw-mode attributes from this snapshot.
    ///
    /// Input: no CR→NL translation, no break signal, no parity check, no
    /// 8th-bit strip, no XON/XOFF. Output: no post-processing. Local: no
    /// echo, no canonical mode, no signal keys, no extended input. Control:
    /// 8-bit characters. `read()` returns after at most 100ms with whatever
    /// arrived, possibly nothing.
    #[must_use]
    pub fn raw(&self) -> Self {
        let mut t = self.0;
        t.c_iflag &= !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
        t.c_oflag &= !libc::OPOST;
        t.c_cflag |= libc::CS8;
        t.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);
        t.c_cc[libc::VMIN] = 0;
        t.c_cc[libc::VTIME] = 1;
        Self(t)
    }

    /// Whether these attributes describe raw mode (no echo, non-canonical).
    #[must_use]
    pub const fn is_raw(&self) -> bool {
        self.0.c_lflag & (libc::ECHO | libc::ICANON) == 0
    }
}

impl Default for Attributes {
    /// All flags cleared, all control characters zero.
    fn default() -> Self {
        // SAFETY: termios is a plain C struct of integers and integer arrays;
        // the all-zero bit pattern is a valid value.
        Self(unsafe { std::mem::zeroed() })
    }
}

impl PartialEq for Attributes {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (&self.0, &other.0);
        a.c_iflag == b.c_iflag
            && a.c_oflag == b.c_oflag
            && a.c_cflag == b.c_cflag
            && a.c_lflag == b.c_lflag
            && a.c_cc == b.c_cc
            && a.c_ispeed == b.c_ispeed
            && a.c_ospeed == b.c_ospeed
            && same_line_discipline(a, b)
    }
}

#[cfg(target_os = "linux")]
const fn same_line_discipline(a: &libc::termios, b: &libc::termios) -> bool {
    a.c_line == b.c_line
}

// Only Linux carries a line discipline in termios.
#[cfg(not(target_os = "linux"))]
const fn same_line_discipline(_: &libc::termios, _: &libc::termios) -> bool {
    true
}

impl Eq for Attributes {}

impl fmt::Debug for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attributes")
            .field("iflag", &format_args!("{:#x}", self.0.c_iflag))
            .field("oflag", &format_args!("{:#x}", self.0.c_oflag))
            .field("cflag", &format_args!("{:#x}", self.0.c_cflag))
            .field("lflag", &format_args!("{:#x}", self.0.c_lflag))
            .field("vmin", &self.0.c_cc[libc::VMIN])
            .field("vtime", &self.0.c_cc[libc::VTIME])
            .field("ispeed", &self.0.c_ispeed)
            .field("ospeed", &self.0.c_ospeed)
            .finish_non_exhaustive()
    }
}

// ─── Device ─────────────────────────────────────────────────────────────────

/// A terminal the session can drive.
///
/// `Read` delivers keystrokes and terminal responses; a read returning
/// `Ok(0)` means the inter-byte timeout expired with no input. `Write`
/// carries escape sequences to the screen.
pub trait Device: Read + Write {
    /// Read the current line-discipline attributes.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the attributes cannot be read.
    fn attributes(&self) -> io::Result<Attributes>;

    /// Apply `attrs`, discarding any unread input first.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the attributes cannot be applied.
    fn set_attributes(&mut self, attrs: &Attributes) -> io::Result<()>;

    /// Ask the driver for the window size.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver does not answer.
    fn window_size(&self) -> io::Result<Size>;
}

// ─── Tty ────────────────────────────────────────────────────────────────────

/// The process's controlling terminal.
pub struct Tty {
    input: File,
    output: io::Stdout,
}

impl Tty {
    /// Open `/dev/tty` for reading and writing.
    ///
    /// # Errors
    ///
    /// Returns the OS error if there is no controlling terminal.
    pub fn open() -> io::Result<Self> {
        let input = OpenOptions::new().read(true).write(true).open(TTY_PATH)?;
        Ok(Self {
            input,
            output: io::stdout(),
        })
    }
}

impl Read for Tty {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.input.read(buf)
    }
}

impl Write for Tty {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.output.write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.output.lock().write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.output.flush()
    }
}

impl Device for Tty {
    fn attributes(&self) -> io::Result<Attributes> {
        let mut attrs = Attributes::default();
        // SAFETY: the fd is owned by `self.input` and `attrs` is a valid
        // termios for tcgetattr to fill.
        if unsafe { libc::tcgetattr(self.input.as_raw_fd(), &raw mut attrs.0) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(attrs)
    }

    fn set_attributes(&mut self, attrs: &Attributes) -> io::Result<()> {
        // SAFETY: the fd is owned by `self.input`; tcsetattr only reads `attrs`.
        if unsafe { libc::tcsetattr(self.input.as_raw_fd(), libc::TCSAFLUSH, &raw const attrs.0) }
            != 0
        {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    fn window_size(&self) -> io::Result<Size> {
        // SAFETY: winsize is plain integers; zeroed is valid.
        let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
        // SAFETY: TIOCGWINSZ writes a winsize into the pointer we pass.
        if unsafe { libc::ioctl(self.input.as_raw_fd(), libc::TIOCGWINSZ, &raw mut ws) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(Size {
            rows: ws.ws_row,
            cols: ws.ws_col,
        })
    }
}

// ─── MemoryDevice ───────────────────────────────────────────────────────────

/// An in-memory terminal.
///
/// Input is a script of bytes and timeouts consumed one read at a time.
/// When the script runs dry, reads fail with `UnexpectedEof` so a test can
/// never hang on a blocking decode. Everything written is captured.
#[derive(Debug)]
pub struct MemoryDevice {
    input: VecDeque<Option<u8>>,
    output: Vec<u8>,
    attributes: Attributes,
    size: Option<Size>,
    fail_set_attributes: bool,
}

impl MemoryDevice {
    /// A cooked-mode terminal. `size` is what the size ioctl reports;
    /// `None` makes it fail.
    #[must_use]
    pub fn new(size: Option<Size>) -> Self {
        Self {
            input: VecDeque::new(),
            output: Vec::new(),
            attributes: cooked(),
            size,
            fail_set_attributes: false,
        }
    }

    /// Queue input bytes, each delivered by its own read.
    pub fn push_input(&mut self, bytes: &[u8]) {
        self.input.extend(bytes.iter().copied().map(Some));
    }

    /// Queue one read that times out with no data.
    pub fn push_timeout(&mut self) {
        self.input.push_back(None);
    }

    /// Bytes still waiting to be read (timeouts included).
    #[must_use]
    pub fn pending_input(&self) -> usize {
        self.input.len()
    }

    /// Everything written so far.
    #[must_use]
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Forget captured output.
    pub fn clear_output(&mut self) {
        self.output.clear();
    }

    /// The attributes currently applied.
    #[must_use]
    pub const fn current_attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Make every subsequent `set_attributes` fail.
    pub const fn fail_set_attributes(&mut self) {
        self.fail_set_attributes = true;
    }
}

/// Attributes of a freshly opened, line-buffered terminal.
fn cooked() -> Attributes {
    let mut attrs = Attributes::default();
    let t = attrs.as_termios_mut();
    t.c_iflag = libc::BRKINT | libc::ICRNL | libc::IXON;
    t.c_oflag = libc::OPOST;
    t.c_cflag = libc::CS8 | libc::CREAD;
    t.c_lflag = libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG;
    t.c_cc[libc::VMIN] = 1;
    t.c_cc[libc::VTIME] = 0;
    t.c_ispeed = libc::B38400;
    t.c_ospeed = libc::B38400;
    attrs
}

impl Read for MemoryDevice {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        match self.input.pop_front() {
            Some(Some(byte)) => {
                buf[0] = byte;
                Ok(1)
            }
            Some(None) => Ok(0),
            None => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input script exhausted",
            )),
        }
    }
}

impl Write for MemoryDevice {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.output.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Device for MemoryDevice {
    fn attributes(&self) -> io::Result<Attributes> {
        Ok(self.attributes)
    }

    fn set_attributes(&mut self, attrs: &Attributes) -> io::Result<()> {
        if self.fail_set_attributes {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied));
        }
        self.attributes = *attrs;
        Ok(())
    }

    fn window_size(&self) -> io::Result<Size> {
        self.size
            .ok_or_else(|| io::Error::new(io::ErrorKind::Unsupported, "no window size"))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
