// SPDX-License-Identifier: MIT
//
// Terminal session: raw mode with guaranteed restoration.
//
// `Terminal` owns the device and the one snapshot of its original
// attributes. Raw mode is derived from that snapshot, and leaving raw mode
// writes the snapshot back verbatim, so the user's terminal comes back
// exactly as it was.
//
// Restoration happens once. `exit_raw_mode` consumes the snapshot; `Drop`
// restores it only if nobody did, which covers early returns and unwinding
// panics. A process killed outright is not covered.

use std::io::{ErrorKind, Read, Write};

use tracing::debug;

use crate::ansi;
use crate::device::{Attributes, Device, Tty};
use crate::error::{Error, Result};
use crate::input::ByteSource;
use crate::output::OutputBuffer;

/// Terminal handle with RAII cleanup.
///
/// # Example
///
/// ```no_run
/// use piccolo_term::terminal::Terminal;
///
/// let mut term = Terminal::open()?;
/// term.enter_raw_mode()?;
/// // ... render frames, read keys ...
/// term.teardown()?;
/// # Ok::<(), piccolo_term::Error>(())
/// ```
pub struct Terminal<D: Device = Tty> {
    device: D,

    /// Attributes captured by `enter_raw_mode`, present while raw.
    original: Option<Attributes>,
}

impl Terminal<Tty> {
    /// Open the controlling terminal.
    ///
    /// Does **not** enter raw mode. Call [`enter_raw_mode`](Self::enter_raw_mode).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Device`] if there is no controlling terminal.
    pub fn open() -> Result<Self> {
        let device = Tty::open().map_err(Error::device("open /dev/tty"))?;
        Ok(Self::with_device(device))
    }
}

impl<D: Device> Terminal<D> {
    /// Wrap an already-open device.
    pub const fn with_device(device: D) -> Self {
        Self {
            device,
            original: None,
        }
    }

    /// The underlying device.
    #[inline]
    pub const fn device(&self) -> &D {
        &self.device
    }

    /// Mutable access to the underlying device.
    #[inline]
    pub const fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Whether raw mode is active.
    #[inline]
    #[must_use]
    pub const fn is_raw(&self) -> bool {
        self.original.is_some()
    }

    // ── Raw Mode ────────────────────────────────────────────────────

    /// Snapshot the current attributes and switch to raw mode.
    ///
    /// Idempotent: calling it while already raw is a no-op, so the snapshot
    /// is never overwritten with raw attributes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TermConfig`] if the attributes cannot be read or set.
    pub fn enter_raw_mode(&mut self) -> Result<()> {
        if self.original.is_some() {
            return Ok(());
        }

        let original = self
            .device
            .attributes()
            .map_err(Error::term_config("tcgetattr"))?;
        self.device
            .set_attributes(&original.raw())
            .map_err(Error::term_config("tcsetattr"))?;
        self.original = Some(original);

        debug!("entered raw mode");
        Ok(())
    }

    /// Restore the attributes captured by [`enter_raw_mode`](Self::enter_raw_mode).
    ///
    /// Idempotent: without an active snapshot this does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TermConfig`] if the attributes cannot be set. The
    /// snapshot is dropped either way, so restoration is attempted once.
    pub fn exit_raw_mode(&mut self) -> Result<()> {
        let Some(original) = self.original.take() else {
            return Ok(());
        };
        self.device
            .set_attributes(&original)
            .map_err(Error::term_config("tcsetattr"))?;

        debug!("restored original terminal attributes");
        Ok(())
    }

    /// Clear the screen, home the cursor, and leave raw mode.
    ///
    /// Raw mode is left even if the screen writes fail; the first error is
    /// reported.
    ///
    /// # Errors
    ///
    /// Returns the write error or the restore error.
    pub fn teardown(&mut self) -> Result<()> {
        let mut out = OutputBuffer::new();
        ansi::clear_screen(&mut out);
        ansi::cursor_home(&mut out);
        let cleared = self.write_frame(&out);
        let restored = self.exit_raw_mode();
        cleared.and(restored)
    }

    // ── I/O ─────────────────────────────────────────────────────────

    /// Write a whole buffer in one call and flush.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Device`] if the write or flush fails.
    pub fn write_frame(&mut self, out: &OutputBuffer) -> Result<()> {
        self.device
            .write_all(out.as_bytes())
            .map_err(Error::device("write"))?;
        self.device.flush().map_err(Error::device("flush"))
    }

    /// Read a single byte.
    ///
    /// Returns `Ok(None)` when the inter-byte timeout expires with no input.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Device`] for any failure other than a timeout.
    pub fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        match self.device.read(&mut byte) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(byte[0])),
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::Interrupted) => {
                Ok(None)
            }
            Err(e) => Err(Error::device("read")(e)),
        }
    }
}

impl<D: Device> ByteSource for Terminal<D> {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        Self::read_byte(self)
    }
}

impl<D: Device> Drop for Terminal<D> {
    fn drop(&mut self) {
        if let Some(original) = self.original.take() {
            let _ = self.device.set_attributes(&original);
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
