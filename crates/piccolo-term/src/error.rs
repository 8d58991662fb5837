// SPDX-License-Identifier: MIT
//
// Error taxonomy shared by the terminal and viewer crates.
//
// Every fallible operation in the core returns `Result<T>` and propagates
// with `?`. Nothing is retried and nothing is swallowed: the binary's single
// error boundary restores the terminal and reports whatever reaches it.
//
// Each variant names the operation that failed so the final diagnostic reads
// `piccolo: <operation>: <cause>`.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong between opening the terminal and quitting.
#[derive(Debug, Error)]
pub enum Error {
    /// Opening, reading, or writing the terminal device failed.
    #[error("{op}: {source}")]
    Device {
        op: &'static str,
        #[source]
        source: io::Error,
    },

    /// Getting or setting the terminal attributes failed.
    #[error("{op}: {source}")]
    TermConfig {
        op: &'static str,
        #[source]
        source: io::Error,
    },

    /// Neither the size ioctl nor the cursor probe produced both dimensions.
    #[error("{op}: {reason}")]
    Geometry { op: &'static str, reason: String },

    /// Opening or reading the target file failed.
    #[error("{}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The terminal answered a cursor-position request with garbage.
    #[error("{op}: malformed response {response:?}")]
    Parse { op: &'static str, response: String },
}

/// Result alias used throughout piccolo.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Adapter for `map_err` on device I/O.
    ///
    /// ```
    /// use piccolo_term::Error;
    ///
    /// let failed: std::io::Result<()> = Err(std::io::ErrorKind::BrokenPipe.into());
    /// let err = failed.map_err(Error::device("write")).unwrap_err();
    /// assert!(err.to_string().starts_with("write: "));
    /// ```
    pub fn device(op: &'static str) -> impl FnOnce(io::Error) -> Self {
        move |source| Self::Device { op, source }
    }

    /// Adapter for `map_err` on termios calls.
    pub fn term_config(op: &'static str) -> impl FnOnce(io::Error) -> Self {
        move |source| Self::TermConfig { op, source }
    }

    /// Adapter for `map_err` on file I/O against `path`.
    pub fn file(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::File { path, source }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
