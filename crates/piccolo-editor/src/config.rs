//! Configuration: settings read from the environment.
//!
//! | Variable           | Meaning                                   | Default  |
//! |--------------------|-------------------------------------------|----------|
//! | `PICCOLO_LOG`      | Write a debug log to this file            | no log   |
//! | `PICCOLO_QUIT_KEY` | Letter that quits together with Ctrl      | `q`      |
//!
//! Logging goes to a file because standard output is the screen.
//! `RUST_LOG` filters the log in the usual way.

use std::path::PathBuf;

use thiserror::Error;

/// Environment variable naming the log file.
pub const LOG_VAR: &str = "PICCOLO_LOG";

/// Environment variable choosing the quit letter.
pub const QUIT_KEY_VAR: &str = "PICCOLO_QUIT_KEY";

/// Letter that quits when pressed with Ctrl, unless overridden.
const DEFAULT_QUIT_LETTER: u8 = b'q';

/// A setting that could not be understood.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PICCOLO_QUIT_KEY: expected a single ASCII letter, got {0:?}")]
    QuitKey(String),
}

/// Runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Where to write the debug log, if anywhere.
    pub log_file: Option<PathBuf>,

    /// The byte that quits: Ctrl plus the configured letter.
    pub quit_key: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_file: None,
            quit_key: ctrl(DEFAULT_QUIT_LETTER),
        }
    }
}

impl Config {
    /// Read settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to something unusable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through `lookup`, which maps a variable name to its value.
    ///
    /// Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to something unusable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v: &String| !v.is_empty());
        let mut config = Self::default();

        if let Some(path) = get(LOG_VAR) {
            config.log_file = Some(PathBuf::from(path));
        }

        if let Some(letter) = get(QUIT_KEY_VAR) {
            let byte = match *letter.as_bytes() {
                [b] if b.is_ascii_alphabetic() => Some(b),
                _ => None,
            };
            config.quit_key = ctrl(byte.ok_or(ConfigError::QuitKey(letter))?);
        }

        Ok(config)
    }
}

/// The control byte for `letter`.
const fn ctrl(letter: u8) -> u8 {
    letter & 0x1F
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
