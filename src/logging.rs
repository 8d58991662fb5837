// SPDX-License-Identifier: MIT
//
// File logging.
//
// Standard output is the screen, so log lines can never go there. When
// `PICCOLO_LOG` names a file, a `tracing` subscriber writes to it, filtered
// by `RUST_LOG` (default: everything at debug and above). Without it no
// subscriber is installed and the `tracing` macros cost next to nothing.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Install the global subscriber if a log file is configured.
///
/// A log file that cannot be created is reported on stderr and otherwise
/// ignored; logging is never a reason not to start.
pub fn init(log_file: Option<&Path>) {
    let Some(path) = log_file else {
        return;
    };
    match File::create(path) {
        Ok(file) => {
            let _ = build_subscriber(file).try_init();
        }
        Err(e) => eprintln!("piccolo: cannot create log file {}: {e}", path.display()),
    }
}

/// The subscriber used in production: plain-text lines into `file`.
pub fn build_subscriber(file: File) -> impl tracing::Subscriber + Send + Sync {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let fmt_layer = fmt::layer().with_writer(Arc::new(file)).with_ansi(false);

    tracing_subscriber::registry().with(fmt_layer).with(filter)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
