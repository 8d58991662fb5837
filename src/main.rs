// SPDX-License-Identifier: MIT
//
// piccolo: a minimal raw-mode terminal file viewer.
//
// This binary wires the two crates together:
//
//   piccolo-term   → terminal session, key decoding, geometry, ANSI output
//   piccolo-editor → document rows, cursor, scrolling, frame rendering
//
// Each iteration of the loop is one frame and one key:
//
//   scroll → draw → single write → read key → dispatch → (quit?)
//
// There is exactly one place where failures are handled: `run` always tears
// the terminal down (clear screen, home cursor, restore attributes) before
// handing the error back to `main`, which reports it and exits non-zero.

mod logging;

use std::env;
use std::path::{Path, PathBuf};
use std::process;

use piccolo_editor::config::Config;
use piccolo_editor::document::Document;
use piccolo_editor::editor::{Action, Editor};
use piccolo_editor::view;
use piccolo_term::device::Device;
use piccolo_term::terminal::Terminal;
use piccolo_term::{Result, geometry, input};

fn main() {
    let Some(path) = env::args_os().nth(1).map(PathBuf::from) else {
        eprintln!("usage: piccolo <file>");
        process::exit(1);
    };

    let config = Config::from_env().unwrap_or_else(|e| {
        eprintln!("piccolo: {e}");
        process::exit(1);
    });
    logging::init(config.log_file.as_deref());

    let result = Terminal::open().and_then(|mut term| run(&mut term, &path, &config));
    if let Err(e) = result {
        tracing::error!(error = %e, "fatal");
        eprintln!("piccolo: {e}");
        process::exit(1);
    }
    tracing::info!("clean exit");
}

/// Enter raw mode, view `path` until the quit key, and restore the terminal.
///
/// The terminal is torn down on every path out of the session, success or
/// failure. A session error takes precedence over a teardown error.
fn run<D: Device>(term: &mut Terminal<D>, path: &Path, config: &Config) -> Result<()> {
    term.enter_raw_mode()?;
    let outcome = session(term, path, config);
    let restored = term.teardown();
    outcome.and(restored)
}

fn session<D: Device>(term: &mut Terminal<D>, path: &Path, config: &Config) -> Result<()> {
    let screen = geometry::resolve(term)?;
    let document = Document::open(path)?;
    let mut editor = Editor::new(document, screen, config);

    loop {
        view::refresh(&mut editor, term)?;
        let key = input::read_key(term)?;
        if editor.handle_key(key) == Action::Quit {
            return Ok(());
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
