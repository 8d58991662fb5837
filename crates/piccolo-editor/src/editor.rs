//! Editor state: cursor, scroll offset, and key dispatch.
//!
//! The editor owns the document and everything that says where the user is
//! looking. It has no terminal; input arrives as [`Key`]s and the
//! [`view`](crate::view) reads the state back out to draw it.
//!
//! # Dispatch
//!
//! | Key                 | Effect                                              |
//! |---------------------|-----------------------------------------------------|
//! | quit key (Ctrl-Q)   | [`Action::Quit`]                                    |
//! | Arrows              | one clamped step                                    |
//! | `PageUp`/`PageDown` | `ArrowUp`/`ArrowDown` repeated once per screen row  |
//! | Home                | column 0                                            |
//! | End                 | last byte of the row, or last screen column past EOF |
//! | anything else       | nothing                                             |
//!
//! Scrolling is not part of dispatch. [`Editor::scroll`] brings the cursor
//! back into view and runs once per frame, just before drawing.

use piccolo_term::geometry::Size;
use piccolo_term::input::Key;
use tracing::debug;

use crate::config::Config;
use crate::cursor::{Cursor, Movement};
use crate::document::Document;

/// What the main loop should do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Keep running.
    Continue,
    /// Tear down and exit.
    Quit,
}

/// The viewer's whole state.
#[derive(Debug, Clone)]
pub struct Editor {
    document: Document,
    cursor: Cursor,

    /// First document row shown at the top of the screen.
    row_offset: usize,

    screen: Size,
    quit_key: u8,
}

impl Editor {
    /// An editor showing `document` on a screen of `screen` cells.
    #[must_use]
    pub const fn new(document: Document, screen: Size, config: &Config) -> Self {
        Self {
            document,
            cursor: Cursor::new(),
            row_offset: 0,
            screen,
            quit_key: config.quit_key,
        }
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    #[inline]
    #[must_use]
    pub const fn row_offset(&self) -> usize {
        self.row_offset
    }

    /// Number of text rows on screen.
    #[inline]
    #[must_use]
    pub const fn screen_rows(&self) -> usize {
        self.screen.rows as usize
    }

    /// Number of columns on screen.
    #[inline]
    #[must_use]
    pub const fn screen_cols(&self) -> usize {
        self.screen.cols as usize
    }

    // -- Dispatch -----------------------------------------------------------

    /// React to one key.
    pub fn handle_key(&mut self, key: Key) -> Action {
        match key {
            Key::Byte(b) if b == self.quit_key => {
                debug!("quit key pressed");
                return Action::Quit;
            }
            Key::ArrowUp => self.move_cursor(Movement::Up),
            Key::ArrowDown => self.move_cursor(Movement::Down),
            Key::ArrowLeft => self.move_cursor(Movement::Left),
            Key::ArrowRight => self.move_cursor(Movement::Right),
            Key::PageUp => self.repeat(Movement::Up, self.screen_rows()),
            Key::PageDown => self.repeat(Movement::Down, self.screen_rows()),
            Key::Home => self.cursor.x = 0,
            Key::End => self.cursor.x = self.end_column(),
            Key::Byte(_) | Key::Delete | Key::Escape => {}
        }
        Action::Continue
    }

    /// One clamped step.
    pub fn move_cursor(&mut self, movement: Movement) {
        self.cursor.step(movement, &self.document);
    }

    /// `count` clamped steps. Every step clamps on its own.
    fn repeat(&mut self, movement: Movement, count: usize) {
        for _ in 0..count {
            self.move_cursor(movement);
        }
    }

    /// Where End lands: the row's last byte, or the last screen column when
    /// the cursor is past the end of the document.
    fn end_column(&self) -> usize {
        self.document.row(self.cursor.y).map_or_else(
            || self.screen_cols().saturating_sub(1),
            |row| row.len().saturating_sub(1),
        )
    }

    // -- Scrolling ----------------------------------------------------------

    /// Adjust `row_offset` so the cursor row is on screen.
    ///
    /// Afterwards `row_offset <= cursor.y < row_offset + screen_rows`.
    pub fn scroll(&mut self) {
        let y = self.cursor.y;
        if y < self.row_offset {
            self.row_offset = y;
        }
        let rows = self.screen_rows();
        if rows > 0 && y >= self.row_offset + rows {
            self.row_offset = y - rows + 1;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
