//! Cursor: a position in document coordinates.
//!
//! `y` indexes rows and may sit one past the last row (the empty line after
//! the end of the file). `x` indexes bytes within the row at `y` and may sit
//! one past the last byte.
//!
//! Movement is one step at a time and always clamped. After every step the
//! column is re-clamped against the row now under the cursor, since rows
//! differ in length: moving down from a long row onto a short one pulls `x`
//! back to the short row's end.

use crate::document::Document;

/// A single-step cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Up,
    Down,
    Left,
    Right,
}

/// A cursor in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Byte column within the row.
    pub x: usize,
    /// Row index.
    pub y: usize,
}

impl Cursor {
    /// Create a cursor at the origin.
    #[must_use]
    pub const fn new() -> Self {
        Self { x: 0, y: 0 }
    }

    /// Create a cursor at `(x, y)`.
    #[must_use]
    pub const fn at(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Move one step, staying inside `doc`.
    ///
    /// - `Up` stops at row 0, `Down` at one past the last row.
    /// - `Left` stops at column 0.
    /// - `Right` only moves on an existing row, up to one past its end.
    pub fn step(&mut self, movement: Movement, doc: &Document) {
        match movement {
            Movement::Up => self.y = self.y.saturating_sub(1),
            Movement::Down => {
                if self.y < doc.row_count() {
                    self.y += 1;
                }
            }
            Movement::Left => self.x = self.x.saturating_sub(1),
            Movement::Right => {
                if doc.row(self.y).is_some_and(|row| self.x < row.len()) {
                    self.x += 1;
                }
            }
        }

        let limit = doc.row(self.y).map_or(0, crate::document::Row::len);
        self.x = self.x.min(limit);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Document {
        Document::from_text("hello world\nhi\n\nlonger line here")
    }

    #[test]
    fn new_is_origin() {
        assert_eq!(Cursor::new(), Cursor::at(0, 0));
        assert_eq!(Cursor::default(), Cursor::new());
    }

    // ── Vertical ──────────────────────────────────────────────────────

    #[test]
    fn up_stops_at_zero() {
        let mut c = Cursor::new();
        c.step(Movement::Up, &doc());
        assert_eq!(c, Cursor::at(0, 0));
    }

    #[test]
    fn down_stops_one_past_last_row() {
        let d = doc();
        let mut c = Cursor::new();
        for _ in 0..10 {
            c.step(Movement::Down, &d);
        }
        assert_eq!(c.y, d.row_count());
    }

    #[test]
    fn down_in_empty_document_stays() {
        let mut c = Cursor::new();
        c.step(Movement::Down, &Document::new());
        assert_eq!(c, Cursor::at(0, 0));
    }

    #[test]
    fn vertical_move_reclamps_column() {
        let d = doc();
        let mut c = Cursor::at(11, 0);
        c.step(Movement::Down, &d);
        assert_eq!(c, Cursor::at(2, 1)); // "hi"
        c.step(Movement::Down, &d);
        assert_eq!(c, Cursor::at(0, 2)); // ""
    }

    #[test]
    fn column_is_not_remembered() {
        let d = doc();
        let mut c = Cursor::at(11, 0);
        c.step(Movement::Down, &d);
        c.step(Movement::Up, &d);
        assert_eq!(c, Cursor::at(2, 0));
    }

    #[test]
    fn past_last_row_column_is_zero() {
        let d = doc();
        let mut c = Cursor::at(5, 3);
        c.step(Movement::Down, &d);
        assert_eq!(c, Cursor::at(0, 4));
    }

    // ── Horizontal ────────────────────────────────────────────────────

    #[test]
    fn left_stops_at_zero() {
        let mut c = Cursor::new();
        c.step(Movement::Left, &doc());
        assert_eq!(c.x, 0);
    }

    #[test]
    fn right_stops_one_past_row_end() {
        let d = doc();
        let mut c = Cursor::at(0, 1);
        for _ in 0..5 {
            c.step(Movement::Right, &d);
        }
        assert_eq!(c, Cursor::at(2, 1));
    }

    #[test]
    fn right_past_last_row_does_nothing() {
        let d = doc();
        let mut c = Cursor::at(0, d.row_count());
        c.step(Movement::Right, &d);
        assert_eq!(c.x, 0);
    }

    #[test]
    fn down_then_right_clamps_to_new_row() {
        let d = doc();
        let mut c = Cursor::at(11, 0);
        c.step(Movement::Down, &d);
        c.step(Movement::Right, &d);
        assert_eq!(c, Cursor::at(2, 1));
    }

    #[test]
    fn out_of_range_column_is_pulled_in_by_any_step() {
        let d = doc();
        let mut c = Cursor::at(79, 4);
        c.step(Movement::Left, &d);
        assert_eq!(c, Cursor::at(0, 4));
    }
}
