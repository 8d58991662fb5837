//! View: editor state to one frame of terminal output.
//!
//! A frame is built from scratch every time into a fresh [`OutputBuffer`]
//! and written with a single call, so the terminal never shows half a frame.
//!
//! ```text
//! ESC[?25l ESC[H                   hide cursor, go home
//! row 0      text | ~ | banner     ESC[K \r\n
//! row 1      ...                   ESC[K \r\n
//! row N-1    ...                   ESC[K          (no line break)
//! ESC[{y};{x}H ESC[?25h            place and show the cursor
//! ```
//!
//! Rows are clipped to the screen width so long lines never wrap, and the
//! drawn cursor column is clipped with them. Rows past the end of the
//! document show `~`. An empty document shows a centred welcome banner a
//! third of the way down.

use piccolo_term::ansi;
use piccolo_term::device::Device;
use piccolo_term::output::OutputBuffer;
use piccolo_term::terminal::Terminal;
use piccolo_term::Result;

use crate::editor::Editor;

/// Banner shown on an empty document.
#[must_use]
pub fn welcome() -> String {
    format!("Piccolo Editor -- Version {}", env!("CARGO_PKG_VERSION"))
}

/// Scroll, draw, and write one frame.
///
/// # Errors
///
/// Returns the device error if the frame cannot be written.
pub fn refresh<D: Device>(editor: &mut Editor, term: &mut Terminal<D>) -> Result<()> {
    editor.scroll();
    let mut out = OutputBuffer::new();
    draw(editor, &mut out);
    term.write_frame(&out)
}

/// Append one full frame for `editor` to `out`.
pub fn draw(editor: &Editor, out: &mut OutputBuffer) {
    ansi::cursor_hide(out);
    ansi::cursor_home(out);

    draw_rows(editor, out);

    // Past the clipped text the cursor sits on the last column.
    let cursor = editor.cursor();
    let x = cursor.x.min(editor.screen_cols().saturating_sub(1));
    ansi::cursor_to(out, x, cursor.y.saturating_sub(editor.row_offset()));
    ansi::cursor_show(out);
}

fn draw_rows(editor: &Editor, out: &mut OutputBuffer) {
    let doc = editor.document();
    let rows = editor.screen_rows();
    let cols = editor.screen_cols();

    for y in 0..rows {
        let file_row = y + editor.row_offset();
        match doc.row(file_row) {
            Some(row) => {
                let text = row.as_bytes();
                out.extend_from_slice(&text[..text.len().min(cols)]);
            }
            None if doc.is_empty() && y == rows / 3 => draw_welcome(out, cols),
            None => out.push(b'~'),
        }

        ansi::clear_line(out);
        if y + 1 < rows {
            out.extend_from_slice(b"\r\n");
        }
    }
}

fn draw_welcome(out: &mut OutputBuffer, cols: usize) {
    let banner = welcome();
    let len = banner.len().min(cols);

    let mut padding = (cols - len) / 2;
    if padding > 0 {
        out.push(b'~');
        padding -= 1;
    }
    out.push_repeated(b' ', padding);
    out.extend_from_slice(&banner.as_bytes()[..len]);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
