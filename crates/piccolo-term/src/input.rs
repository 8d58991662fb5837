// SPDX-License-Identifier: MIT
//
// Key decoder.
//
// Turns the raw byte stream from a raw-mode terminal into logical keys. A
// byte other than ESC is a key by itself. ESC opens a short escape sequence
// that is resolved by a small state machine:
//
//   Start ──ESC──▶ Escape ──'['──▶ Csi ──digit──▶ CsiDigit(d) ──'~'──▶ key
//                    │               └──letter──▶ key
//                    ├──'O'──▶ Ss3 ──letter──▶ key
//                    └──other──▶ Discard ──any──▶ Escape
//
// Every byte after ESC is read with the terminal's inter-byte timeout. If a
// read times out mid-sequence the decoder gives up and reports a bare
// Escape. That makes a lone Escape press cheap to detect, at the price that
// a sequence arriving slower than the timeout also reads as Escape.
//
// Anything unrecognized collapses to Escape too. Bytes already consumed by
// an unrecognized sequence are dropped, never replayed.

use crate::error::Result;

/// The escape byte.
const ESC: u8 = 0x1B;

// ─── Key ────────────────────────────────────────────────────────────────────

/// A decoded key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A plain byte: printable character or control character.
    Byte(u8),
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,
    Delete,
    Escape,
}

impl Key {
    /// The key produced by holding Ctrl with `letter`.
    ///
    /// ```
    /// use piccolo_term::input::Key;
    ///
    /// assert_eq!(Key::ctrl(b'q'), Key::Byte(0x11));
    /// ```
    #[must_use]
    pub const fn ctrl(letter: u8) -> Self {
        Self::Byte(letter & 0x1F)
    }
}

// ─── Byte sources ───────────────────────────────────────────────────────────

/// Something that hands out input one byte at a time.
///
/// `Ok(None)` means the inter-byte timeout expired with nothing to read.
pub trait ByteSource {
    /// Read one byte, or `None` on timeout.
    ///
    /// # Errors
    ///
    /// Any I/O failure other than a timeout.
    fn read_byte(&mut self) -> Result<Option<u8>>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        (**self).read_byte()
    }
}

// ─── State machine ──────────────────────────────────────────────────────────

/// Position inside an escape sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Nothing read yet.
    Start,
    /// Read ESC.
    Escape,
    /// Read `ESC [`.
    Csi,
    /// Read `ESC [ digit`.
    CsiDigit(u8),
    /// Read `ESC O`.
    Ss3,
    /// Read ESC and an unknown introducer; one more byte is swallowed.
    Discard,
}

/// Outcome of feeding one byte to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Resolved(Key),
    Pending(State),
}

impl State {
    fn advance(self, byte: u8) -> Step {
        match self {
            Self::Start if byte == ESC => Step::Pending(Self::Escape),
            Self::Start => Step::Resolved(Key::Byte(byte)),
            Self::Escape => Step::Pending(match byte {
                b'[' => Self::Csi,
                b'O' => Self::Ss3,
                _ => Self::Discard,
            }),
            // Digits are checked before the letter table.
            Self::Csi if byte.is_ascii_digit() => Step::Pending(Self::CsiDigit(byte)),
            Self::Csi => Step::Resolved(match byte {
                b'A' => Key::ArrowUp,
                b'B' => Key::ArrowDown,
                b'C' => Key::ArrowRight,
                b'D' => Key::ArrowLeft,
                b'H' => Key::Home,
                b'F' => Key::End,
                _ => Key::Escape,
            }),
            Self::CsiDigit(digit) if byte == b'~' => Step::Resolved(tilde_key(digit)),
            Self::Ss3 => Step::Resolved(match byte {
                b'H' => Key::Home,
                b'F' => Key::End,
                _ => Key::Escape,
            }),
            Self::CsiDigit(_) | Self::Discard => Step::Resolved(Key::Escape),
        }
    }
}

/// Map the digit of `ESC [ digit ~`.
const fn tilde_key(digit: u8) -> Key {
    match digit {
        b'1' | b'7' => Key::Home,
        b'3' => Key::Delete,
        b'4' | b'8' => Key::End,
        b'5' => Key::PageUp,
        b'6' => Key::PageDown,
        _ => Key::Escape,
    }
}

// ─── Decoding ───────────────────────────────────────────────────────────────

/// Block until a key arrives and return it.
///
/// Timeouts before the first byte are waited out; timeouts after an ESC
/// resolve the sequence to [`Key::Escape`].
///
/// # Errors
///
/// Propagates read failures from `source`.
pub fn read_key<S: ByteSource + ?Sized>(source: &mut S) -> Result<Key> {
    loop {
        if let Some(key) = poll_key(source)? {
            return Ok(key);
        }
    }
}

/// Decode one key if a first byte arrives within one timeout.
///
/// Returns `Ok(None)` when nothing arrives. Once a byte has arrived, the key
/// is always resolved.
///
/// # Errors
///
/// Propagates read failures from `source`.
pub fn poll_key<S: ByteSource + ?Sized>(source: &mut S) -> Result<Option<Key>> {
    let Some(first) = source.read_byte()? else {
        return Ok(None);
    };

    let mut state = match State::Start.advance(first) {
        Step::Resolved(key) => return Ok(Some(key)),
        Step::Pending(state) => state,
    };

    loop {
        let Some(byte) = source.read_byte()? else {
            return Ok(Some(Key::Escape));
        };
        match state.advance(byte) {
            Step::Resolved(key) => return Ok(Some(key)),
            Step::Pending(next) => state = next,
        }
    }
}

/// The endless stream of keys from `source`.
///
/// Each item blocks until a key arrives. The stream never ends on its own;
/// it yields an error when the source fails.
pub fn keys<S: ByteSource>(source: S) -> Keys<S> {
    Keys { source }
}

/// Iterator returned by [`keys`].
#[derive(Debug)]
pub struct Keys<S> {
    source: S,
}

impl<S: ByteSource> Iterator for Keys<S> {
    type Item = Result<Key>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(read_key(&mut self.source))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io;

    use super::*;
    use crate::error::Error;

    /// Scripted input: `Some(b)` is a byte, `None` a timeout. Running dry
    /// is an error so a broken decoder cannot spin forever.
    struct Script(VecDeque<Option<u8>>);

    impl Script {
        fn bytes(bytes: &[u8]) -> Self {
            Self(bytes.iter().copied().map(Some).collect())
        }

        fn then_timeout(mut self) -> Self {
            self.0.push_back(None);
            self
        }

        fn left(&self) -> usize {
            self.0.len()
        }
    }

    impl ByteSource for Script {
        fn read_byte(&mut self) -> Result<Option<u8>> {
            self.0.pop_front().ok_or_else(|| {
                Error::device("read")(io::Error::from(io::ErrorKind::UnexpectedEof))
            })
        }
    }

    fn decode(bytes: &[u8]) -> Key {
        read_key(&mut Script::bytes(bytes).then_timeout()).unwrap()
    }

    // ── Plain bytes ─────────────────────────────────────────────────

    #[test]
    fn every_non_escape_byte_is_itself() {
        for b in (0u8..=255).filter(|&b| b != ESC) {
            assert_eq!(decode(&[b]), Key::Byte(b), "byte {b:#04x}");
        }
    }

    #[test]
    fn plain_byte_reads_exactly_one() {
        let mut s = Script::bytes(b"ab");
        assert_eq!(read_key(&mut s).unwrap(), Key::Byte(b'a'));
        assert_eq!(s.left(), 1);
    }

    #[test]
    fn ctrl_keys() {
        assert_eq!(decode(&[0x11]), Key::ctrl(b'q'));
        assert_eq!(Key::ctrl(b'Q'), Key::ctrl(b'q'));
    }

    // ── CSI letters ─────────────────────────────────────────────────

    #[test]
    fn arrows() {
        assert_eq!(decode(b"\x1b[A"), Key::ArrowUp);
        assert_eq!(decode(b"\x1b[B"), Key::ArrowDown);
        assert_eq!(decode(b"\x1b[C"), Key::ArrowRight);
        assert_eq!(decode(b"\x1b[D"), Key::ArrowLeft);
    }

    #[test]
    fn csi_home_end() {
        assert_eq!(decode(b"\x1b[H"), Key::Home);
        assert_eq!(decode(b"\x1b[F"), Key::End);
    }

    #[test]
    fn csi_unknown_letter_is_escape() {
        assert_eq!(decode(b"\x1b[Z"), Key::Escape);
        assert_eq!(decode(b"\x1b[a"), Key::Escape);
    }

    // ── CSI digit ~ ─────────────────────────────────────────────────

    #[test]
    fn tilde_table() {
        let table = [
            (b'1', Key::Home),
            (b'2', Key::Escape),
            (b'3', Key::Delete),
            (b'4', Key::End),
            (b'5', Key::PageUp),
            (b'6', Key::PageDown),
            (b'7', Key::Home),
            (b'8', Key::End),
        ];
        for (digit, key) in table {
            assert_eq!(decode(&[ESC, b'[', digit, b'~']), key, "digit {}", digit as char);
        }
    }

    #[test]
    fn unmapped_digits_are_escape() {
        assert_eq!(decode(b"\x1b[0~"), Key::Escape);
        assert_eq!(decode(b"\x1b[9~"), Key::Escape);
    }

    #[test]
    fn digit_without_tilde_is_escape() {
        let mut s = Script::bytes(b"\x1b[5Ax");
        assert_eq!(read_key(&mut s).unwrap(), Key::Escape);
        // The fourth byte was consumed with the sequence.
        assert_eq!(read_key(&mut s).unwrap(), Key::Byte(b'x'));
    }

    #[test]
    fn digit_then_timeout_is_escape() {
        assert_eq!(decode(b"\x1b[5"), Key::Escape);
    }

    #[test]
    fn digit_branch_wins_over_letters() {
        // `1` routes to the digit branch; `A` is then not a tilde.
        assert_eq!(decode(b"\x1b[1A"), Key::Escape);
    }

    // ── SS3 ─────────────────────────────────────────────────────────

    #[test]
    fn ss3_home_end() {
        assert_eq!(decode(b"\x1bOH"), Key::Home);
        assert_eq!(decode(b"\x1bOF"), Key::End);
    }

    #[test]
    fn ss3_unknown_is_escape() {
        assert_eq!(decode(b"\x1bOP"), Key::Escape);
        assert_eq!(decode(b"\x1bOA"), Key::Escape);
    }

    // ── Bare and incomplete escapes ─────────────────────────────────

    #[test]
    fn lone_escape() {
        let mut s = Script::bytes(b"\x1b").then_timeout();
        assert_eq!(read_key(&mut s).unwrap(), Key::Escape);
        assert_eq!(s.left(), 0);
    }

    #[test]
    fn escape_bracket_then_timeout() {
        assert_eq!(decode(b"\x1b["), Key::Escape);
    }

    #[test]
    fn escape_unknown_introducer_swallows_two_bytes() {
        let mut s = Script::bytes(b"\x1bxyz");
        assert_eq!(read_key(&mut s).unwrap(), Key::Escape);
        assert_eq!(read_key(&mut s).unwrap(), Key::Byte(b'z'));
    }

    #[test]
    fn escape_unknown_introducer_then_timeout() {
        assert_eq!(decode(b"\x1bx"), Key::Escape);
    }

    #[test]
    fn escape_escape_is_escape() {
        // ESC ESC x: the second ESC is an unknown introducer.
        let mut s = Script::bytes(b"\x1b\x1bxq");
        assert_eq!(read_key(&mut s).unwrap(), Key::Escape);
        assert_eq!(read_key(&mut s).unwrap(), Key::Byte(b'q'));
    }

    // ── Blocking and polling ────────────────────────────────────────

    #[test]
    fn read_key_waits_out_leading_timeouts() {
        let mut s = Script(VecDeque::from([None, None, Some(b'j')]));
        assert_eq!(read_key(&mut s).unwrap(), Key::Byte(b'j'));
    }

    #[test]
    fn poll_key_returns_none_on_timeout() {
        let mut s = Script(VecDeque::from([None, Some(b'j')]));
        assert_eq!(poll_key(&mut s).unwrap(), None);
        assert_eq!(poll_key(&mut s).unwrap(), Some(Key::Byte(b'j')));
    }

    #[test]
    fn read_errors_propagate() {
        let mut s = Script::bytes(b"");
        assert!(matches!(read_key(&mut s), Err(Error::Device { .. })));
    }

    #[test]
    fn read_error_mid_sequence_propagates() {
        let mut s = Script::bytes(b"\x1b[");
        assert!(read_key(&mut s).is_err());
    }

    // ── Key stream ──────────────────────────────────────────────────

    #[test]
    fn keys_stream_in_order() {
        let script = Script::bytes(b"a\x1b[B\x1b[6~q");
        let got: Vec<Key> = keys(script).take(4).map(Result::unwrap).collect();
        assert_eq!(
            got,
            [Key::Byte(b'a'), Key::ArrowDown, Key::PageDown, Key::Byte(b'q')]
        );
    }

    #[test]
    fn keys_stream_surfaces_errors() {
        let mut stream = keys(Script::bytes(b"a"));
        assert_eq!(stream.next().unwrap().unwrap(), Key::Byte(b'a'));
        assert!(stream.next().unwrap().is_err());
    }

    #[test]
    fn keys_over_borrowed_source() {
        let mut script = Script::bytes(b"xy");
        let first = keys(&mut script).next().unwrap().unwrap();
        assert_eq!(first, Key::Byte(b'x'));
        assert_eq!(script.left(), 1);
    }
}
