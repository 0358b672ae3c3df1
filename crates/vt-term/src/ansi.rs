// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. No state,
// no decisions about when to emit — that's the `Renderer`'s job. This module
// just knows the byte-level encoding of every terminal command we need.
//
// Cursor positions are 1-based `(row, col)` throughout, exactly as the
// terminal expects them. Nothing is range-checked: out-of-range values go
// to the terminal as-is and the terminal decides what they mean.
//
// All functions return `io::Result` propagated from the underlying writer.

use std::io::{self, Write};

use crate::style::{Color, Format};

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to `(row, col)` using the CUP (Cursor Position) sequence.
#[inline]
pub fn cursor_to(w: &mut impl Write, row: u16, col: u16) -> io::Result<()> {
    write!(w, "\x1b[{row};{col}H")
}

/// Hide the cursor (DECTCEM reset).
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// Show the cursor (DECTCEM set).
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

// ─── Clearing ────────────────────────────────────────────────────────────────

/// What to erase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearMode {
    /// From the cursor to the end of the line (EL 0).
    LineAfterCursor,
    /// From the start of the line to the cursor (EL 1).
    LineToCursor,
    /// The whole current line (EL 2).
    Line,
    /// The whole screen, cursor stays put (ED 2).
    Screen,
    /// Home the cursor, then erase the whole screen.
    All,
}

/// Erase part of the screen.
pub fn clear(w: &mut impl Write, mode: ClearMode) -> io::Result<()> {
    match mode {
        ClearMode::LineAfterCursor => w.write_all(b"\x1b[K"),
        ClearMode::LineToCursor => w.write_all(b"\x1b[1K"),
        ClearMode::Line => w.write_all(b"\x1b[2K"),
        ClearMode::Screen => w.write_all(b"\x1b[2J"),
        ClearMode::All => w.write_all(b"\x1b[1;1H\x1b[2J"),
    }
}

// ─── SGR ─────────────────────────────────────────────────────────────────────

/// Emit a single-parameter SGR sequence: `ESC [ <code> m`.
#[inline]
pub fn sgr(w: &mut impl Write, code: u8) -> io::Result<()> {
    write!(w, "\x1b[{code}m")
}

/// Set the foreground (text) color.
#[inline]
pub fn fg(w: &mut impl Write, color: Color) -> io::Result<()> {
    sgr(w, color.fg_code())
}

/// Set the background color.
#[inline]
pub fn bg(w: &mut impl Write, color: Color) -> io::Result<()> {
    sgr(w, color.bg_code())
}

/// Apply a text format. [`Format::ModesOff`] resets every attribute and
/// color (SGR 0).
#[inline]
pub fn format(w: &mut impl Write, format: Format) -> io::Result<()> {
    sgr(w, format.sgr())
}

// ─── Bell ────────────────────────────────────────────────────────────────────

/// Ring the terminal bell (BEL).
#[inline]
pub fn beep(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x07")
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Helper: run an ANSI function and return its output as a string.
    fn emit<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    // ── Cursor ──────────────────────────────────────────────────────────

    #[test]
    fn cursor_to_origin() {
        assert_eq!(emit(|w| cursor_to(w, 1, 1)), "\x1b[1;1H");
    }

    #[test]
    fn cursor_to_is_row_then_col() {
        assert_eq!(emit(|w| cursor_to(w, 7, 27)), "\x1b[7;27H");
    }

    #[test]
    fn cursor_to_passes_zero_through() {
        // No clamping: the terminal treats 0 as 1.
        assert_eq!(emit(|w| cursor_to(w, 0, 0)), "\x1b[0;0H");
    }

    #[test]
    fn cursor_to_max() {
        let s = emit(|w| cursor_to(w, u16::MAX, u16::MAX));
        assert_eq!(s, "\x1b[65535;65535H");
    }

    #[test]
    fn cursor_hide_sequence() {
        assert_eq!(emit(|w| cursor_hide(w)), "\x1b[?25l");
    }

    #[test]
    fn cursor_show_sequence() {
        assert_eq!(emit(|w| cursor_show(w)), "\x1b[?25h");
    }

    // ── Clear ───────────────────────────────────────────────────────────

    #[test]
    fn clear_modes() {
        assert_eq!(emit(|w| clear(w, ClearMode::LineAfterCursor)), "\x1b[K");
        assert_eq!(emit(|w| clear(w, ClearMode::LineToCursor)), "\x1b[1K");
        assert_eq!(emit(|w| clear(w, ClearMode::Line)), "\x1b[2K");
        assert_eq!(emit(|w| clear(w, ClearMode::Screen)), "\x1b[2J");
    }

    #[test]
    fn clear_all_homes_first() {
        assert_eq!(emit(|w| clear(w, ClearMode::All)), "\x1b[1;1H\x1b[2J");
    }

    // ── SGR ─────────────────────────────────────────────────────────────

    #[test]
    fn fg_red() {
        assert_eq!(emit(|w| fg(w, Color::Red)), "\x1b[31m");
    }

    #[test]
    fn fg_black_is_emitted() {
        assert_eq!(emit(|w| fg(w, Color::Black)), "\x1b[30m");
    }

    #[test]
    fn fg_default() {
        assert_eq!(emit(|w| fg(w, Color::Default)), "\x1b[39m");
    }

    #[test]
    fn bg_blue() {
        assert_eq!(emit(|w| bg(w, Color::Blue)), "\x1b[44m");
    }

    #[test]
    fn bg_default() {
        assert_eq!(emit(|w| bg(w, Color::Default)), "\x1b[49m");
    }

    #[test]
    fn format_modes_off_is_reset() {
        assert_eq!(emit(|w| format(w, Format::ModesOff)), "\x1b[0m");
    }

    #[test]
    fn format_bold_and_blink() {
        assert_eq!(emit(|w| format(w, Format::Bold)), "\x1b[1m");
        assert_eq!(emit(|w| format(w, Format::Blinking)), "\x1b[5m");
    }

    #[test]
    fn multiple_sequences_compose() {
        let s = emit(|w| {
            cursor_to(w, 2, 3)?;
            fg(w, Color::Green)?;
            w.write_all(b"ok")
        });
        assert_eq!(s, "\x1b[2;3H\x1b[32mok");
    }

    // ── Bell ────────────────────────────────────────────────────────────

    #[test]
    fn beep_is_bel() {
        assert_eq!(emit(|w| beep(w)), "\x07");
    }
}
