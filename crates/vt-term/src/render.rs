// SPDX-License-Identifier: MIT
//
// Screen renderer — cursor addressing, styling and line-art primitives.
//
// The renderer owns two styles. The *default* style is the session's
// baseline (bold white on blue for the dashboard). The *pending* style is a
// one-shot overlay: set it, call one primitive, and it's gone. Every
// primitive follows the same shape:
//
//   take pending → emit its SGR codes → draw → reset to default
//
// so once a primitive returns the terminal is back in the default style and
// nothing is pending, whatever the caller set beforehand. The pending style
// is taken out before the first byte is written, which keeps that true even
// if the sink fails halfway through.
//
// Rendering is open-loop. Nothing is read back from the terminal, nothing is
// cached between calls, and identical calls produce identical bytes.
// Boxes and dividers position the cursor once per glyph. That's
// O(perimeter) escape sequences, which is fine for a static layout that is
// drawn once.

use std::fmt;
use std::io::{self, Write};

use crate::ansi::{self, ClearMode};
use crate::style::{Color, Format, Style};

// ─── Geometry ───────────────────────────────────────────────────────────────

/// A terminal cell, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
    pub row: u16,
    pub col: u16,
}

impl Pos {
    #[inline]
    #[must_use]
    pub const fn new(row: u16, col: u16) -> Self {
        Self { row, col }
    }
}

/// A rectangle of cells, corners inclusive.
///
/// Boxes and dividers expect `row1 <= row2` and `col1 <= col2`. That isn't
/// checked: a flipped rect just draws its corners with no edges between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub row1: u16,
    pub col1: u16,
    pub row2: u16,
    pub col2: u16,
}

impl Rect {
    #[inline]
    #[must_use]
    pub const fn new(row1: u16, col1: u16, row2: u16, col2: u16) -> Self {
        Self {
            row1,
            col1,
            row2,
            col2,
        }
    }

    /// A single-cell rect at `pos`.
    #[inline]
    #[must_use]
    pub const fn at(pos: Pos) -> Self {
        Self::new(pos.row, pos.col, pos.row, pos.col)
    }

    /// Top-left corner.
    #[inline]
    #[must_use]
    pub const fn anchor(self) -> Pos {
        Pos::new(self.row1, self.col1)
    }

    /// Rows covered, corners included.
    #[must_use]
    pub const fn height(self) -> u16 {
        (self.row2.saturating_sub(self.row1)).saturating_add(1)
    }

    /// Columns covered, corners included.
    #[must_use]
    pub const fn width(self) -> u16 {
        (self.col2.saturating_sub(self.col1)).saturating_add(1)
    }

    /// Rows strictly between `row1` and `row2`.
    fn inner_rows(self) -> std::ops::Range<u16> {
        self.row1.saturating_add(1)..self.row2
    }

    /// Columns strictly between `col1` and `col2`.
    fn inner_cols(self) -> std::ops::Range<u16> {
        self.col1.saturating_add(1)..self.col2
    }
}

/// Which way a divider runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Along `row1`, from `col1` to `col2`.
    Horizontal,
    /// Down `col1`, from `row1` to `row2`.
    Vertical,
}

// ─── Glyphs ─────────────────────────────────────────────────────────────────

/// Box-drawing glyphs used by [`Renderer::draw_box`] and
/// [`Renderer::draw_divider`].
pub mod glyph {
    pub const TOP_LEFT: &str = "┌";
    pub const TOP_RIGHT: &str = "┐";
    pub const BOTTOM_LEFT: &str = "└";
    pub const BOTTOM_RIGHT: &str = "┘";
    pub const HORIZONTAL: &str = "─";
    pub const VERTICAL: &str = "│";
    pub const TEE_LEFT: &str = "├";
    pub const TEE_RIGHT: &str = "┤";
    pub const TEE_TOP: &str = "┬";
    pub const TEE_BOTTOM: &str = "┴";
}

// ─── Session Bytes ──────────────────────────────────────────────────────────

/// What [`Renderer::end_session`] writes: attributes off, terminal default
/// colors, cursor shown, screen homed and cleared.
///
/// Kept as one constant so the panic hook can replay it with a single raw
/// `write()` without going through a `Renderer`.
pub const END_SESSION: &[u8] = b"\x1b[0m\x1b[39m\x1b[49m\x1b[?25h\x1b[1;1H\x1b[2J";

// ─── Renderer ───────────────────────────────────────────────────────────────

/// Write-only screen renderer over any byte sink.
///
/// # Example
///
/// ```
/// use vt_term::render::{Pos, Rect, Renderer};
/// use vt_term::style::{Color, Format, Style};
///
/// let mut r = Renderer::new(Vec::new());
/// r.draw_box(Rect::new(1, 1, 3, 10))?;
/// r.set_pending(Style::UNSET.with_fg(Color::Red).with_format(Format::Blinking));
/// r.print_text(Pos::new(2, 3), "ALERT")?;
/// assert!(r.pending_style().is_unset());
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Renderer<W: Write> {
    out: W,
    default_style: Style,
    pending: Style,
}

impl<W: Write> Renderer<W> {
    /// Renderer with the dashboard's default style.
    #[must_use]
    pub const fn new(out: W) -> Self {
        Self::with_default_style(out, Style::dashboard_default())
    }

    #[must_use]
    pub const fn with_default_style(out: W, default_style: Style) -> Self {
        Self {
            out,
            default_style,
            pending: Style::UNSET,
        }
    }

    // ── Accessors ───────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub const fn default_style(&self) -> Style {
        self.default_style
    }

    #[inline]
    #[must_use]
    pub const fn pending_style(&self) -> Style {
        self.pending
    }

    /// Style the next primitive call only.
    pub fn set_pending(&mut self, style: Style) -> &mut Self {
        self.pending = style;
        self
    }

    /// Edit the pending style in place.
    pub fn pending_mut(&mut self) -> &mut Style {
        &mut self.pending
    }

    pub const fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Flush the sink.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    // ── Style ───────────────────────────────────────────────────────

    /// Emit every set slot of the pending style (foreground, background,
    /// format, in that order) and clear it.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer. The pending style is
    /// cleared regardless.
    pub fn apply_pending_style(&mut self) -> io::Result<()> {
        let pending = std::mem::take(&mut self.pending);
        self.emit_style(pending)
    }

    /// Turn every attribute off, then re-apply the default style's format,
    /// background and foreground, in that order.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn restore_default_style(&mut self) -> io::Result<()> {
        ansi::format(&mut self.out, Format::ModesOff)?;
        let Style { fg, bg, format } = self.default_style;
        if let Some(format) = format {
            ansi::format(&mut self.out, format)?;
        }
        if let Some(bg) = bg {
            ansi::bg(&mut self.out, bg)?;
        }
        if let Some(fg) = fg {
            ansi::fg(&mut self.out, fg)?;
        }
        Ok(())
    }

    fn emit_style(&mut self, style: Style) -> io::Result<()> {
        if let Some(fg) = style.fg {
            ansi::fg(&mut self.out, fg)?;
        }
        if let Some(bg) = style.bg {
            ansi::bg(&mut self.out, bg)?;
        }
        if let Some(format) = style.format {
            ansi::format(&mut self.out, format)?;
        }
        Ok(())
    }

    // ── Cursor & screen ─────────────────────────────────────────────

    /// Move the cursor. Coordinates are sent unchecked.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn position_cursor(&mut self, pos: Pos) -> io::Result<()> {
        ansi::cursor_to(&mut self.out, pos.row, pos.col)
    }

    /// Show or hide the cursor.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn set_cursor_visible(&mut self, visible: bool) -> io::Result<()> {
        if visible {
            ansi::cursor_show(&mut self.out)
        } else {
            ansi::cursor_hide(&mut self.out)
        }
    }

    /// Erase part of the screen.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn clear(&mut self, mode: ClearMode) -> io::Result<()> {
        ansi::clear(&mut self.out, mode)
    }

    /// Ring the bell.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn beep(&mut self) -> io::Result<()> {
        ansi::beep(&mut self.out)
    }

    // ── Text ────────────────────────────────────────────────────────

    /// Write `text` at `pos` in the pending style, then restore the default.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn print_text(&mut self, pos: Pos, text: &str) -> io::Result<()> {
        self.print_with(pos, |out| out.write_all(text.as_bytes()))
    }

    /// Like [`print_text`](Self::print_text), formatting in place.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn print_fmt(&mut self, pos: Pos, args: fmt::Arguments<'_>) -> io::Result<()> {
        self.print_with(pos, |out| out.write_fmt(args))
    }

    fn print_with<F>(&mut self, pos: Pos, body: F) -> io::Result<()>
    where
        F: FnOnce(&mut W) -> io::Result<()>,
    {
        let pending = std::mem::take(&mut self.pending);
        self.position_cursor(pos)?;
        self.emit_style(pending)?;
        body(&mut self.out)?;
        self.restore_default_style()
    }

    // ── Line art ────────────────────────────────────────────────────

    /// Draw a box outline around `rect`: four corners, then the left and
    /// right edges, then the top and bottom edges.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn draw_box(&mut self, rect: Rect) -> io::Result<()> {
        self.apply_pending_style()?;

        self.glyph_at(rect.row1, rect.col1, glyph::TOP_LEFT)?;
        self.glyph_at(rect.row1, rect.col2, glyph::TOP_RIGHT)?;
        self.glyph_at(rect.row2, rect.col1, glyph::BOTTOM_LEFT)?;
        self.glyph_at(rect.row2, rect.col2, glyph::BOTTOM_RIGHT)?;

        for col in [rect.col1, rect.col2] {
            for row in rect.inner_rows() {
                self.glyph_at(row, col, glyph::VERTICAL)?;
            }
        }
        for row in [rect.row1, rect.row2] {
            for col in rect.inner_cols() {
                self.glyph_at(row, col, glyph::HORIZONTAL)?;
            }
        }

        self.restore_default_style()
    }

    /// Draw a divider line, optionally capped with tees where it meets a
    /// box border.
    ///
    /// A horizontal divider runs along `row1` from `col1` to `col2`; a
    /// vertical one runs down `col1` from `row1` to `row2`. The end cells
    /// get tee glyphs when `end_caps` is set and are left alone otherwise.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn draw_divider(
        &mut self,
        rect: Rect,
        orientation: Orientation,
        end_caps: bool,
    ) -> io::Result<()> {
        self.apply_pending_style()?;

        match orientation {
            Orientation::Horizontal => {
                if end_caps {
                    self.glyph_at(rect.row1, rect.col1, glyph::TEE_LEFT)?;
                    self.glyph_at(rect.row1, rect.col2, glyph::TEE_RIGHT)?;
                }
                for col in rect.inner_cols() {
                    self.glyph_at(rect.row1, col, glyph::HORIZONTAL)?;
                }
            }
            Orientation::Vertical => {
                if end_caps {
                    self.glyph_at(rect.row1, rect.col1, glyph::TEE_TOP)?;
                    self.glyph_at(rect.row2, rect.col1, glyph::TEE_BOTTOM)?;
                }
                for row in rect.inner_rows() {
                    self.glyph_at(row, rect.col1, glyph::VERTICAL)?;
                }
            }
        }

        self.restore_default_style()
    }

    fn glyph_at(&mut self, row: u16, col: u16, glyph: &str) -> io::Result<()> {
        ansi::cursor_to(&mut self.out, row, col)?;
        self.out.write_all(glyph.as_bytes())
    }

    // ── Session ─────────────────────────────────────────────────────

    /// Enter the dashboard look: default style, hidden cursor, blank screen.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn begin_session(&mut self) -> io::Result<()> {
        self.pending = Style::UNSET;
        self.restore_default_style()?;
        self.set_cursor_visible(false)?;
        self.clear(ClearMode::All)
    }

    /// Hand the terminal back: attributes and colors to terminal defaults,
    /// cursor shown, blank screen. Writes exactly [`END_SESSION`].
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn end_session(&mut self) -> io::Result<()> {
        self.pending = Style::UNSET;
        ansi::format(&mut self.out, Format::ModesOff)?;
        ansi::fg(&mut self.out, Color::Default)?;
        ansi::bg(&mut self.out, Color::Default)?;
        self.set_cursor_visible(true)?;
        self.clear(ClearMode::All)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
