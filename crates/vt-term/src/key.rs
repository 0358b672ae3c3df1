// SPDX-License-Identifier: MIT
//
// Key event model.
//
// The closed vocabulary of logical keys the decoder can produce, plus the
// two byte classification tables it is driven by: what a byte means when
// no sequence is in progress, and what a final byte means after `ESC [`
// or `ESC O`. Keeping the tables here leaves `input.rs` with nothing but
// state transitions.

use std::fmt;

// ─── LogicalKey ─────────────────────────────────────────────────────────────

/// A decoded key.
///
/// [`None`](LogicalKey::None) is a real value, not an absence marker: it is
/// what the decoder returns for every byte that does not complete a key
/// (the first bytes of an escape sequence, printable pass-through, noise).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LogicalKey {
    #[default]
    None,
    Enter,
    Tab,
    Escape,
    Backspace,
    // ── Arrows ──────────────────────────────────────────────────
    Up,
    Down,
    Right,
    Left,
    // ── Function keys ───────────────────────────────────────────
    F1,
    F2,
    F3,
    F4,
    // ── Navigation / editing ────────────────────────────────────
    Home,
    End,
    CtrlC,
    Insert,
    Delete,
    PageUp,
    PageDown,
}

impl LogicalKey {
    /// Every variant, in declaration order.
    pub const ALL: [Self; 20] = [
        Self::None,
        Self::Enter,
        Self::Tab,
        Self::Escape,
        Self::Backspace,
        Self::Up,
        Self::Down,
        Self::Right,
        Self::Left,
        Self::F1,
        Self::F2,
        Self::F3,
        Self::F4,
        Self::Home,
        Self::End,
        Self::CtrlC,
        Self::Insert,
        Self::Delete,
        Self::PageUp,
        Self::PageDown,
    ];

    /// Whether this is the "no key" value.
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }

    /// Stable display label.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Enter => "Enter",
            Self::Tab => "Tab",
            Self::Escape => "Escape",
            Self::Backspace => "Backspace",
            Self::Up => "Up",
            Self::Down => "Down",
            Self::Right => "Right",
            Self::Left => "Left",
            Self::F1 => "F1",
            Self::F2 => "F2",
            Self::F3 => "F3",
            Self::F4 => "F4",
            Self::Home => "Home",
            Self::End => "End",
            Self::CtrlC => "Ctrl+C",
            Self::Insert => "Insert",
            Self::Delete => "Delete",
            Self::PageUp => "PageUp",
            Self::PageDown => "PageDown",
        }
    }
}

impl fmt::Display for LogicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `pad` so status-line columns can use width specifiers.
        f.pad(self.name())
    }
}

// ─── Byte Classification ────────────────────────────────────────────────────

/// Escape (0x1B): starts every multi-byte sequence.
pub const ESC: u8 = 0x1B;
/// Tilde (0x7E): terminates the `ESC [ n ~` editing-key sequences.
pub const TILDE: u8 = 0x7E;

/// Meaning of a byte received while no sequence is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteClass {
    /// `ESC` — a sequence may follow.
    Escape,
    /// A single-byte key (Ctrl-C, Tab, Enter, Backspace).
    Key(LogicalKey),
    /// Printable ASCII (0x20–0x7E). Not a key event.
    Printable(u8),
    /// Any other byte. Not a key event.
    NonPrintable(u8),
}

/// Classify a byte received in the idle state.
#[must_use]
pub const fn classify(byte: u8) -> ByteClass {
    match byte {
        ESC => ByteClass::Escape,
        0x03 => ByteClass::Key(LogicalKey::CtrlC),
        0x09 => ByteClass::Key(LogicalKey::Tab),
        0x0D => ByteClass::Key(LogicalKey::Enter),
        0x7F => ByteClass::Key(LogicalKey::Backspace),
        0x20..=0x7E => ByteClass::Printable(byte),
        _ => ByteClass::NonPrintable(byte),
    }
}

/// Meaning of the byte that follows `ESC [` or `ESC O`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceFinal {
    /// The sequence is complete: emit this key.
    Immediate(LogicalKey),
    /// This key is tentative until a `~` arrives.
    AwaitTilde(LogicalKey),
}

/// Classify the byte after a CSI (`ESC [`) or SS3 (`ESC O`) introducer.
///
/// Both introducers share one table. Returns `None` for bytes that name
/// no key we know.
#[must_use]
pub const fn classify_final(byte: u8) -> Option<SequenceFinal> {
    let fin = match byte {
        b'A' => SequenceFinal::Immediate(LogicalKey::Up),
        b'B' => SequenceFinal::Immediate(LogicalKey::Down),
        b'C' => SequenceFinal::Immediate(LogicalKey::Right),
        b'D' => SequenceFinal::Immediate(LogicalKey::Left),
        b'P' => SequenceFinal::Immediate(LogicalKey::F1),
        b'Q' => SequenceFinal::Immediate(LogicalKey::F2),
        b'R' => SequenceFinal::Immediate(LogicalKey::F3),
        b'S' => SequenceFinal::Immediate(LogicalKey::F4),
        b'H' => SequenceFinal::Immediate(LogicalKey::Home),
        b'F' => SequenceFinal::Immediate(LogicalKey::End),
        b'2' => SequenceFinal::AwaitTilde(LogicalKey::Insert),
        b'3' => SequenceFinal::AwaitTilde(LogicalKey::Delete),
        b'5' => SequenceFinal::AwaitTilde(LogicalKey::PageUp),
        b'6' => SequenceFinal::AwaitTilde(LogicalKey::PageDown),
        _ => return None,
    };
    Some(fin)
}

// ─── Tests ──────────────────────────────────────────────────────────────────
