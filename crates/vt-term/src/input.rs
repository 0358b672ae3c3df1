// SPDX-License-Identifier: MIT
//
// Terminal input decoder.
//
// Turns raw stdin bytes into logical keys, one byte at a time:
//
// - Single-byte keys (Ctrl-C, Tab, Enter, Backspace)
// - Double ESC (a real Escape keypress)
// - CSI `ESC [` and SS3 `ESC O` sequences for arrows, F1–F4, Home/End
// - Tilde-terminated editing keys (`ESC [ 2 ~` Insert … `ESC [ 6 ~` PgDn)
//
// # Design
//
// The decoder is a five-state machine with no byte buffer. The only thing
// carried between calls is the key named by a `2`/`3`/`5`/`6` final byte
// while it waits for its `~`, and that lives inside the state itself.
// Memory is constant no matter what arrives.
//
// Every (state, byte) pair has a transition. Bytes that don't fit drop the
// decoder back to `Idle` and come out as a [`Diagnostic`] next to a
// `LogicalKey::None`, so garbage can never wedge or desynchronize it.

use thiserror::Error;

use crate::key::{self, ByteClass, LogicalKey, SequenceFinal};

// ─── State ──────────────────────────────────────────────────────────────────

/// Where the decoder is inside an escape sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecoderState {
    /// No sequence in progress.
    #[default]
    Idle,
    /// Saw `ESC`.
    EscapeSeen,
    /// Saw `ESC [`.
    BracketMode,
    /// Saw `ESC O`.
    LetterOMode,
    /// Saw `ESC [ n` (or `ESC O n`); `pending` fires if `~` comes next.
    AwaitingTilde { pending: LogicalKey },
}

// ─── Diagnostics ────────────────────────────────────────────────────────────

/// Something the decoder noticed but did not turn into a key.
///
/// None of these are fatal. The decoder has already recovered to `Idle`
/// (or stayed there) by the time one is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Diagnostic {
    /// Ordinary printable character, passed through.
    #[error("printable byte {0:#04x} ({c:?})", c = as_char(.0))]
    Printable(u8),
    /// Control byte with no key assigned.
    #[error("unassigned control byte {0:#04x}")]
    NonPrintable(u8),
    /// Byte after `ESC` that starts no known group.
    #[error("unknown escape group {0:#04x}")]
    UnknownGroup(u8),
    /// Final byte after `ESC [` / `ESC O` that names no known key.
    #[error("unknown key {byte:#04x} after ESC {intro}", intro = as_char(.introducer))]
    UnknownKey { introducer: u8, byte: u8 },
    /// `ESC [ n` followed by something other than `~`.
    #[error("expected '~' to finish {pending}, got {byte:#04x}")]
    MalformedTerminator { pending: LogicalKey, byte: u8 },
}

impl Diagnostic {
    /// Whether this reports a broken escape sequence (as opposed to
    /// ordinary pass-through input).
    #[must_use]
    pub const fn is_sequence_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownGroup(_) | Self::UnknownKey { .. } | Self::MalformedTerminator { .. }
        )
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)] // thiserror hands fields over by reference.
const fn as_char(byte: &u8) -> char {
    *byte as char
}

/// Outcome of feeding one byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Decoded {
    /// The key completed by this byte, or `LogicalKey::None`.
    pub key: LogicalKey,
    /// What the decoder noticed, if anything.
    pub diagnostic: Option<Diagnostic>,
}

impl Decoded {
    const fn key(key: LogicalKey) -> Self {
        Self {
            key,
            diagnostic: None,
        }
    }

    const fn nothing() -> Self {
        Self::key(LogicalKey::None)
    }

    const fn noted(diagnostic: Diagnostic) -> Self {
        Self {
            key: LogicalKey::None,
            diagnostic: Some(diagnostic),
        }
    }
}

// ─── Decoder ────────────────────────────────────────────────────────────────

/// Byte-at-a-time VT100 key decoder.
///
/// Feed bytes in the order they were received, with no gaps. Each call
/// yields at most one key.
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    state: DecoderState,
}

impl Decoder {
    /// Create a decoder in the `Idle` state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: DecoderState::Idle,
        }
    }

    /// Current state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> DecoderState {
        self.state
    }

    /// The key waiting for its `~` terminator, if any.
    #[must_use]
    pub const fn pending_key(&self) -> Option<LogicalKey> {
        match self.state {
            DecoderState::AwaitingTilde { pending } => Some(pending),
            _ => None,
        }
    }

    /// Abandon any partial sequence.
    pub fn reset(&mut self) {
        self.state = DecoderState::Idle;
    }

    /// Feed one byte and return the completed key, if any.
    pub fn decode(&mut self, byte: u8) -> LogicalKey {
        self.step(byte).key
    }

    /// Feed one byte and return the completed key along with any
    /// diagnostic.
    pub fn step(&mut self, byte: u8) -> Decoded {
        let (next, out) = transition(self.state, byte);
        self.state = next;

        if let Some(diag) = out.diagnostic {
            match diag {
                Diagnostic::Printable(_) => tracing::trace!(%diag, "input pass-through"),
                _ => tracing::debug!(%diag, "input not decoded"),
            }
        }

        out
    }
}

/// The full transition function: `(state, byte) -> (state, output)`.
///
/// Total over every input. Every escape state returns to `Idle` unless the
/// byte explicitly advances the sequence.
fn transition(state: DecoderState, byte: u8) -> (DecoderState, Decoded) {
    match state {
        DecoderState::Idle => match key::classify(byte) {
            ByteClass::Escape => (DecoderState::EscapeSeen, Decoded::nothing()),
            ByteClass::Key(k) => (DecoderState::Idle, Decoded::key(k)),
            ByteClass::Printable(b) => (DecoderState::Idle, Decoded::noted(Diagnostic::Printable(b))),
            ByteClass::NonPrintable(b) => {
                (DecoderState::Idle, Decoded::noted(Diagnostic::NonPrintable(b)))
            }
        },

        DecoderState::EscapeSeen => match byte {
            key::ESC => (DecoderState::Idle, Decoded::key(LogicalKey::Escape)),
            b'[' => (DecoderState::BracketMode, Decoded::nothing()),
            b'O' => (DecoderState::LetterOMode, Decoded::nothing()),
            _ => (DecoderState::Idle, Decoded::noted(Diagnostic::UnknownGroup(byte))),
        },

        DecoderState::BracketMode => final_byte(b'[', byte),
        DecoderState::LetterOMode => final_byte(b'O', byte),

        DecoderState::AwaitingTilde { pending } => {
            if byte == key::TILDE {
                (DecoderState::Idle, Decoded::key(pending))
            } else {
                (
                    DecoderState::Idle,
                    Decoded::noted(Diagnostic::MalformedTerminator { pending, byte }),
                )
            }
        }
    }
}

/// Handle the byte after `ESC <introducer>`.
fn final_byte(introducer: u8, byte: u8) -> (DecoderState, Decoded) {
    match key::classify_final(byte) {
        Some(SequenceFinal::Immediate(k)) => (DecoderState::Idle, Decoded::key(k)),
        Some(SequenceFinal::AwaitTilde(pending)) => {
            (DecoderState::AwaitingTilde { pending }, Decoded::nothing())
        }
        None => (
            DecoderState::Idle,
            Decoded::noted(Diagnostic::UnknownKey { introducer, byte }),
        ),
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
