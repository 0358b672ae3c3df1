// SPDX-License-Identifier: MIT
//
// Style model — colors, text formats, and the three-slot style context.
//
// The dashboard only speaks the eight classic ANSI colors plus "terminal
// default", and one text format at a time. That keeps every SGR sequence
// a single number: foreground 30–39, background the same plus 10, and a
// format code from the small table on `Format`.
//
// A `Style` is three optional slots. `None` means "leave this alone": a
// pending style with only `fg` set recolors text without touching the
// background or format.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

// ─── Color ──────────────────────────────────────────────────────────────────

/// One of the eight standard ANSI colors, or the terminal's own default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    /// Whatever the terminal was configured with (SGR 39 / 49).
    Default,
}

impl Color {
    /// Every color, in SGR order.
    pub const ALL: [Self; 9] = [
        Self::Black,
        Self::Red,
        Self::Green,
        Self::Yellow,
        Self::Blue,
        Self::Magenta,
        Self::Cyan,
        Self::White,
        Self::Default,
    ];

    /// SGR code for this color as a foreground (30–37, 39).
    #[must_use]
    pub const fn fg_code(self) -> u8 {
        match self {
            Self::Black => 30,
            Self::Red => 31,
            Self::Green => 32,
            Self::Yellow => 33,
            Self::Blue => 34,
            Self::Magenta => 35,
            Self::Cyan => 36,
            Self::White => 37,
            Self::Default => 39,
        }
    }

    /// SGR code for this color as a background (40–47, 49).
    #[inline]
    #[must_use]
    pub const fn bg_code(self) -> u8 {
        self.fg_code() + 10
    }

    /// Lowercase name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::Red => "red",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Blue => "blue",
            Self::Magenta => "magenta",
            Self::Cyan => "cyan",
            Self::White => "white",
            Self::Default => "default",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Color {
    type Err = ParseStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseStyleError::Color(s.to_owned()))
    }
}

// ─── Format ─────────────────────────────────────────────────────────────────

/// A text format (SGR attribute).
///
/// Each variant has a table number ([`raw`](Self::raw)) that runs one
/// above the SGR parameter actually sent:
/// `raw() - 1 == sgr()`. `ModesOff` therefore goes out as SGR 0, the full
/// attribute reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    ModesOff,
    Bold,
    LowIntensity,
    Underline,
    Blinking,
    Reverse,
    Invisible,
}

impl Format {
    pub const ALL: [Self; 7] = [
        Self::ModesOff,
        Self::Bold,
        Self::LowIntensity,
        Self::Underline,
        Self::Blinking,
        Self::Reverse,
        Self::Invisible,
    ];

    /// Table value (1, 2, 3, 5, 6, 8, 9).
    #[must_use]
    pub const fn raw(self) -> u8 {
        match self {
            Self::ModesOff => 1,
            Self::Bold => 2,
            Self::LowIntensity => 3,
            Self::Underline => 5,
            Self::Blinking => 6,
            Self::Reverse => 8,
            Self::Invisible => 9,
        }
    }

    /// SGR parameter sent to the terminal.
    #[inline]
    #[must_use]
    pub const fn sgr(self) -> u8 {
        self.raw() - 1
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ModesOff => "off",
            Self::Bold => "bold",
            Self::LowIntensity => "dim",
            Self::Underline => "underline",
            Self::Blinking => "blink",
            Self::Reverse => "reverse",
            Self::Invisible => "invisible",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = ParseStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseStyleError::Format(s.to_owned()))
    }
}

/// A color or format name that doesn't exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseStyleError {
    #[error("unknown color {0:?} (expected one of black, red, green, yellow, blue, magenta, cyan, white, default)")]
    Color(String),
    #[error("unknown format {0:?} (expected one of off, bold, dim, underline, blink, reverse, invisible)")]
    Format(String),
}

// ─── Style ──────────────────────────────────────────────────────────────────

/// Foreground, background and format, each optionally set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub format: Option<Format>,
}

impl Style {
    /// All slots unset.
    pub const UNSET: Self = Self {
        fg: None,
        bg: None,
        format: None,
    };

    /// Bold white on blue — the dashboard's baseline look.
    #[must_use]
    pub const fn dashboard_default() -> Self {
        Self {
            fg: Some(Color::White),
            bg: Some(Color::Blue),
            format: Some(Format::Bold),
        }
    }

    #[must_use]
    pub const fn with_fg(self, fg: Color) -> Self {
        Self {
            fg: Some(fg),
            ..self
        }
    }

    #[must_use]
    pub const fn with_bg(self, bg: Color) -> Self {
        Self {
            bg: Some(bg),
            ..self
        }
    }

    #[must_use]
    pub const fn with_format(self, format: Format) -> Self {
        Self {
            format: Some(format),
            ..self
        }
    }

    /// Whether no slot is set.
    #[must_use]
    pub const fn is_unset(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && self.format.is_none()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Color codes ─────────────────────────────────────────────────────

    #[test]
    fn fg_codes_cover_30_to_39() {
        let codes: Vec<u8> = Color::ALL.iter().map(|c| c.fg_code()).collect();
        assert_eq!(codes, vec![30, 31, 32, 33, 34, 35, 36, 37, 39]);
    }

    #[test]
    fn bg_is_fg_plus_ten() {
        for c in Color::ALL {
            assert_eq!(c.bg_code(), c.fg_code() + 10, "{c}");
        }
    }

    #[test]
    fn color_parse_case_insensitive() {
        assert_eq!("Red".parse::<Color>(), Ok(Color::Red));
        assert_eq!("WHITE".parse::<Color>(), Ok(Color::White));
        assert_eq!("default".parse::<Color>(), Ok(Color::Default));
    }

    #[test]
    fn color_parse_unknown() {
        let err = "mauve".parse::<Color>().unwrap_err();
        assert_eq!(err, ParseStyleError::Color("mauve".into()));
        assert!(err.to_string().contains("mauve"));
    }

    #[test]
    fn color_name_round_trips() {
        for c in Color::ALL {
            assert_eq!(c.to_string().parse::<Color>(), Ok(c));
        }
    }

    // ── Format codes ────────────────────────────────────────────────────

    #[test]
    fn modes_off_is_sgr_reset() {
        assert_eq!(Format::ModesOff.raw(), 1);
        assert_eq!(Format::ModesOff.sgr(), 0);
    }

    #[test]
    fn format_sgr_codes_are_standard() {
        assert_eq!(Format::Bold.sgr(), 1);
        assert_eq!(Format::LowIntensity.sgr(), 2);
        assert_eq!(Format::Underline.sgr(), 4);
        assert_eq!(Format::Blinking.sgr(), 5);
        assert_eq!(Format::Reverse.sgr(), 7);
        assert_eq!(Format::Invisible.sgr(), 8);
    }

    #[test]
    fn format_parse() {
        assert_eq!("blink".parse::<Format>(), Ok(Format::Blinking));
        assert_eq!("Bold".parse::<Format>(), Ok(Format::Bold));
        assert!("italic".parse::<Format>().is_err());
    }

    // ── Style ───────────────────────────────────────────────────────────

    #[test]
    fn default_style_is_unset() {
        assert!(Style::default().is_unset());
        assert_eq!(Style::default(), Style::UNSET);
    }

    #[test]
    fn builders_set_one_slot_each() {
        let s = Style::UNSET.with_fg(Color::Red);
        assert_eq!(s.fg, Some(Color::Red));
        assert_eq!(s.bg, None);
        assert_eq!(s.format, None);
        assert!(!s.is_unset());

        let s = s.with_format(Format::Blinking).with_bg(Color::Black);
        assert_eq!(s.fg, Some(Color::Red));
        assert_eq!(s.bg, Some(Color::Black));
        assert_eq!(s.format, Some(Format::Blinking));
    }

    #[test]
    fn dashboard_default_is_bold_white_on_blue() {
        let s = Style::dashboard_default();
        assert_eq!(s.fg, Some(Color::White));
        assert_eq!(s.bg, Some(Color::Blue));
        assert_eq!(s.format, Some(Format::Bold));
    }
}
