// SPDX-License-Identifier: MIT
//
// The battery monitor screen.
//
// Layout (rows × cols, 1-based):
//
//   ┌──────────────────────────────────────────────────────────────────┐  1
//   │ Up Time : hh:mm:ss         BMS      Build on : <version>         │  2
//   ├──────────────────────────────────────────────────────────────────┤  3
//   │┌──────────────────────┐┌───────────────────────────────────────┐ │  4
//   ││ Cell   Raw     Volts ││     Name          Count     Last Time │ │  5
//   │├─────┬────────┬───────┤├────────────────────┬─────────┬────────┤ │  6
//   ││  1  │ 3854   │ 3.854 ││ Monitor XREADY     │         │        │ │  7
//   ││ ... │        │       ││ ...                │         │        │ │
//   │└──────────────────────┘└───────────────────────────────────────┘ │ 22
//   │┌─────────────────────────────────────────────────────────────────┐ 23
//   ││ Key   : <last key>                                              │ 24
//   ││ Input : <last decoder note>                                     │ 25
//   │└─────────────────────────────────────────────────────────────────┘ 26
//   └──────────────────────────────────────────────────────────────────┘ 27
//
// `on_start` draws everything static once. `paint` overwrites the value
// fields in place, each padded to its full width so a shorter value never
// leaves stale characters behind.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use vt_term::event_loop::{Action, App};
use vt_term::input::Diagnostic;
use vt_term::key::LogicalKey;
use vt_term::render::{Orientation, Pos, Rect, Renderer};
use vt_term::style::{Color, Format, Style};
use vt_term::terminal::{self, Size};

use crate::cells::{CellBank, Volts};

// ─── Layout ─────────────────────────────────────────────────────────────────

const OUTER: Rect = Rect::new(1, 1, 27, 71);
const HEADER_RULE: Rect = Rect::new(3, 1, 3, 71);

const CELL_BOX: Rect = Rect::new(4, 2, 22, 24);
const CELL_RULE: Rect = Rect::new(6, 2, 6, 24);
const CELL_COLUMNS: [Rect; 2] = [Rect::new(6, 7, 22, 7), Rect::new(6, 16, 22, 16)];

const ALARM_BOX: Rect = Rect::new(4, 25, 22, 70);
const ALARM_RULE: Rect = Rect::new(6, 25, 6, 70);
const ALARM_COLUMNS: [Rect; 2] = [Rect::new(6, 46, 22, 46), Rect::new(6, 56, 22, 56)];

const STATUS_BOX: Rect = Rect::new(23, 2, 26, 70);

/// Smallest terminal the whole layout fits on.
const SCREEN: Size = Size { cols: 71, rows: 27 };

/// First row of table data.
const FIRST_ROW: u16 = 7;

const UPTIME_AT: Pos = Pos::new(2, 13);
const KEY_AT: Pos = Pos::new(24, 4);
const INPUT_AT: Pos = Pos::new(25, 4);

/// Room for a note on the status line after the `Input : ` label.
const NOTE_WIDTH: usize = 56;

const LABELS: [(Pos, &str); 8] = [
    (Pos::new(2, 27), "BMS"),
    (Pos::new(2, 3), "Up Time :"),
    (Pos::new(5, 3), "Cell"),
    (Pos::new(5, 10), "Raw"),
    (Pos::new(5, 18), "Volts"),
    (Pos::new(5, 31), "Name"),
    (Pos::new(5, 48), "Count"),
    (Pos::new(5, 59), "Last Time"),
];

const ALARMS: [&str; 10] = [
    "Monitor XREADY",
    "Monitor ALERT",
    "Under Voltage",
    "Over Voltage",
    "Load Short Circuit",
    "Load Overcurrent",
    "USER SWITCH",
    "USER DISCHG_TEMP",
    "USER CHG_TEMP",
    "USER CHG_OCD",
];

const ALARM_COL: u16 = 27;

const ALARM_STYLE: Style = Style {
    fg: Some(Color::Red),
    bg: None,
    format: Some(Format::Blinking),
};

// ─── Dashboard ──────────────────────────────────────────────────────────────

/// Battery monitor state and drawing.
pub struct Dashboard {
    cells: CellBank,
    started: Instant,
    uptime: Duration,
    last_key: LogicalKey,
    last_note: Option<Diagnostic>,
    bell: bool,
}

impl Dashboard {
    #[must_use]
    pub fn new(cells: CellBank) -> Self {
        Self {
            cells,
            started: Instant::now(),
            uptime: Duration::ZERO,
            last_key: LogicalKey::None,
            last_note: None,
            bell: false,
        }
    }

    fn draw_background<W: Write>(r: &mut Renderer<W>) -> io::Result<()> {
        r.draw_box(OUTER)?;
        for (pos, text) in LABELS {
            r.print_text(pos, text)?;
        }
        r.print_fmt(
            Pos::new(2, 37),
            format_args!("Build on : {}", env!("CARGO_PKG_VERSION")),
        )?;
        r.draw_divider(HEADER_RULE, Orientation::Horizontal, true)?;

        r.draw_box(CELL_BOX)?;
        r.draw_divider(CELL_RULE, Orientation::Horizontal, true)?;
        for column in CELL_COLUMNS {
            r.draw_divider(column, Orientation::Vertical, true)?;
        }

        r.draw_box(ALARM_BOX)?;
        r.draw_divider(ALARM_RULE, Orientation::Horizontal, true)?;
        for column in ALARM_COLUMNS {
            r.draw_divider(column, Orientation::Vertical, true)?;
        }
        for (row, name) in (FIRST_ROW..).zip(ALARMS) {
            r.set_pending(ALARM_STYLE);
            r.print_text(Pos::new(row, ALARM_COL), name)?;
        }

        r.draw_box(STATUS_BOX)
    }
}

impl App for Dashboard {
    fn on_start<W: Write>(&mut self, renderer: &mut Renderer<W>) -> io::Result<()> {
        let size = terminal::get_size();
        tracing::info!(cells = self.cells.readings().len(), ?size, "drawing dashboard");
        if size.is_some_and(|size| !fits(size)) {
            tracing::warn!(?size, needed = ?SCREEN, "terminal too small, layout will wrap");
        }
        Self::draw_background(renderer)
    }

    fn on_key(&mut self, key: LogicalKey) -> Action {
        self.last_key = key;
        if key == LogicalKey::CtrlC {
            Action::Quit
        } else {
            Action::Continue
        }
    }

    fn on_diagnostic(&mut self, diagnostic: &Diagnostic) {
        self.last_note = Some(*diagnostic);
        if diagnostic.is_sequence_error() {
            self.bell = true;
        }
    }

    fn on_tick(&mut self) -> bool {
        self.cells.drift();
        self.uptime = self.started.elapsed();
        true
    }

    fn paint<W: Write>(&mut self, r: &mut Renderer<W>) -> io::Result<()> {
        r.print_fmt(UPTIME_AT, format_args!("{:<9}", Uptime(self.uptime)))?;

        for ((row, index), &mv) in (FIRST_ROW..).zip(1u16..).zip(self.cells.readings()) {
            r.print_fmt(Pos::new(row, 4), format_args!("{index:<2}"))?;
            r.print_fmt(Pos::new(row, 9), format_args!("{mv:<5}"))?;
            r.print_fmt(Pos::new(row, 18), format_args!("{:<6}", Volts(mv).to_string()))?;
        }

        r.print_fmt(KEY_AT, format_args!("Key   : {:<10}", self.last_key))?;
        let note = self.last_note.map(|d| d.to_string()).unwrap_or_default();
        r.print_fmt(INPUT_AT, format_args!("Input : {note:<NOTE_WIDTH$.NOTE_WIDTH$}"))?;

        if std::mem::take(&mut self.bell) {
            r.beep()?;
        }
        Ok(())
    }
}

/// Whether a terminal of `size` shows the whole layout.
const fn fits(size: Size) -> bool {
    size.cols >= SCREEN.cols && size.rows >= SCREEN.rows
}

/// Elapsed time as `hh:mm:ss`.
struct Uptime(Duration);

impl std::fmt::Display for Uptime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let secs = self.0.as_secs();
        let text = format!("{:02}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60);
        f.pad(&text)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
