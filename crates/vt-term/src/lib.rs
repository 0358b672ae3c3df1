// SPDX-License-Identifier: MIT
//
// vt-term — VT100 key decoding and line-art rendering for vt-dash.
//
// Two halves that meet in the application loop. On the way in, a
// byte-at-a-time decoder turns raw terminal input (including the
// ESC [ / ESC O navigation sequences) into a closed set of logical
// keys. On the way out, a write-only renderer positions the cursor,
// applies SGR styling and draws boxes and dividers with box-drawing
// glyphs, always leaving the terminal in the session's default style.
//
// Nothing here reads terminal state back. The renderer is open-loop,
// the decoder never blocks, and both are plain owned values so any
// number of them can live in one process (and in one test binary).

pub mod ansi;
pub mod event_loop;
pub mod input;
pub mod key;
pub mod reader;
pub mod render;
pub mod session;
pub mod style;
pub mod terminal;
