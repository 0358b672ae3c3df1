// SPDX-License-Identifier: MIT
//
// Event loop — the dashboard's heartbeat.
//
// One iteration does, in order:
//
//   1. `on_tick` — let the application advance time-based state
//   2. poll one byte from the source (bounded wait)
//   3. feed it to the decoder; forward any diagnostic, then any key
//   4. repaint if the tick or the byte changed anything
//
// The loop runs inside a `Session`, so the terminal gets its default look
// on entry and is handed back on every exit path: `Action::Quit`, end of
// input, or an I/O error from either side.
//
// A lone ESC is not flushed on timeout. The decoder only emits Escape for
// ESC ESC, so a half-typed sequence just waits for its next byte.

use std::io::{self, Write};

use crate::input::{Decoder, Diagnostic};
use crate::key::LogicalKey;
use crate::reader::ByteSource;
use crate::render::Renderer;
use crate::session::Session;

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the application tells the event loop to do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Continue running.
    Continue,
    /// Exit the event loop cleanly.
    Quit,
}

/// Why [`EventLoop::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// The application returned [`Action::Quit`].
    Quit,
    /// The byte source reported end of input.
    EndOfInput,
}

/// Application interface for the event loop.
///
/// Only [`paint`](App::paint) is required. Everything else has a default
/// no-op implementation.
pub trait App {
    /// Draw the static parts of the screen, once, right after the session
    /// begins.
    ///
    /// # Errors
    ///
    /// Returns any error from the renderer's writer.
    fn on_start<W: Write>(&mut self, _renderer: &mut Renderer<W>) -> io::Result<()> {
        Ok(())
    }

    /// Handle a decoded key. Return [`Action::Quit`] to exit the loop.
    fn on_key(&mut self, _key: LogicalKey) -> Action {
        Action::Continue
    }

    /// Handle a byte the decoder passed over or rejected.
    fn on_diagnostic(&mut self, _diagnostic: &Diagnostic) {}

    /// Called every iteration before input is polled. Return `true` if
    /// state changed and a repaint is needed.
    fn on_tick(&mut self) -> bool {
        false
    }

    /// Draw the dynamic parts of the screen.
    ///
    /// Called once after [`on_start`](App::on_start) and again whenever
    /// the frame is dirty. Nothing is cleared in between.
    ///
    /// # Errors
    ///
    /// Returns any error from the renderer's writer.
    fn paint<W: Write>(&mut self, renderer: &mut Renderer<W>) -> io::Result<()>;
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// Drives an [`App`] from a [`ByteSource`] through a [`Decoder`].
///
/// # Example
///
/// ```no_run
/// use std::io::{self, Write};
/// use std::time::Duration;
/// use vt_term::event_loop::{Action, App, EventLoop};
/// use vt_term::key::LogicalKey;
/// use vt_term::reader::StdinSource;
/// use vt_term::render::{Pos, Renderer};
///
/// struct Hello;
///
/// impl App for Hello {
///     fn on_key(&mut self, key: LogicalKey) -> Action {
///         if key == LogicalKey::CtrlC { Action::Quit } else { Action::Continue }
///     }
///
///     fn paint<W: Write>(&mut self, r: &mut Renderer<W>) -> io::Result<()> {
///         r.print_text(Pos::new(1, 1), "hello")
///     }
/// }
///
/// let mut event_loop = EventLoop::new(StdinSource::new(Duration::from_millis(100)));
/// event_loop.run(&mut Hello, Renderer::new(io::stdout()))?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct EventLoop<S: ByteSource> {
    source: S,
    decoder: Decoder,
}

impl<S: ByteSource> EventLoop<S> {
    #[must_use]
    pub const fn new(source: S) -> Self {
        Self {
            source,
            decoder: Decoder::new(),
        }
    }

    /// The decoder, for inspecting a partial sequence.
    #[inline]
    #[must_use]
    pub const fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    /// Run until the application quits or input ends.
    ///
    /// The session is ended on every exit path. If both the loop and the
    /// session teardown fail, the loop's error wins.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails.
    pub fn run<A: App, W: Write>(&mut self, app: &mut A, renderer: Renderer<W>) -> io::Result<Exit> {
        let mut session = Session::begin(renderer)?;

        let result = self.run_inner(app, &mut session);
        let ended = session.end();

        let exit = result?;
        ended?;
        tracing::info!(?exit, "event loop finished");
        Ok(exit)
    }

    /// The inner loop, separated so the session ends regardless of outcome.
    fn run_inner<A: App, W: Write>(&mut self, app: &mut A, session: &mut Session<W>) -> io::Result<Exit> {
        let renderer: &mut Renderer<W> = session;

        app.on_start(renderer)?;
        app.paint(renderer)?;
        renderer.flush()?;

        loop {
            // ── Tick ─────────────────────────────────────────────
            let mut dirty = app.on_tick();

            // ── Input ────────────────────────────────────────────
            match self.source.poll_byte() {
                Ok(Some(byte)) => {
                    dirty = true;
                    let out = self.decoder.step(byte);
                    if let Some(diagnostic) = out.diagnostic {
                        app.on_diagnostic(&diagnostic);
                    }
                    if !out.key.is_none() {
                        tracing::debug!(key = %out.key, "key decoded");
                        if app.on_key(out.key) == Action::Quit {
                            return Ok(Exit::Quit);
                        }
                    }
                }
                Ok(None) => {}
                Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                    return Ok(Exit::EndOfInput);
                }
                Err(err) => return Err(err),
            }

            // ── Render if dirty ──────────────────────────────────
            if dirty {
                app.paint(renderer)?;
                renderer.flush()?;
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{END_SESSION, Pos};
    use std::collections::VecDeque;

    /// Scripted input: `Some(b)` yields a byte, `None` a timeout. Running
    /// off the end is end of input.
    struct Script(VecDeque<Option<u8>>);

    impl Script {
        fn bytes(bytes: &[u8]) -> Self {
            Self(bytes.iter().copied().map(Some).collect())
        }
    }

    impl ByteSource for Script {
        fn poll_byte(&mut self) -> io::Result<Option<u8>> {
            self.0
                .pop_front()
                .ok_or_else(|| io::Error::from(io::ErrorKind::UnexpectedEof))
        }
    }

    struct Broken;

    impl ByteSource for Broken {
        fn poll_byte(&mut self) -> io::Result<Option<u8>> {
            Err(io::Error::other("device gone"))
        }
    }

    #[derive(Default)]
    struct Recorder {
        keys: Vec<LogicalKey>,
        diagnostics: Vec<Diagnostic>,
        ticks: usize,
        paints: usize,
        started: bool,
    }

    impl App for Recorder {
        fn on_start<W: Write>(&mut self, _renderer: &mut Renderer<W>) -> io::Result<()> {
            self.started = true;
            Ok(())
        }

        fn on_key(&mut self, key: LogicalKey) -> Action {
            self.keys.push(key);
            if key == LogicalKey::CtrlC {
                Action::Quit
            } else {
                Action::Continue
            }
        }

        fn on_diagnostic(&mut self, diagnostic: &Diagnostic) {
            self.diagnostics.push(*diagnostic);
        }

        fn on_tick(&mut self) -> bool {
            self.ticks += 1;
            false
        }

        fn paint<W: Write>(&mut self, renderer: &mut Renderer<W>) -> io::Result<()> {
            self.paints += 1;
            renderer.print_text(Pos::new(1, 1), "x")
        }
    }

    // ── App trait defaults ─────────────────────────────────────

    struct MinimalApp;
    impl App for MinimalApp {
        fn paint<W: Write>(&mut self, _renderer: &mut Renderer<W>) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn app_default_on_key_continues() {
        assert_eq!(MinimalApp.on_key(LogicalKey::Up), Action::Continue);
    }

    #[test]
    fn app_default_on_tick_not_dirty() {
        assert!(!MinimalApp.on_tick());
    }

    #[test]
    fn app_default_on_start_writes_nothing() {
        let mut r = Renderer::new(Vec::new());
        MinimalApp.on_start(&mut r).unwrap();
        assert!(r.get_ref().is_empty());
    }

    // ── Loop ───────────────────────────────────────────────────

    #[test]
    fn ctrl_c_quits() {
        let mut app = Recorder::default();
        let mut out = Vec::new();
        let exit = EventLoop::new(Script::bytes(b"\x1b\x1b\x03\t"))
            .run(&mut app, Renderer::new(&mut out))
            .unwrap();

        assert_eq!(exit, Exit::Quit);
        assert_eq!(app.keys, vec![LogicalKey::Escape, LogicalKey::CtrlC]);
        assert!(app.started);
        assert!(out.ends_with(END_SESSION));
    }

    #[test]
    fn end_of_input_exits_cleanly() {
        let mut app = Recorder::default();
        let mut out = Vec::new();
        let exit = EventLoop::new(Script::bytes(b"\x1b[A"))
            .run(&mut app, Renderer::new(&mut out))
            .unwrap();

        assert_eq!(exit, Exit::EndOfInput);
        assert_eq!(app.keys, vec![LogicalKey::Up]);
        assert!(out.ends_with(END_SESSION));
    }

    #[test]
    fn diagnostics_are_forwarded() {
        let mut app = Recorder::default();
        EventLoop::new(Script::bytes(b"a\x1bX"))
            .run(&mut app, Renderer::new(Vec::new()))
            .unwrap();

        assert_eq!(
            app.diagnostics,
            vec![Diagnostic::Printable(b'a'), Diagnostic::UnknownGroup(b'X')]
        );
        assert!(app.keys.is_empty());
    }

    #[test]
    fn timeouts_tick_without_painting() {
        let mut app = Recorder::default();
        EventLoop::new(Script(VecDeque::from([None, None, None])))
            .run(&mut app, Renderer::new(Vec::new()))
            .unwrap();

        // Three timeouts plus the iteration that hits end of input.
        assert_eq!(app.ticks, 4);
        // Only the initial paint.
        assert_eq!(app.paints, 1);
    }

    #[test]
    fn each_byte_repaints() {
        let mut app = Recorder::default();
        EventLoop::new(Script::bytes(b"\x1b[5~"))
            .run(&mut app, Renderer::new(Vec::new()))
            .unwrap();

        assert_eq!(app.keys, vec![LogicalKey::PageUp]);
        assert_eq!(app.paints, 1 + 4);
    }

    #[test]
    fn partial_sequence_survives_timeouts() {
        let mut app = Recorder::default();
        let mut event_loop = EventLoop::new(Script(VecDeque::from([
            Some(0x1B),
            None,
            Some(b'['),
            None,
            Some(b'D'),
        ])));
        event_loop.run(&mut app, Renderer::new(Vec::new())).unwrap();

        assert_eq!(app.keys, vec![LogicalKey::Left]);
    }

    #[test]
    fn source_error_still_ends_session() {
        let mut app = Recorder::default();
        let mut out = Vec::new();
        let err = EventLoop::new(Broken)
            .run(&mut app, Renderer::new(&mut out))
            .unwrap_err();

        assert_eq!(err.to_string(), "device gone");
        assert!(out.ends_with(END_SESSION));
    }

    #[test]
    fn output_starts_with_session_setup() {
        let mut out = Vec::new();
        let mut setup = Renderer::new(Vec::new());
        setup.begin_session().unwrap();

        EventLoop::new(Script::bytes(b"\x03"))
            .run(&mut Recorder::default(), Renderer::new(&mut out))
            .unwrap();

        assert!(out.starts_with(setup.get_ref()));
    }
}
