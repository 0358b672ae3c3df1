// SPDX-License-Identifier: MIT
//
// Scoped rendering session.
//
// `Session` brackets the dashboard's visible lifetime: beginning one puts
// the terminal into the default style with the cursor hidden and the
// screen blank; ending one hands the terminal back with colors, attributes
// and cursor restored. Dropping a session that was never explicitly ended
// ends it anyway, so an early `?` return can't leave the user staring at
// bold white on blue with no cursor.
//
// Panics are the panic hook's business (see `terminal.rs`): by the time
// unwinding reaches the guard, the hook has already restored the terminal
// and printed the message, so `Drop` stays quiet while panicking.

use std::io::{self, Write};
use std::ops::{Deref, DerefMut};

use crate::render::Renderer;

/// A [`Renderer`] inside a begun session.
pub struct Session<W: Write> {
    renderer: Renderer<W>,
    active: bool,
}

impl<W: Write> Session<W> {
    /// Begin a session on `renderer` and flush the setup sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if the setup sequence can't be written. Whatever
    /// part of it got through is undone with a best-effort teardown first.
    pub fn begin(mut renderer: Renderer<W>) -> io::Result<Self> {
        if let Err(err) = renderer.begin_session().and_then(|()| renderer.flush()) {
            if let Err(teardown) = renderer.end_session().and_then(|()| renderer.flush()) {
                tracing::warn!(%teardown, "failed to undo partial session setup");
            }
            return Err(err);
        }
        tracing::info!("render session started");
        Ok(Self {
            renderer,
            active: true,
        })
    }

    /// Whether [`end`](Self::end) has not run yet.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// End the session and flush. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the teardown sequence can't be written. The
    /// session counts as ended either way.
    pub fn end(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        self.renderer.end_session()?;
        self.renderer.flush()?;
        tracing::info!("render session ended");
        Ok(())
    }
}

impl<W: Write> Deref for Session<W> {
    type Target = Renderer<W>;

    fn deref(&self) -> &Renderer<W> {
        &self.renderer
    }
}

impl<W: Write> DerefMut for Session<W> {
    fn deref_mut(&mut self) -> &mut Renderer<W> {
        &mut self.renderer
    }
}

impl<W: Write> Drop for Session<W> {
    fn drop(&mut self) {
        // A second END_SESSION would clear away the panic message.
        if std::thread::panicking() {
            self.active = false;
            return;
        }
        if let Err(err) = self.end() {
            tracing::warn!(%err, "failed to end render session");
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
