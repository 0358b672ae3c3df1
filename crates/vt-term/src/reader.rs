// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Byte sources — where the decoder's input comes from.
//
// The decoder is fed one byte per loop iteration, and the loop must keep
// ticking when nobody types. A `ByteSource` therefore answers "is there a
// byte?" within a bounded wait: `Ok(Some(b))` for a byte, `Ok(None)` when
// the wait elapsed, and `UnexpectedEof` once the input is gone for good.
//
// `StdinSource` polls fd 0 with a timeout and reads a single byte when it
// becomes readable. Reading one byte at a time is deliberate: the decoder
// is a byte-at-a-time state machine and a multi-byte sequence simply takes
// several iterations.

use std::io;
use std::time::Duration;

/// A bounded-wait supplier of input bytes.
pub trait ByteSource {
    /// Wait up to the source's interval for one byte.
    ///
    /// # Errors
    ///
    /// Returns [`io::ErrorKind::UnexpectedEof`] when the input is closed,
    /// or the underlying read error.
    fn poll_byte(&mut self) -> io::Result<Option<u8>>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn poll_byte(&mut self) -> io::Result<Option<u8>> {
        (**self).poll_byte()
    }
}

/// Longest wait `StdinSource` will pass to `poll()`.
#[allow(clippy::cast_sign_loss)] // i32::MAX is positive.
const MAX_POLL_MS: u128 = i32::MAX as u128;

/// Reads stdin one byte at a time with a poll timeout.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use vt_term::reader::{ByteSource, StdinSource};
///
/// let mut src = StdinSource::new(Duration::from_millis(100));
/// if let Some(byte) = src.poll_byte()? {
///     println!("got {byte:#04x}");
/// }
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct StdinSource {
    timeout: Duration,
}

impl StdinSource {
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    #[inline]
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    #[allow(clippy::cast_possible_truncation)] // Clamped to i32::MAX.
    fn timeout_ms(&self) -> i32 {
        self.timeout.as_millis().min(MAX_POLL_MS) as i32
    }
}

#[cfg(unix)]
impl ByteSource for StdinSource {
    fn poll_byte(&mut self) -> io::Result<Option<u8>> {
        let fd = libc::STDIN_FILENO;

        let ready = unsafe {
            let mut pfd = libc::pollfd {
                fd,
                events: libc::POLLIN,
                revents: 0,
            };
            libc::poll(&raw mut pfd, 1, self.timeout_ms())
        };

        if ready < 0 {
            let err = io::Error::last_os_error();
            // A signal (e.g. SIGWINCH) cut the wait short.
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(None);
            }
            return Err(err);
        }
        if ready == 0 {
            return Ok(None);
        }

        let mut byte = 0u8;
        let n = unsafe { libc::read(fd, (&raw mut byte).cast(), 1) };

        match n {
            1 => Ok(Some(byte)),
            0 => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed")),
            _ => {
                let err = io::Error::last_os_error();
                match err.kind() {
                    io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock => Ok(None),
                    _ => Err(err),
                }
            }
        }
    }
}

#[cfg(not(unix))]
impl ByteSource for StdinSource {
    fn poll_byte(&mut self) -> io::Result<Option<u8>> {
        use std::io::Read;

        let mut byte = [0u8; 1];
        match io::stdin().read(&mut byte)? {
            0 => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed")),
            _ => Ok(Some(byte[0])),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
