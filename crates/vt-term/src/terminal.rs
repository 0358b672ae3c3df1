// SPDX-License-Identifier: MIT
//
// Terminal control — raw mode and panic-safe restore.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), ioctl (TIOCGWINSZ), isatty, and raw fd writes. These are
// the standard POSIX interfaces for terminal control — there is no safe
// alternative. Each unsafe block is minimal.
#![allow(unsafe_code)]
//
// The decoder wants bytes one at a time, unechoed, with no line buffering
// and with Ctrl-C arriving as 0x03 rather than SIGINT. `RawMode` sets that
// up and puts the original termios back when dropped.
//
// Reads are configured VMIN=0 / VTIME=1: a `read()` returns after at most
// 100ms even with nothing typed, so a polling loop never hangs on input.
//
// The panic hook bypasses Rust's stdout lock and writes the end-session
// sequence straight to fd 1, then restores termios, then hands over to the
// original hook so the message lands on a usable terminal.

use std::io;
#[cfg(not(unix))]
use std::io::Write;
#[cfg(unix)]
use std::sync::Mutex;
use std::sync::Once;

use crate::render::END_SESSION;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

// ─── Terminal Queries ───────────────────────────────────────────────────────

/// Query the current terminal size via `ioctl(TIOCGWINSZ)`.
///
/// Returns `None` if stdout is not a terminal or the query fails.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(Size {
            cols: ws.ws_col,
            rows: ws.ws_row,
        })
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Check whether stdin is connected to a terminal (TTY).
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Panic-Safe Restore ─────────────────────────────────────────────────────

/// Backup of the original termios for the panic hook.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Restore termios from the global backup. Best-effort, ignores errors.
#[cfg(unix)]
fn restore_termios_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some(ref original) = *guard {
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, original);
            }
        }
    }
}

static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Install (once per process) a panic hook that ends the render session
/// and leaves raw mode before the panic message prints.
pub fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();

            #[cfg(unix)]
            restore_termios_from_backup();

            original(info);
        }));
    });
}

/// Write [`END_SESSION`] directly to stdout's file descriptor.
fn emergency_restore() {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            END_SESSION.as_ptr().cast::<libc::c_void>(),
            END_SESSION.len(),
        );
    }

    #[cfg(not(unix))]
    {
        let _ = io::stdout().write_all(END_SESSION);
        let _ = io::stdout().flush();
    }
}

// ─── RawMode ────────────────────────────────────────────────────────────────

/// Character-at-a-time, no-echo input mode, undone on drop.
///
/// Enabling is a no-op when stdin is not a terminal (pipes, CI), so the
/// same code path runs under test.
///
/// # Example
///
/// ```no_run
/// use vt_term::terminal::RawMode;
///
/// let raw = RawMode::enable()?;
/// // ... read bytes, render ...
/// drop(raw); // original termios restored
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct RawMode {
    #[cfg(unix)]
    original: Option<libc::termios>,
}

impl RawMode {
    /// Switch stdin into raw mode and install the panic hook.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing the termios fails.
    #[cfg(unix)]
    pub fn enable() -> io::Result<Self> {
        install_panic_hook();

        if !is_tty() {
            tracing::info!("stdin is not a tty, raw mode skipped");
            return Ok(Self { original: None });
        }

        let fd = libc::STDIN_FILENO;

        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(fd, &raw mut termios) != 0 {
                return Err(io::Error::last_os_error());
            }

            let original = termios;
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = Some(original);
            }

            termios.c_iflag &= !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
            termios.c_oflag &= !libc::OPOST;
            termios.c_cflag |= libc::CS8;
            termios.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);

            // Return from read() after 100ms with or without a byte.
            termios.c_cc[libc::VMIN] = 0;
            termios.c_cc[libc::VTIME] = 1;

            if libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const termios) != 0 {
                return Err(io::Error::last_os_error());
            }

            tracing::info!("raw mode enabled");
            Ok(Self {
                original: Some(original),
            })
        }
    }

    #[cfg(not(unix))]
    pub fn enable() -> io::Result<Self> {
        install_panic_hook();
        Ok(Self {})
    }

    /// Whether raw mode was actually applied (stdin is a TTY).
    #[must_use]
    pub const fn is_active(&self) -> bool {
        #[cfg(unix)]
        {
            self.original.is_some()
        }
        #[cfg(not(unix))]
        {
            false
        }
    }

    /// Restore the original termios. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the termios can't be written back.
    #[cfg(unix)]
    pub fn disable(&mut self) -> io::Result<()> {
        if let Some(ref original) = self.original {
            unsafe {
                if libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, original) != 0 {
                    return Err(io::Error::last_os_error());
                }
            }

            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = None;
            }

            self.original = None;
            tracing::info!("raw mode disabled");
        }

        Ok(())
    }

    #[cfg(not(unix))]
    pub fn disable(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(err) = self.disable() {
            tracing::warn!(%err, "failed to restore terminal mode");
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
