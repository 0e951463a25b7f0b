//! Scoped raw terminal mode.

use std::io;

use crossterm::terminal;
use crossterm::tty::IsTty;
use log::{debug, warn};

/// Keeps the terminal in raw mode (no line buffering, no echo) while alive.
///
/// Prior settings are restored on drop, which also covers early returns
/// through `?` and panics.
#[derive(Debug)]
pub struct RawModeGuard {
    _private: (),
}

impl RawModeGuard {
    pub fn acquire() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        debug!("terminal: raw mode enabled");
        Ok(Self { _private: () })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        match terminal::disable_raw_mode() {
            Ok(()) => debug!("terminal: raw mode restored"),
            Err(e) => warn!("terminal: failed to restore mode: {}", e),
        }
    }
}

/// Whether stdin is attached to a terminal. Piped input runs without raw mode.
pub fn stdin_is_tty() -> bool {
    io::stdin().is_tty()
}
