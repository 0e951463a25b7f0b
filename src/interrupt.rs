//! Interrupt handling (Ctrl+C / SIGINT).
//!
//! SIGINT is redirected into a flag instead of terminating the process. The
//! line editor polls the flag between input events; an interrupt leaves the
//! current line, cursor and history untouched.
//!
//! In raw mode the terminal delivers Ctrl+C as the byte 0x03, so the signal
//! path only fires for interrupts sent from outside (`kill -INT`) or while
//! the terminal is in cooked mode.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    seen: Arc<AtomicBool>,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route SIGINT into this flag for the rest of the process lifetime.
    pub fn install(&self) -> io::Result<()> {
        imp::register(&self.seen)
    }

    pub fn seen(&self) -> bool {
        self.seen.load(Ordering::SeqCst)
    }

    pub fn mark_seen(&self) {
        self.seen.store(true, Ordering::SeqCst);
    }

    /// Consume a pending interrupt.
    pub fn take(&self) -> bool {
        self.seen.swap(false, Ordering::SeqCst)
    }
}

#[cfg(unix)]
mod imp {
    use std::io;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;

    use signal_hook::consts::SIGINT;

    pub fn register(flag: &Arc<AtomicBool>) -> io::Result<()> {
        signal_hook::flag::register(SIGINT, Arc::clone(flag)).map(|_| ())
    }
}

#[cfg(not(unix))]
mod imp {
    use std::io;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;

    // Raw mode disables console Ctrl+C processing, so there is nothing to hook.
    pub fn register(_flag: &Arc<AtomicBool>) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_consumes_flag() {
        let interrupt = Interrupt::new();
        assert!(!interrupt.take());
        interrupt.mark_seen();
        assert!(interrupt.seen());
        assert!(interrupt.take());
        assert!(!interrupt.seen());
    }

    #[test]
    fn test_clones_share_flag() {
        let interrupt = Interrupt::new();
        let handle = interrupt.clone();
        handle.mark_seen();
        assert!(interrupt.take());
    }
}
