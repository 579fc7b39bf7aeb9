#![forbid(unsafe_code)]

//! Cooperative cancellation.
//!
//! An [`Interrupt`] is a shared flag the run loop polls every frame and
//! while it sleeps between frames.
//! [`SignalWatcher`] sets it from SIGINT or SIGTERM on a background thread;
//! the thread does nothing else, so all cleanup still happens on the loop's
//! own thread through the normal close path.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[cfg(unix)]
use signal_hook::consts::signal::{SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

/// Shared cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    flag: Arc<AtomicBool>,
}

impl Interrupt {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Forget a previous request.
    pub fn clear(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Background thread turning termination signals into an [`Interrupt`].
///
/// Dropping the watcher stops the thread and restores default signal
/// handling for the process.
#[derive(Debug)]
pub struct SignalWatcher {
    #[cfg(unix)]
    handle: signal_hook::iterator::Handle,
    #[cfg(unix)]
    thread: Option<std::thread::JoinHandle<()>>,
}

impl SignalWatcher {
    /// Start watching SIGINT and SIGTERM.
    ///
    /// # Errors
    ///
    /// Fails if the signal handlers cannot be registered.
    #[cfg(unix)]
    pub fn spawn(interrupt: Interrupt) -> io::Result<Self> {
        let mut signals = Signals::new([SIGINT, SIGTERM])?;
        let handle = signals.handle();
        let thread = std::thread::Builder::new()
            .name("mlife-signals".into())
            .spawn(move || {
                for signal in signals.forever() {
                    tracing::warn!(signal, "termination signal received, cancelling");
                    interrupt.trigger();
                }
            })?;
        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }

    /// Signals are not watched on this platform; Ctrl+C still arrives as a
    /// key event while the terminal is in raw mode.
    #[cfg(not(unix))]
    pub fn spawn(_interrupt: Interrupt) -> io::Result<Self> {
        Ok(Self {})
    }
}

#[cfg(unix)]
impl Drop for SignalWatcher {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let a = Interrupt::new();
        let b = a.clone();
        assert!(!b.is_triggered());
        a.trigger();
        assert!(b.is_triggered());
        b.clear();
        assert!(!a.is_triggered());
    }

    #[cfg(unix)]
    #[test]
    fn watcher_starts_and_stops() {
        let interrupt = Interrupt::new();
        let watcher = SignalWatcher::spawn(interrupt.clone()).unwrap();
        drop(watcher);
        assert!(!interrupt.is_triggered());
    }
}
