#![forbid(unsafe_code)]

//! Terminal session lifecycle guard.
//!
//! RAII management of the terminal modes a view alters, so they are restored
//! on every exit path.
//!
//! # Lifecycle Guarantees
//!
//! 1. **Every mode change is tracked** - raw mode, alternate screen and the
//!    hidden cursor each have a flag set only once the change succeeded.
//!
//! 2. **Restore runs once** - [`TerminalSession::restore`] undoes the tracked
//!    changes in reverse order and clears the flags; `Drop` calls it again,
//!    which is then a no-op.
//!
//! 3. **Panic safety** - a panic hook performs a best-effort restore before
//!    the previous hook prints the message. The release profile aborts on
//!    panic, so `Drop` alone would not be enough.
//!
//! # Cleanup Order
//!
//! 1. Reset colours
//! 2. Show cursor (if hidden)
//! 3. Leave alternate screen (if entered)
//! 4. Exit raw mode
//! 5. Flush stdout

use std::io::{self, Write};
use std::sync::OnceLock;

use crossterm::{cursor, execute, queue, style, terminal};

/// Which terminal modes a session enables.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Draw on the alternate screen buffer (`CSI ? 1049 h`), preserving the
    /// user's scrollback.
    pub alternate_screen: bool,
    /// Hide the cursor while drawing.
    pub hide_cursor: bool,
}

/// A terminal session in raw mode.
///
/// Only one session should exist at a time.
#[derive(Debug)]
pub struct TerminalSession {
    options: SessionOptions,
    raw_enabled: bool,
    alternate_screen_enabled: bool,
    cursor_hidden: bool,
}

impl TerminalSession {
    /// Enter raw mode and enable the requested modes.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode or a requested mode cannot be enabled.
    /// Modes enabled before the failure are restored when the partially
    /// built session is dropped.
    pub fn new(options: SessionOptions) -> io::Result<Self> {
        install_panic_hook();

        let mut session = Self {
            options: options.clone(),
            raw_enabled: false,
            alternate_screen_enabled: false,
            cursor_hidden: false,
        };

        terminal::enable_raw_mode()?;
        session.raw_enabled = true;
        mlife_core::info!("terminal raw mode enabled");

        let mut stdout = io::stdout();

        if options.alternate_screen {
            execute!(stdout, terminal::EnterAlternateScreen)?;
            session.alternate_screen_enabled = true;
            mlife_core::info!("alternate screen enabled");
        } else {
            execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
        }

        if options.hide_cursor {
            execute!(stdout, cursor::Hide)?;
            session.cursor_hidden = true;
        }

        Ok(session)
    }

    /// Current terminal size `(columns, rows)`.
    pub fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// True while any tracked mode is still active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.raw_enabled || self.alternate_screen_enabled || self.cursor_hidden
    }

    /// Undo every tracked mode change. Later calls do nothing.
    ///
    /// # Errors
    ///
    /// Returns the first failure; the remaining steps still run.
    pub fn restore(&mut self) -> io::Result<()> {
        let mut stdout = io::stdout();
        let mut first_err = None;
        let mut note = |r: io::Result<()>| {
            if let Err(e) = r {
                first_err.get_or_insert(e);
            }
        };

        if self.is_active() {
            note(execute!(stdout, style::ResetColor));
        }

        if self.cursor_hidden {
            note(execute!(stdout, cursor::Show));
            self.cursor_hidden = false;
        }

        if self.alternate_screen_enabled {
            note(execute!(stdout, terminal::LeaveAlternateScreen));
            self.alternate_screen_enabled = false;
            mlife_core::info!("alternate screen disabled");
        }

        if self.raw_enabled {
            note(terminal::disable_raw_mode());
            self.raw_enabled = false;
            mlife_core::info!("terminal raw mode disabled");
        }

        note(stdout.flush());
        first_err.map_or(Ok(()), Err)
    }
}

/// Reset colours on `out`, then restore `session` whether or not that
/// succeeded. Returns the first error.
pub(crate) fn release_terminal<W: Write>(
    out: &mut W,
    session: &mut Option<TerminalSession>,
) -> io::Result<()> {
    let reset = queue!(out, style::ResetColor).and_then(|()| out.flush());
    let restored = session.take().map_or(Ok(()), |mut s| s.restore());
    reset.and(restored)
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if self.is_active() {
            let _ = self.restore();
        }
    }
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            best_effort_cleanup();
            previous(info);
        }));
    });
}

/// Restore the terminal without knowing what was enabled.
pub fn best_effort_cleanup() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, style::ResetColor);
    let _ = execute!(stdout, cursor::Show);
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = stdout.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_options_default_is_minimal() {
        let opts = SessionOptions::default();
        assert!(!opts.alternate_screen);
        assert!(!opts.hide_cursor);
    }

    // Entering raw mode would disturb the test runner's terminal; surfaces are
    // exercised against in-memory writers instead.

    /// A session that enabled nothing, so restoring it only flushes stdout.
    fn detached() -> TerminalSession {
        TerminalSession {
            options: SessionOptions::default(),
            raw_enabled: false,
            alternate_screen_enabled: false,
            cursor_hidden: false,
        }
    }

    /// Writer whose every write and flush fails.
    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
    }

    #[test]
    fn release_restores_the_session_after_a_failed_reset() {
        let mut session = Some(detached());
        let err = release_terminal(&mut BrokenWriter, &mut session).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert!(session.is_none());
    }

    #[test]
    fn release_without_session_reports_the_write() {
        let mut out = Vec::new();
        release_terminal(&mut out, &mut None).unwrap();
        assert!(!out.is_empty());
    }
}
