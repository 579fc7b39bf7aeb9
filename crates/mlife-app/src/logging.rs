#![forbid(unsafe_code)]

//! Log subscriber setup.
//!
//! The views draw on the terminal, so logs never go there: with no log file
//! configured no subscriber is installed at all.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use mlife_core::{LifeError, Result};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "MLIFE_LOG";

/// Default filter for a verbosity count (`-v` minus `-q`).
#[must_use]
pub fn default_directive(verbosity: i32) -> &'static str {
    match verbosity {
        i32::MIN..=-2 => "error",
        -1 => "warn",
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Filter from `MLIFE_LOG`, else from the verbosity count.
#[must_use]
pub fn filter(verbosity: i32) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)))
}

/// Install a global fmt subscriber appending to `path`.
///
/// # Errors
///
/// [`LifeError::Io`] if the file cannot be opened;
/// [`LifeError::Configuration`] if a global subscriber is already set.
pub fn init(path: &Path, verbosity: i32) -> Result<()> {
    let file = File::options().create(true).append(true).open(path)?;
    let fmt = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(file));
    tracing_subscriber::registry()
        .with(filter(verbosity))
        .with(fmt)
        .try_init()
        .map_err(|e| LifeError::config(format!("cannot install logger: {e}")))?;
    tracing::debug!(path = %path.display(), "logging initialised");
    Ok(())
}
