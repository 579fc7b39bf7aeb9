#![forbid(unsafe_code)]

//! Error type shared by the model, view, and controller layers.

use std::fmt;

/// Result alias used throughout Matrix Life.
pub type Result<T> = std::result::Result<T, LifeError>;

/// Errors raised by models, views, and controllers.
#[derive(Debug)]
pub enum LifeError {
    /// An operation was invoked on a component after `close()`.
    InvalidState {
        /// The component that was closed ("Model", "View", "Controller").
        component: &'static str,
    },
    /// A request for functionality that is deliberately not implemented,
    /// such as loading a source pattern or stepping backwards.
    UnsupportedFeature(String),
    /// An invalid size, resolution, density, scale or colour specification.
    Configuration(String),
    /// I/O failure from a render target or input source.
    Io(std::io::Error),
}

impl LifeError {
    /// Error for an operation on a closed component.
    #[must_use]
    pub const fn closed(component: &'static str) -> Self {
        Self::InvalidState { component }
    }

    /// Error for an unimplemented feature.
    #[must_use]
    pub fn unsupported(what: impl Into<String>) -> Self {
        Self::UnsupportedFeature(what.into())
    }

    /// Error for a rejected configuration value.
    #[must_use]
    pub fn config(what: impl Into<String>) -> Self {
        Self::Configuration(what.into())
    }

    /// True for [`LifeError::InvalidState`].
    #[must_use]
    pub const fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState { .. })
    }

    /// True for [`LifeError::UnsupportedFeature`].
    #[must_use]
    pub const fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedFeature(_))
    }

    /// True for [`LifeError::Configuration`].
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

impl fmt::Display for LifeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifeError::InvalidState { component } => {
                write!(f, "operation on closed {component}")
            }
            LifeError::UnsupportedFeature(what) => write!(f, "not supported: {what}"),
            LifeError::Configuration(what) => write!(f, "invalid configuration: {what}"),
            LifeError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for LifeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LifeError::Io(e) => Some(e),
            LifeError::InvalidState { .. }
            | LifeError::UnsupportedFeature(_)
            | LifeError::Configuration(_) => None,
        }
    }
}

impl From<std::io::Error> for LifeError {
    fn from(e: std::io::Error) -> Self {
        LifeError::Io(e)
    }
}
