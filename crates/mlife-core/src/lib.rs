#![forbid(unsafe_code)]

//! Core: toroidal grid, Game of Life stepping algorithms, and the model.

pub mod algorithm;
pub mod context;
pub mod error;
pub mod grid;
pub mod logging;
pub mod model;
pub mod rule;
pub mod stagnation;

pub use algorithm::{Algorithm, Engine, Stepper};
pub use context::SimContext;
pub use error::{LifeError, Result};
pub use grid::Grid;
pub use model::{LifeModel, Model, ModelOptions};
pub use stagnation::StagnationDetector;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, error, info, trace, warn};
