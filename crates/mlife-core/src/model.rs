#![forbid(unsafe_code)]

//! The simulation model: a grid plus the engine that advances it.
//!
//! # Lifecycle
//!
//! A model is live from construction until [`Model::close`]. Closing is
//! one-way and idempotent; afterwards every operation except
//! [`Model::is_closed`] fails with [`LifeError::InvalidState`].
//!
//! ```
//! use mlife_core::{Algorithm, LifeModel, Model, ModelOptions, SimContext};
//!
//! let options = ModelOptions::new(16, 12);
//! let mut model = LifeModel::new(&options, Algorithm::ShiftSum, SimContext::seeded(1))?;
//! model.step(3)?;
//! assert_eq!(model.steps_taken()?, 3);
//! model.close();
//! assert!(model.step(1).unwrap_err().is_invalid_state());
//! # Ok::<(), mlife_core::LifeError>(())
//! ```

use std::path::PathBuf;

use crate::algorithm::{Algorithm, Engine, Stepper};
use crate::context::SimContext;
use crate::error::{LifeError, Result};
use crate::grid::Grid;

const COMPONENT: &str = "Model";

/// Density used when none is requested.
pub const DEFAULT_DENSITY: f64 = 0.5;

/// Operations a controller drives on a model.
pub trait Model {
    /// Advance by `steps` generations.
    ///
    /// # Errors
    ///
    /// [`LifeError::InvalidState`] after close; [`LifeError::UnsupportedFeature`]
    /// for negative `steps`.
    fn step(&mut self, steps: i64) -> Result<()>;

    /// Advance until `steps_taken() == target`.
    ///
    /// # Errors
    ///
    /// [`LifeError::InvalidState`] after close; [`LifeError::UnsupportedFeature`]
    /// when `target` is behind the current step count.
    fn step_to(&mut self, target: u64) -> Result<()>;

    /// Re-seed the grid and zero the step count.
    ///
    /// # Errors
    ///
    /// [`LifeError::InvalidState`] after close.
    fn reset(&mut self) -> Result<()>;

    /// Current grid.
    ///
    /// # Errors
    ///
    /// [`LifeError::InvalidState`] after close.
    fn grid(&self) -> Result<&Grid>;

    /// Generations advanced since construction or the last reset.
    ///
    /// # Errors
    ///
    /// [`LifeError::InvalidState`] after close.
    fn steps_taken(&self) -> Result<u64>;

    /// Release the model. Idempotent.
    fn close(&mut self);

    /// True once [`Model::close`] has been called.
    fn is_closed(&self) -> bool;
}

/// Construction options for [`LifeModel`].
#[derive(Debug, Clone, PartialEq)]
pub struct ModelOptions {
    /// `(width, height)` in cells.
    pub size: (usize, usize),
    /// Probability that a cell starts alive.
    pub density: f64,
    /// Pattern file to load. Not supported; must be `None`.
    pub source: Option<PathBuf>,
    /// Placement of `source` in the grid. Accepted and ignored.
    pub offset: Option<(i64, i64)>,
    /// Requested history depth for stepping backwards. Stored, no effect.
    pub rollback: usize,
}

impl ModelOptions {
    /// Options for a random soup of the given size at the default density.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            size: (width, height),
            density: DEFAULT_DENSITY,
            source: None,
            offset: None,
            rollback: 0,
        }
    }

    /// Set the initial density.
    #[must_use]
    pub fn density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }
}

/// Grid model backed by one of the stepping engines.
#[derive(Debug)]
pub struct LifeModel {
    grid: Grid,
    engine: Engine,
    ctx: SimContext,
    density: f64,
    rollback: usize,
    steps: u64,
    closed: bool,
}

impl LifeModel {
    /// Create a model with a random grid.
    ///
    /// # Errors
    ///
    /// [`LifeError::UnsupportedFeature`] if `options.source` is set;
    /// [`LifeError::Configuration`] for a zero or oversized dimension or a
    /// density outside `[0, 1]`.
    pub fn new(options: &ModelOptions, algorithm: Algorithm, mut ctx: SimContext) -> Result<Self> {
        if let Some(source) = &options.source {
            return Err(LifeError::unsupported(format!(
                "loading a grid from {}",
                source.display()
            )));
        }
        let (width, height) = options.size;
        let grid = Grid::random(width, height, options.density, ctx.rng())?;
        crate::debug!(
            width,
            height,
            density = options.density,
            algorithm = algorithm.name(),
            seed = ?ctx.seed(),
            "model created"
        );
        Ok(Self {
            grid,
            engine: algorithm.engine(),
            ctx,
            density: options.density,
            rollback: options.rollback,
            steps: 0,
            closed: false,
        })
    }

    /// Create a model around an explicit starting grid.
    ///
    /// [`Model::reset`] re-seeds at the default density.
    #[must_use]
    pub fn from_grid(grid: Grid, algorithm: Algorithm, ctx: SimContext) -> Self {
        Self {
            grid,
            engine: algorithm.engine(),
            ctx,
            density: DEFAULT_DENSITY,
            rollback: 0,
            steps: 0,
            closed: false,
        }
    }

    /// The algorithm chosen at construction.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        self.engine.algorithm()
    }

    /// The requested rollback depth. Backward stepping is not implemented.
    #[must_use]
    pub const fn rollback(&self) -> usize {
        self.rollback
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            Err(LifeError::closed(COMPONENT))
        } else {
            Ok(())
        }
    }

    fn advance(&mut self, steps: u64) {
        for _ in 0..steps {
            self.grid = self.engine.advance(&self.grid);
        }
        self.steps += steps;
    }
}

impl Model for LifeModel {
    fn step(&mut self, steps: i64) -> Result<()> {
        self.ensure_open()?;
        let steps = u64::try_from(steps)
            .map_err(|_| LifeError::unsupported(format!("stepping backwards ({steps})")))?;
        self.advance(steps);
        Ok(())
    }

    fn step_to(&mut self, target: u64) -> Result<()> {
        self.ensure_open()?;
        if target < self.steps {
            return Err(LifeError::unsupported(format!(
                "stepping back to {target} from {}",
                self.steps
            )));
        }
        self.advance(target - self.steps);
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.ensure_open()?;
        let (width, height) = self.grid.size();
        self.grid = Grid::random(width, height, self.density, self.ctx.rng())?;
        self.steps = 0;
        crate::debug!(width, height, "model reset");
        Ok(())
    }

    fn grid(&self) -> Result<&Grid> {
        self.ensure_open()?;
        Ok(&self.grid)
    }

    fn steps_taken(&self) -> Result<u64> {
        self.ensure_open()?;
        Ok(self.steps)
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            crate::debug!(steps = self.steps, "model closed");
        }
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}
