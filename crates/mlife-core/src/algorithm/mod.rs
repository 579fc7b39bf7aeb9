#![forbid(unsafe_code)]

//! Interchangeable Game of Life stepping algorithms.
//!
//! Every engine computes the same B3/S23 transition on a toroidal grid; they
//! differ only in how neighbour counts are obtained:
//!
//! | Engine          | Neighbour strategy                                  |
//! |-----------------|-----------------------------------------------------|
//! | `ShiftSum`      | Sum of eight cyclically shifted copies              |
//! | `DenseMatrix`   | Cyclic permutation matrices, two dense products     |
//! | `SparseMatrix`  | Same algebra with diagonal CSR operators            |
//! | `Convolution`   | 3×3 weighted kernel with wrap boundary, band test   |
//!
//! Matrix engines cache their shift operators per axis length, so stepping a
//! grid of a size seen before allocates only the output.

mod convolve;
mod dense;
pub mod matrix;
mod shift_sum;
mod sparse;

use std::fmt;
use std::str::FromStr;

use crate::grid::Grid;

pub use convolve::ConvolutionStepper;
pub use dense::DenseMatrixStepper;
pub use shift_sum::ShiftSumStepper;
pub use sparse::SparseMatrixStepper;

/// One generation of Game of Life.
pub trait Stepper {
    /// Compute the next generation of `grid`.
    fn advance(&mut self, grid: &Grid) -> Grid;
}

/// Algorithm selector, resolved once from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Algorithm {
    /// Sum of shifted copies.
    #[default]
    ShiftSum,
    /// Dense permutation-matrix products.
    DenseMatrix,
    /// Sparse diagonal-matrix products.
    SparseMatrix,
    /// Weighted 3×3 convolution.
    Convolution,
}

impl Algorithm {
    /// All algorithms, in declaration order.
    pub const ALL: [Algorithm; 4] = [
        Algorithm::ShiftSum,
        Algorithm::DenseMatrix,
        Algorithm::SparseMatrix,
        Algorithm::Convolution,
    ];

    /// Canonical name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Algorithm::ShiftSum => "shift-sum",
            Algorithm::DenseMatrix => "dense-matrix",
            Algorithm::SparseMatrix => "sparse-matrix",
            Algorithm::Convolution => "convolution",
        }
    }

    /// Construct a fresh engine for this algorithm.
    #[must_use]
    pub fn engine(self) -> Engine {
        match self {
            Algorithm::ShiftSum => Engine::ShiftSum(ShiftSumStepper),
            Algorithm::DenseMatrix => Engine::DenseMatrix(DenseMatrixStepper::new()),
            Algorithm::SparseMatrix => Engine::SparseMatrix(SparseMatrixStepper::new()),
            Algorithm::Convolution => Engine::Convolution(ConvolutionStepper),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| format!("unknown algorithm: {s}"))
    }
}

/// A concrete stepping engine.
#[derive(Debug, Clone)]
pub enum Engine {
    /// See [`ShiftSumStepper`].
    ShiftSum(ShiftSumStepper),
    /// See [`DenseMatrixStepper`].
    DenseMatrix(DenseMatrixStepper),
    /// See [`SparseMatrixStepper`].
    SparseMatrix(SparseMatrixStepper),
    /// See [`ConvolutionStepper`].
    Convolution(ConvolutionStepper),
}

impl Engine {
    /// The algorithm this engine implements.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        match self {
            Engine::ShiftSum(_) => Algorithm::ShiftSum,
            Engine::DenseMatrix(_) => Algorithm::DenseMatrix,
            Engine::SparseMatrix(_) => Algorithm::SparseMatrix,
            Engine::Convolution(_) => Algorithm::Convolution,
        }
    }
}

impl Stepper for Engine {
    fn advance(&mut self, grid: &Grid) -> Grid {
        match self {
            Engine::ShiftSum(s) => s.advance(grid),
            Engine::DenseMatrix(s) => s.advance(grid),
            Engine::SparseMatrix(s) => s.advance(grid),
            Engine::Convolution(s) => s.advance(grid),
        }
    }
}
