#![forbid(unsafe_code)]

//! Neighbour counts from sparse diagonal shift operators.
//!
//! Same product as the dense engine, `V·A + (A + V·A)·H`, but `V` and `H`
//! are stored in CSR form with at most two entries per row.

use std::collections::HashMap;

use super::Stepper;
use super::matrix::{DenseMatrix, SparseMatrix};
use crate::grid::Grid;
use crate::rule;

/// Sparse-matrix engine with per-length operator cache.
#[derive(Debug, Clone, Default)]
pub struct SparseMatrixStepper {
    operators: HashMap<usize, SparseMatrix>,
}

impl SparseMatrixStepper {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn operator(&mut self, n: usize) -> &SparseMatrix {
        self.operators.entry(n).or_insert_with(|| {
            crate::trace!(n = n, "building sparse shift operator");
            SparseMatrix::cyclic_neighbours(n)
        })
    }

    /// Raw neighbour counts, row-major.
    pub fn neighbours(&mut self, grid: &Grid) -> Vec<u32> {
        let (width, height) = grid.size();
        let a = DenseMatrix::from_cells(height, width, grid.cells());
        let vertical = self.operator(height).mul_dense(&a);
        let column = a.add(&vertical);
        let horizontal = self.operator(width).premul_dense(&column);
        vertical.add(&horizontal).into_vec()
    }
}

impl Stepper for SparseMatrixStepper {
    fn advance(&mut self, grid: &Grid) -> Grid {
        let counts = self.neighbours(grid);
        let (width, height) = grid.size();
        Grid::from_cells(width, height, rule::threshold(grid.cells(), &counts))
    }
}
