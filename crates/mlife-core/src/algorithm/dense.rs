#![forbid(unsafe_code)]

//! Neighbour counts from dense cyclic permutation matrices.
//!
//! With `A` the `h × w` grid, `V = U + D` the vertical shift operator
//! (`h × h`) and `H = L + R` the horizontal one (`w × w`):
//!
//! ```text
//! neighbours = V·A + (A + V·A)·H
//! ```
//!
//! The first term counts the cells above and below; the second shifts the
//! column of three sideways, covering the remaining six neighbours.

use std::collections::HashMap;

use super::Stepper;
use super::matrix::DenseMatrix;
use crate::grid::Grid;
use crate::rule;

/// Dense-matrix engine with per-length operator cache.
#[derive(Debug, Clone, Default)]
pub struct DenseMatrixStepper {
    operators: HashMap<usize, DenseMatrix>,
}

impl DenseMatrixStepper {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached axis lengths.
    #[must_use]
    pub fn cached_lengths(&self) -> usize {
        self.operators.len()
    }

    fn operator(&mut self, n: usize) -> &DenseMatrix {
        self.operators.entry(n).or_insert_with(|| {
            crate::trace!(n = n, "building dense shift operator");
            DenseMatrix::cyclic_neighbours(n)
        })
    }

    /// Raw neighbour counts, row-major.
    pub fn neighbours(&mut self, grid: &Grid) -> Vec<u32> {
        let (width, height) = grid.size();
        let a = DenseMatrix::from_cells(height, width, grid.cells());
        let vertical = self.operator(height).mul(&a);
        let column = a.add(&vertical);
        vertical.add(&column.mul(self.operator(width))).into_vec()
    }
}

impl Stepper for DenseMatrixStepper {
    fn advance(&mut self, grid: &Grid) -> Grid {
        let counts = self.neighbours(grid);
        let (width, height) = grid.size();
        Grid::from_cells(width, height, rule::threshold(grid.cells(), &counts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_for_a_single_cell() {
        let mut grid = Grid::new(4, 4).unwrap();
        grid.set(1, 1, true);
        let counts = DenseMatrixStepper::new().neighbours(&grid);
        let expected: Vec<u32> = vec![
            1, 1, 1, 0, //
            1, 0, 1, 0, //
            1, 1, 1, 0, //
            0, 0, 0, 0,
        ];
        assert_eq!(counts, expected);
    }

    #[test]
    fn operators_are_cached_per_length() {
        let mut stepper = DenseMatrixStepper::new();
        let square = Grid::new(6, 6).unwrap();
        stepper.advance(&square);
        assert_eq!(stepper.cached_lengths(), 1);
        stepper.advance(&Grid::new(6, 3).unwrap());
        assert_eq!(stepper.cached_lengths(), 2);
    }

    #[test]
    fn single_cell_torus_counts_itself_eight_times() {
        let grid = Grid::from_rows(&[[1u8]]).unwrap();
        assert_eq!(DenseMatrixStepper::new().neighbours(&grid), vec![8]);
    }
}
